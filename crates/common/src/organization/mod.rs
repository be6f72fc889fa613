//! French company identifiers
//!
//! SIREN (9 digits) identifies a company, SIRET (SIREN + 5-digit NIC)
//! identifies one of its establishments. Both end with a Luhn check digit,
//! except the SIRETs of La Poste, whose digits must sum to a multiple of 5.
//!
//! NAF/APE activity codes live in [`naf`].

pub mod naf;

use helpkit_domain::Organization;

pub use naf::{is_valid_naf, naf_division_label, naf_section, normalize_naf};

/// SIREN of La Poste, whose establishments do not follow the Luhn rule
pub const LA_POSTE_SIREN: &str = "356000000";

/// Whether a digit string passes the Luhn (mod 10) check
///
/// Returns `false` for empty input or any non-digit character.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    luhn_sum(digits, false) % 10 == 0
}

/// Check digit to append to `digits` so that the result passes [`luhn_valid`]
pub fn luhn_check_digit(digits: &str) -> Option<u8> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sum = luhn_sum(digits, true);
    Some(((10 - sum % 10) % 10) as u8)
}

/// Luhn weighted sum, doubling every second digit from the right
///
/// With `double_last` the rightmost digit is doubled, which is what a
/// payload still missing its check digit needs.
fn luhn_sum(digits: &str, double_last: bool) -> u32 {
    digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(index, byte)| {
            let digit = u32::from(byte - b'0');
            let doubled = (index % 2 == 1) != double_last;
            match (doubled, digit * 2) {
                (false, _) => digit,
                (true, twice) if twice > 9 => twice - 9,
                (true, twice) => twice,
            }
        })
        .sum()
}

/// Strip spaces and other common separators
fn compact(input: &str) -> String {
    input.chars().filter(|c| !matches!(c, ' ' | '\u{a0}' | '.' | '-')).collect()
}

fn has_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// 9 digits with a valid Luhn key; spaces are tolerated
pub fn is_valid_siren(input: &str) -> bool {
    let siren = compact(input);
    has_digits(&siren, 9) && luhn_valid(&siren)
}

/// 14 digits with a valid Luhn key, or the La Poste digit-sum rule
pub fn is_valid_siret(input: &str) -> bool {
    let siret = compact(input);
    if !has_digits(&siret, 14) {
        return false;
    }

    if siret.starts_with(LA_POSTE_SIREN) {
        let sum: u32 = siret.bytes().map(|b| u32::from(b - b'0')).sum();
        return sum % 5 == 0;
    }
    luhn_valid(&siret)
}

/// First 9 digits of a well-formed SIRET
pub fn siren_from_siret(input: &str) -> Option<String> {
    let siret = compact(input);
    has_digits(&siret, 14).then(|| siret[..9].to_string())
}

/// "123 456 789"; `None` unless the input has exactly 9 digits
pub fn format_siren(input: &str) -> Option<String> {
    let siren = compact(input);
    has_digits(&siren, 9).then(|| format!("{} {} {}", &siren[..3], &siren[3..6], &siren[6..]))
}

/// "123 456 789 00012"; `None` unless the input has exactly 14 digits
pub fn format_siret(input: &str) -> Option<String> {
    let siret = compact(input);
    has_digits(&siret, 14).then(|| {
        format!("{} {} {} {}", &siret[..3], &siret[3..6], &siret[6..9], &siret[9..])
    })
}

/// French VAT key: `(12 + 3 * (SIREN mod 97)) mod 97`
pub fn vat_key(siren: &str) -> Option<u32> {
    let siren = compact(siren);
    if !has_digits(&siren, 9) {
        return None;
    }
    let number: u64 = siren.parse().ok()?;
    Some(((12 + 3 * (number % 97)) % 97) as u32)
}

/// Intra-community VAT number derived from a valid SIREN: `FR` + key + SIREN
///
/// ```
/// use helpkit_common::organization::intracom_vat_number;
///
/// assert_eq!(intracom_vat_number("404 833 048").as_deref(), Some("FR83404833048"));
/// ```
pub fn intracom_vat_number(siren: &str) -> Option<String> {
    if !is_valid_siren(siren) {
        return None;
    }
    let key = vat_key(siren)?;
    Some(format!("FR{key:02}{}", compact(siren)))
}

/// VAT number of an organization: the stored one, else derived from its
/// SIREN (or the SIREN part of its SIRET)
pub fn intracom_vat(organization: &Organization) -> Option<String> {
    if let Some(vat) = organization.vat_number().map(str::trim).filter(|v| !v.is_empty()) {
        return Some(vat.to_string());
    }

    let siren = organization
        .siren()
        .map(compact)
        .or_else(|| organization.siret().and_then(siren_from_siret))?;
    intracom_vat_number(&siren)
}

#[cfg(test)]
mod tests {
    //! Unit tests for organization identifiers.
    use super::*;

    /// Validates `luhn_valid` for the reference scenario.
    ///
    /// Assertions:
    /// - Confirms known-good numbers pass.
    /// - Ensures a single altered digit fails.
    /// - Ensures non-digit input fails.
    #[test]
    fn test_luhn_valid() {
        assert!(luhn_valid("79927398713"));
        assert!(!luhn_valid("79927398710"));
        assert!(luhn_valid("0"));
        assert!(!luhn_valid(""));
        assert!(!luhn_valid("7992a398713"));
    }

    #[test]
    fn test_luhn_check_digit() {
        assert_eq!(luhn_check_digit("7992739871"), Some(3));
        assert_eq!(luhn_check_digit("40483304"), Some(8));
        assert_eq!(luhn_check_digit(""), None);
        assert_eq!(luhn_check_digit("12x"), None);
    }

    #[test]
    fn test_siren() {
        assert!(is_valid_siren("404833048"));
        assert!(is_valid_siren("404 833 048"));
        assert!(is_valid_siren("732829320"));
        assert!(!is_valid_siren("404833047"));
        assert!(!is_valid_siren("40483304"));
        assert!(!is_valid_siren("4048330480"));
    }

    /// Validates `is_valid_siret` for the La Poste exception.
    ///
    /// Assertions:
    /// - Confirms regular SIRETs follow Luhn.
    /// - Confirms La Poste SIRETs follow the digit-sum rule instead.
    #[test]
    fn test_siret() {
        assert!(is_valid_siret("73282932000074"));
        assert!(is_valid_siret("732 829 320 00074"));
        assert!(!is_valid_siret("73282932000075"));

        // digit sum 3+5+6+0+0+0+0+0+0+0+0+0+1+5 = 20
        assert!(is_valid_siret("35600000000015"));
        assert!(!luhn_valid("35600000000015"));
        assert!(!is_valid_siret("35600000000016"));
    }

    #[test]
    fn test_siren_from_siret() {
        assert_eq!(siren_from_siret("73282932000074").as_deref(), Some("732829320"));
        assert_eq!(siren_from_siret("7328293200007"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_siren("732829320").as_deref(), Some("732 829 320"));
        assert_eq!(format_siret("73282932000074").as_deref(), Some("732 829 320 00074"));
        assert_eq!(format_siren("abc"), None);
    }

    #[test]
    fn test_vat_key() {
        assert_eq!(vat_key("404833048"), Some(83));
        assert_eq!(vat_key("732829320"), Some(44));
        assert_eq!(vat_key("12"), None);
        assert_eq!(intracom_vat_number("732829320").as_deref(), Some("FR44732829320"));
        assert_eq!(intracom_vat_number("732829321"), None);
    }

    #[test]
    fn test_intracom_vat_for_organization() {
        let stored = Organization::new("A").with_vat_number(" FR00123456789 ").with_siren("732829320");
        assert_eq!(intracom_vat(&stored).as_deref(), Some("FR00123456789"));

        let from_siren = Organization::new("B").with_siren("732 829 320");
        assert_eq!(intracom_vat(&from_siren).as_deref(), Some("FR44732829320"));

        let from_siret = Organization::new("C").with_siret("73282932000074");
        assert_eq!(intracom_vat(&from_siret).as_deref(), Some("FR44732829320"));

        assert_eq!(intracom_vat(&Organization::new("D")), None);
    }
}
