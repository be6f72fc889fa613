//! Phone number parsing and formatting
//!
//! Covers the handful of regions the library deals with. Each region only
//! knows its calling code, trunk prefix and accepted national lengths; this
//! is enough to normalize user input to E.164 and print it back in the usual
//! local groupings, without full numbering-plan metadata.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phone number parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("Phone number is empty")]
    Empty,

    #[error("Phone number contains invalid characters: {0}")]
    InvalidCharacters(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Invalid length {length} for a {region} number")]
    InvalidLength { region: &'static str, length: usize },
}

/// Numbering facts for one region
#[derive(Debug, PartialEq, Eq)]
pub struct Region {
    /// ISO 3166-1 alpha-2
    pub code: &'static str,
    pub calling_code: &'static str,
    /// Digit dialled before the national number inside the country
    pub trunk_prefix: Option<&'static str>,
    pub national_lengths: RangeInclusive<usize>,
}

const fn region(
    code: &'static str,
    calling_code: &'static str,
    trunk_prefix: Option<&'static str>,
    national_lengths: RangeInclusive<usize>,
) -> Region {
    Region { code, calling_code, trunk_prefix, national_lengths }
}

static REGIONS: [Region; 11] = [
    region("FR", "33", Some("0"), 9..=9),
    region("BE", "32", Some("0"), 8..=9),
    region("CH", "41", Some("0"), 9..=9),
    region("LU", "352", None, 4..=11),
    region("DE", "49", Some("0"), 6..=11),
    region("ES", "34", None, 9..=9),
    region("IT", "39", None, 6..=11),
    region("GB", "44", Some("0"), 9..=10),
    region("US", "1", Some("1"), 10..=10),
    region("CA", "1", Some("1"), 10..=10),
    region("MC", "377", None, 8..=9),
];

/// Look a region up by its ISO code, case-insensitively
pub fn find_region(code: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.code.eq_ignore_ascii_case(code.trim()))
}

/// Supported region codes
pub fn supported_regions() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|r| r.code)
}

/// Output style for [`format_phone`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneFormat {
    /// `+33612345678`
    E164,
    /// `+33 6 12 34 56 78`
    #[default]
    International,
    /// `06 12 34 56 78`
    National,
    /// `tel:+33-6-12-34-56-78`
    Rfc3966,
}

helpkit_domain::impl_domain_keyword_conversions!(PhoneFormat {
    E164 => "e164",
    International => "international",
    National => "national",
    Rfc3966 => "rfc3966",
});

/// A parsed phone number: region plus national significant number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    region: &'static Region,
    national: String,
}

impl PhoneNumber {
    /// Parse user input
    ///
    /// Spaces, dots, dashes, slashes and parentheses are ignored. Numbers
    /// starting with `+` or `00` carry their calling code; anything else is
    /// read as a national number of `default_region`.
    ///
    /// # Errors
    ///
    /// See [`PhoneError`].
    pub fn parse(input: &str, default_region: &str) -> Result<Self, PhoneError> {
        let mut digits = String::with_capacity(input.len());
        let mut international = false;

        for c in input.trim().chars() {
            match c {
                '0'..='9' => digits.push(c),
                '+' if digits.is_empty() && !international => international = true,
                ' ' | '.' | '-' | '/' | '(' | ')' | '\u{a0}' => {}
                _ => return Err(PhoneError::InvalidCharacters(input.to_string())),
            }
        }

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        if international {
            Self::from_international(&digits, default_region)
        } else if let Some(rest) = digits.strip_prefix("00") {
            Self::from_international(rest, default_region)
        } else {
            let region = find_region(default_region)
                .ok_or_else(|| PhoneError::UnknownRegion(default_region.to_string()))?;
            Self::from_national(region, &digits)
        }
    }

    fn from_national(region: &'static Region, digits: &str) -> Result<Self, PhoneError> {
        let longest = *region.national_lengths.end();
        let national = match region.trunk_prefix {
            Some(trunk) if digits.starts_with(trunk) && (trunk == "0" || digits.len() > longest) => {
                &digits[trunk.len()..]
            }
            _ => digits,
        };

        if !region.national_lengths.contains(&national.len()) {
            return Err(PhoneError::InvalidLength { region: region.code, length: national.len() });
        }

        Ok(Self { region, national: national.to_string() })
    }

    fn from_international(digits: &str, default_region: &str) -> Result<Self, PhoneError> {
        for code_len in (1..=3).rev() {
            let Some(calling_code) = digits.get(..code_len) else {
                continue;
            };
            let candidates: Vec<&'static Region> =
                REGIONS.iter().filter(|r| r.calling_code == calling_code).collect();
            let Some(&first) = candidates.first() else {
                continue;
            };

            // Shared calling codes (NANP) resolve to the default region when it matches
            let region: &'static Region = candidates
                .iter()
                .copied()
                .find(|r| r.code.eq_ignore_ascii_case(default_region.trim()))
                .unwrap_or(first);

            // "+33 (0)6..." style input keeps a trunk zero after the code
            let rest = &digits[code_len..];
            let rest = match region.trunk_prefix {
                Some("0") if rest.len() > *region.national_lengths.end() => {
                    rest.strip_prefix('0').unwrap_or(rest)
                }
                _ => rest,
            };

            if !region.national_lengths.contains(&rest.len()) {
                return Err(PhoneError::InvalidLength { region: region.code, length: rest.len() });
            }
            return Ok(Self { region, national: rest.to_string() });
        }

        Err(PhoneError::UnknownRegion(format!("+{digits}")))
    }

    pub fn region_code(&self) -> &'static str {
        self.region.code
    }

    pub fn calling_code(&self) -> &'static str {
        self.region.calling_code
    }

    /// National significant number, without trunk prefix
    pub fn national_number(&self) -> &str {
        &self.national
    }

    /// `+33612345678`
    pub fn e164(&self) -> String {
        format!("+{}{}", self.region.calling_code, self.national)
    }

    /// `+33 6 12 34 56 78`
    pub fn international(&self) -> String {
        format!("+{} {}", self.region.calling_code, self.groups(&self.national).join(" "))
    }

    /// `06 12 34 56 78`, `(415) 555-2671` for North American numbers
    pub fn national(&self) -> String {
        let groups = self.groups(&self.national);
        match self.region.code {
            "US" | "CA" if groups.len() == 3 => {
                format!("({}) {}-{}", groups[0], groups[1], groups[2])
            }
            _ => match self.region.trunk_prefix {
                Some("0") => {
                    let dialled = format!("0{}", self.national);
                    self.groups(&dialled).join(" ")
                }
                _ => groups.join(" "),
            },
        }
    }

    /// `tel:+33-6-12-34-56-78`
    pub fn rfc3966(&self) -> String {
        format!("tel:+{}-{}", self.region.calling_code, self.groups(&self.national).join("-"))
    }

    pub fn format(&self, format: PhoneFormat) -> String {
        match format {
            PhoneFormat::E164 => self.e164(),
            PhoneFormat::International => self.international(),
            PhoneFormat::National => self.national(),
            PhoneFormat::Rfc3966 => self.rfc3966(),
        }
    }

    /// Mobile ranges by leading digits; always false for North America
    pub fn is_mobile(&self) -> bool {
        let n = self.national.as_str();
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| n.starts_with(p));
        match self.region.code {
            "FR" | "ES" => starts(&["6", "7"]),
            "BE" => n.len() == 9 && starts(&["4"]),
            "CH" => starts(&["75", "76", "77", "78", "79"]),
            "LU" => n.len() == 9 && starts(&["6"]),
            "DE" => starts(&["15", "16", "17"]),
            "IT" => starts(&["3"]),
            "GB" => starts(&["7"]),
            "MC" => starts(&["6"]),
            _ => false,
        }
    }

    fn groups<'a>(&self, digits: &'a str) -> Vec<&'a str> {
        let len = digits.len();
        let sizes: Vec<usize> = match self.region.code {
            "US" | "CA" if len == 10 => vec![3, 3, 4],
            "GB" if len == 10 => vec![4, 6],
            "GB" if len == 11 => vec![5, 6],
            _ => {
                let lead = if len % 2 == 1 { vec![1] } else { Vec::new() };
                lead.into_iter().chain(std::iter::repeat(2).take(len / 2)).collect()
            }
        };

        let mut out = Vec::with_capacity(sizes.len());
        let mut start = 0;
        for size in sizes {
            if start >= len {
                break;
            }
            let end = (start + size).min(len);
            out.push(&digits[start..end]);
            start = end;
        }
        if start < len {
            out.push(&digits[start..]);
        }
        out
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.e164())
    }
}

/// Parse and format in one go; `None` when the input does not parse
pub fn format_phone(input: &str, region: &str, format: PhoneFormat) -> Option<String> {
    match PhoneNumber::parse(input, region) {
        Ok(number) => Some(number.format(format)),
        Err(_err) => {
            #[cfg(feature = "observability")]
            tracing::debug!(error = %_err, region, "phone number rejected");
            None
        }
    }
}
