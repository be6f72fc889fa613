//! EU VAT number syntax checks
//!
//! Covers the 27 member states plus Northern Ireland (`XI`). Greece uses
//! the `EL` prefix; `GR` is accepted on input and rewritten. Only the
//! French key is verified arithmetically; other countries are checked for
//! shape. Whether a number is actually registered is a question for VIES.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::organization::vat_key;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VatError {
    #[error("VAT number is empty")]
    Empty,

    #[error("Unsupported VAT country prefix: {0}")]
    UnknownCountry(String),

    #[error("Malformed VAT number: {0}")]
    InvalidFormat(String),

    #[error("Wrong French VAT key: {0}")]
    InvalidKey(String),
}

const SYNTAX: [(&str, &str); 28] = [
    ("AT", r"U\d{8}"),
    ("BE", r"[01]\d{9}"),
    ("BG", r"\d{9,10}"),
    ("CY", r"\d{8}[A-Z]"),
    ("CZ", r"\d{8,10}"),
    ("DE", r"\d{9}"),
    ("DK", r"\d{8}"),
    ("EE", r"\d{9}"),
    ("EL", r"\d{9}"),
    ("ES", r"[A-Z0-9]\d{7}[A-Z0-9]"),
    ("FI", r"\d{8}"),
    ("FR", r"[A-HJ-NP-Z0-9]{2}\d{9}"),
    ("HR", r"\d{11}"),
    ("HU", r"\d{8}"),
    ("IE", r"\d{7}[A-W][A-I]?|\d[A-Z+*]\d{5}[A-W]"),
    ("IT", r"\d{11}"),
    ("LT", r"\d{9}|\d{12}"),
    ("LU", r"\d{8}"),
    ("LV", r"\d{11}"),
    ("MT", r"\d{8}"),
    ("NL", r"\d{9}B\d{2}"),
    ("PL", r"\d{10}"),
    ("PT", r"\d{9}"),
    ("RO", r"\d{2,10}"),
    ("SE", r"\d{12}"),
    ("SI", r"\d{8}"),
    ("SK", r"\d{10}"),
    ("XI", r"\d{9}|\d{12}|GD\d{3}|HA\d{3}"),
];

static PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    SYNTAX
        .iter()
        .filter_map(|(country, pattern)| {
            Regex::new(&format!("^(?:{pattern})$")).ok().map(|regex| (*country, regex))
        })
        .collect()
});

/// A syntactically valid VAT number split into prefix and national part
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VatNumber {
    country: String,
    number: String,
}

impl VatNumber {
    /// Normalize and check a VAT number
    ///
    /// Case is ignored, spaces, dots and dashes are dropped.
    ///
    /// # Errors
    ///
    /// See [`VatError`].
    pub fn parse(input: &str) -> Result<Self, VatError> {
        let compact: String = input
            .chars()
            .filter(|c| !matches!(c, ' ' | '\u{a0}' | '.' | '-'))
            .collect::<String>()
            .to_uppercase();

        if compact.is_empty() {
            return Err(VatError::Empty);
        }
        let (prefix, number) = match (compact.get(..2), compact.get(2..)) {
            (Some(prefix), Some(number)) => (prefix, number),
            _ => return Err(VatError::InvalidFormat(input.to_string())),
        };
        let country = if prefix == "GR" { "EL" } else { prefix };

        let pattern = PATTERNS.get(country).ok_or_else(|| VatError::UnknownCountry(prefix.to_string()))?;
        if !pattern.is_match(number) {
            return Err(VatError::InvalidFormat(input.to_string()));
        }

        if country == "FR" && !french_key_matches(number) {
            return Err(VatError::InvalidKey(input.to_string()));
        }

        Ok(Self { country: country.to_string(), number: number.to_string() })
    }

    /// Two-letter prefix as used by VIES (`EL` for Greece)
    pub fn country_code(&self) -> &str {
        &self.country
    }

    /// National part without the prefix
    pub fn number(&self) -> &str {
        &self.number
    }
}

/// Numeric French keys must match the SIREN; alphanumeric keys are older
/// formats that cannot be recomputed
fn french_key_matches(number: &str) -> bool {
    let (key, siren) = number.split_at(2);
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    matches!((key.parse::<u32>(), vat_key(siren)), (Ok(given), Some(expected)) if given == expected)
}

impl fmt::Display for VatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.country, self.number)
    }
}

impl FromStr for VatNumber {
    type Err = VatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pub fn is_valid_vat_format(input: &str) -> bool {
    VatNumber::parse(input).is_ok()
}

/// Prefixes accepted by [`VatNumber::parse`]
pub fn supported_countries() -> impl Iterator<Item = &'static str> {
    SYNTAX.iter().map(|(country, _)| *country)
}
