//! Field validators for business identifiers, phones, passwords and colors
//!
//! All of them accept blank input unless `.required()` is set, so optional
//! form fields can share the same validator as mandatory ones.

use super::validators::delegate_string_validator;
use super::FieldValidator;
use crate::color::is_hex_color;
use crate::contact::PhoneNumber;
use crate::organization::{is_valid_naf, is_valid_siren, is_valid_siret};
use crate::password::{PasswordStrength, PasswordStrengthEstimator};
use crate::vat::{VatError, VatNumber};

const BLANK_MESSAGE: &str = "This value should not be blank";

/// `Some(result)` when blank input settles the outcome
fn check_blank(value: &str, required: bool) -> Option<Result<(), String>> {
    if !value.trim().is_empty() {
        return None;
    }
    Some(if required { Err(BLANK_MESSAGE.to_string()) } else { Ok(()) })
}

/// Declares a validator whose only setting is `required`
macro_rules! identifier_validator {
    ($(#[$meta:meta])* $name:ident, $check:path, $message:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name {
            required: bool,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn required(mut self) -> Self {
                self.required = true;
                self
            }
        }

        impl FieldValidator<str> for $name {
            fn validate(&self, value: &str) -> Result<(), String> {
                if let Some(result) = check_blank(value, self.required) {
                    return result;
                }
                if $check(value) {
                    Ok(())
                } else {
                    Err($message.to_string())
                }
            }
        }
    };
}

identifier_validator!(
    /// Nine-digit SIREN with a valid Luhn key; spaces are tolerated
    SirenValidator,
    is_valid_siren,
    "This value is not a valid SIREN number"
);

identifier_validator!(
    /// Fourteen-digit SIRET, including the La Poste exception
    SiretValidator,
    is_valid_siret,
    "This value is not a valid SIRET number"
);

identifier_validator!(
    /// NAF/APE code of a known division
    NafValidator,
    is_valid_naf,
    "This value is not a valid NAF code"
);

identifier_validator!(
    /// `#rgb` or `#rrggbb` color, the leading `#` optional
    HexColorValidator,
    is_hex_color,
    "This value is not a valid hexadecimal color"
);

/// EU VAT number syntax, with the French key checked against the SIREN
#[derive(Debug, Clone, Copy, Default)]
pub struct VatNumberValidator {
    required: bool,
}

impl VatNumberValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl FieldValidator<str> for VatNumberValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if let Some(result) = check_blank(value, self.required) {
            return result;
        }
        match VatNumber::parse(value) {
            Ok(_) => Ok(()),
            Err(VatError::UnknownCountry(prefix)) => {
                Err(format!("VAT numbers with prefix {prefix} are not supported"))
            }
            Err(VatError::InvalidKey(_)) => {
                Err("The key of this VAT number does not match its SIREN".to_string())
            }
            Err(_) => Err("This value is not a valid VAT number".to_string()),
        }
    }
}

/// Phone number dialable from `region`, optionally restricted to mobiles
#[derive(Debug, Clone)]
pub struct PhoneValidator {
    region: String,
    mobile_only: bool,
    required: bool,
}

impl PhoneValidator {
    /// `region` is the ISO 3166 code used for national input (`FR`)
    pub fn new(region: impl Into<String>) -> Self {
        Self { region: region.into(), mobile_only: false, required: false }
    }

    pub fn mobile_only(mut self) -> Self {
        self.mobile_only = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl FieldValidator<str> for PhoneValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if let Some(result) = check_blank(value, self.required) {
            return result;
        }
        let number = PhoneNumber::parse(value, &self.region)
            .map_err(|_| "This value is not a valid phone number".to_string())?;
        if self.mobile_only && !number.is_mobile() {
            return Err("This value is not a valid mobile phone number".to_string());
        }
        Ok(())
    }
}

/// Minimum estimated password strength
#[derive(Debug, Clone)]
pub struct PasswordStrengthValidator {
    min_strength: PasswordStrength,
    estimator: PasswordStrengthEstimator,
    required: bool,
}

impl Default for PasswordStrengthValidator {
    fn default() -> Self {
        Self::new(PasswordStrength::Medium)
    }
}

impl PasswordStrengthValidator {
    pub fn new(min_strength: PasswordStrength) -> Self {
        Self { min_strength, estimator: PasswordStrengthEstimator::new(), required: false }
    }

    /// Use a configured estimator (user inputs, minimum length)
    pub fn with_estimator(mut self, estimator: PasswordStrengthEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl FieldValidator<str> for PasswordStrengthValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if let Some(result) = check_blank(value, self.required) {
            return result;
        }
        let estimate = self.estimator.estimate(value);
        if estimate.strength >= self.min_strength {
            return Ok(());
        }
        match estimate.feedback.first() {
            Some(hint) => Err(format!("The password strength is too low. {hint}")),
            None => Err("The password strength is too low".to_string()),
        }
    }
}

delegate_string_validator!(
    SirenValidator,
    SiretValidator,
    NafValidator,
    HexColorValidator,
    VatNumberValidator,
    PhoneValidator,
    PasswordStrengthValidator,
);
