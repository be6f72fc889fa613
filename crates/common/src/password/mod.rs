//! Password strength estimation and generation

pub mod estimator;
pub mod generator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use estimator::{PasswordScore, PasswordStrengthEstimator};
pub use generator::{generate_password, PasswordPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password policy enables no character class")]
    NoCharacterClass,

    #[error("Length {length} is too short for {required} required character classes")]
    TooShort { length: usize, required: usize },
}

/// Strength bucket matching the 0..=4 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

helpkit_domain::impl_domain_keyword_conversions!(PasswordStrength {
    VeryWeak => "very_weak",
    Weak => "weak",
    Medium => "medium",
    Strong => "strong",
    VeryStrong => "very_strong",
});

impl PasswordStrength {
    /// Scores above 4 saturate to `VeryStrong`
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => Self::VeryWeak,
            1 => Self::Weak,
            2 => Self::Medium,
            3 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }

    pub fn score(self) -> u8 {
        self as u8
    }
}
