//! Heuristic password strength estimator
//!
//! The score starts from length (one point at the minimum length, 12 and 16
//! characters) and variety (one point for three character classes, another
//! for all four). Repeats, sequences and personal data cost points. Common
//! passwords score 0 whatever their shape, as do passwords built from two
//! distinct characters or fewer. Passwords shorter than the minimum never
//! score above 1.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::PasswordStrength;

const DEFAULT_MIN_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "123456", "123456789", "12345678", "12345", "1234567", "1234567890", "111111", "000000",
    "123123", "654321", "password", "password1", "passw0rd", "motdepasse", "azerty", "azertyuiop",
    "qwerty", "qwerty123", "qwertyuiop", "abc123", "1q2w3e4r", "zaq12wsx", "letmein", "welcome",
    "admin", "administrator", "iloveyou", "jetaime", "monkey", "dragon", "sunshine", "princess",
    "football", "baseball", "soleil", "bonjour", "doudou", "loulou", "chouchou", "marseille",
    "master", "shadow", "superman", "starwars", "trustno1", "hello123", "changeme", "secret",
];

const KEYBOARD_RUNS: &[&str] = &["qwerty", "azerty", "qwertz", "asdfgh", "qsdfgh", "zxcvbn", "wxcvbn"];

/// Result of [`PasswordStrengthEstimator::estimate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordScore {
    /// 0 (very weak) to 4 (very strong)
    pub score: u8,
    pub strength: PasswordStrength,
    /// Suggestions, empty for a perfect score
    pub feedback: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PasswordStrengthEstimator {
    min_length: usize,
    common: HashSet<String>,
    user_inputs: Vec<String>,
}

impl Default for PasswordStrengthEstimator {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            common: COMMON_PASSWORDS.iter().map(|p| (*p).to_string()).collect(),
            user_inputs: Vec::new(),
        }
    }
}

impl PasswordStrengthEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Extend the built-in common password list
    pub fn with_common_passwords<I, S>(mut self, passwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.common.extend(passwords.into_iter().map(|p| p.as_ref().to_lowercase()));
        self
    }

    /// Personal data that must not appear in the password (name, email, ...)
    ///
    /// Email addresses contribute their local part. Inputs shorter than
    /// three characters are ignored.
    pub fn with_user_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for input in inputs {
            let lowered = input.as_ref().trim().to_lowercase();
            let local = lowered.split('@').next().unwrap_or_default().to_string();
            for candidate in [lowered, local] {
                if candidate.chars().count() >= 3 && !self.user_inputs.contains(&candidate) {
                    self.user_inputs.push(candidate);
                }
            }
        }
        self
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn estimate(&self, password: &str) -> PasswordScore {
        let mut feedback = Vec::new();
        let length = password.chars().count();

        if length == 0 {
            return score(0, vec!["Password is empty".to_string()]);
        }
        if self.is_common(password) {
            return score(0, vec!["Avoid common passwords".to_string()]);
        }

        let distinct: HashSet<char> = password.chars().collect();
        if distinct.len() <= 2 {
            return score(0, vec!["Avoid repeated characters".to_string()]);
        }

        let mut points: i32 = [self.min_length, 12, 16].iter().filter(|&&tier| length >= tier).count() as i32;
        if length < self.min_length {
            feedback.push(format!("Use at least {} characters", self.min_length));
        } else if length < 12 {
            feedback.push("Add more words or characters".to_string());
        }

        let classes = character_classes(password);
        if classes >= 3 {
            points += 1;
        }
        if classes == 4 {
            points += 1;
        } else {
            feedback.push("Mix uppercase, lowercase, digits and symbols".to_string());
        }

        let lowered = password.to_lowercase();
        if has_repeat(&lowered) {
            points -= 1;
            feedback.push("Avoid repeated characters".to_string());
        }
        if has_sequence(&lowered) {
            points -= 1;
            feedback.push("Avoid sequences like abc or 123".to_string());
        }
        if self.user_inputs.iter().any(|input| lowered.contains(input.as_str())) {
            points -= 2;
            feedback.push("Avoid using your name or email".to_string());
        }

        if length < self.min_length {
            points = points.min(1);
        }

        score(points.clamp(0, 4) as u8, feedback)
    }

    /// Exact match after lowercasing, with trailing digits and symbols
    /// stripped, or once common character substitutions are undone
    fn is_common(&self, password: &str) -> bool {
        let lowered = password.to_lowercase();
        let stripped = lowered.trim_end_matches(|c: char| !c.is_alphabetic()).to_string();

        [deleet(&lowered), deleet(&stripped), lowered, stripped]
            .iter()
            .any(|candidate| !candidate.is_empty() && self.common.contains(candidate))
    }
}

fn score(points: u8, feedback: Vec<String>) -> PasswordScore {
    PasswordScore { score: points, strength: PasswordStrength::from_score(points), feedback }
}

fn deleet(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '@' | '4' => 'a',
            '3' => 'e',
            '1' | '!' => 'i',
            '0' => 'o',
            '$' | '5' => 's',
            '7' => 't',
            c => c,
        })
        .collect()
}

fn character_classes(password: &str) -> usize {
    let mut classes = [false; 4];
    for c in password.chars() {
        let slot = if c.is_lowercase() {
            0
        } else if c.is_uppercase() {
            1
        } else if c.is_numeric() {
            2
        } else {
            3
        };
        classes[slot] = true;
    }
    classes.iter().filter(|&&present| present).count()
}

/// Three identical characters in a row
fn has_repeat(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Three consecutive letters or digits (`abc`, `321`) or a keyboard row
fn has_sequence(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let stepped = chars.windows(3).any(|w| {
        if !w.iter().all(char::is_ascii_alphanumeric) {
            return false;
        }
        let (a, b, c) = (w[0] as i32, w[1] as i32, w[2] as i32);
        (b - a == 1 && c - b == 1) || (a - b == 1 && b - c == 1)
    });

    stepped || KEYBOARD_RUNS.iter().any(|run| text.contains(run))
}
