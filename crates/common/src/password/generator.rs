//! Random password generation

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::PasswordError;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%&*()-_=+[]{};:,.?/";
/// Characters easily confused when read aloud or printed
const AMBIGUOUS: &str = "Il1O0o";

/// Character classes a generated password must contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { lowercase: true, uppercase: true, digits: true, symbols: true, exclude_ambiguous: false }
    }
}

impl PasswordPolicy {
    /// Letters and digits only
    pub fn alphanumeric() -> Self {
        Self { symbols: false, ..Self::default() }
    }

    fn classes(&self) -> Vec<Vec<char>> {
        [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, set)| {
            set.chars().filter(|c| !(self.exclude_ambiguous && AMBIGUOUS.contains(*c))).collect()
        })
        .collect()
    }
}

/// Generate a password of `length` characters with at least one character
/// of every enabled class
///
/// # Errors
///
/// [`PasswordError::NoCharacterClass`] when the policy enables nothing,
/// [`PasswordError::TooShort`] when `length` cannot fit one character per
/// class.
pub fn generate_password(length: usize, policy: PasswordPolicy) -> Result<String, PasswordError> {
    generate_with(&mut rand::thread_rng(), length, policy)
}

fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    policy: PasswordPolicy,
) -> Result<String, PasswordError> {
    let classes = policy.classes();
    if classes.is_empty() {
        return Err(PasswordError::NoCharacterClass);
    }
    if length < classes.len() {
        return Err(PasswordError::TooShort { length, required: classes.len() });
    }

    let pool: Vec<char> = classes.iter().flatten().copied().collect();
    let mut chars: Vec<char> = classes.iter().filter_map(|class| class.choose(rng).copied()).collect();
    while chars.len() < length {
        if let Some(&c) = pool.choose(rng) {
            chars.push(c);
        }
    }
    chars.shuffle(rng);

    Ok(chars.into_iter().collect())
}
