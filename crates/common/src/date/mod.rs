//! Date and time helpers
//!
//! - [`locale`]: month and weekday names
//! - [`format`]: token-based formatting and lenient parsing
//! - [`diff`]: relative differences, ages, business days and time zones

pub mod diff;
pub mod format;
pub mod locale;

use thiserror::Error;

pub use diff::{age, business_days_between, format_seconds, human_diff, is_weekend, to_timezone};
pub use format::{format_date, format_day, format_long, parse_date, DEFAULT_PARSE_FORMATS};
pub use locale::Locale;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateError {
    #[error("Unrecognized date: {0}")]
    InvalidFormat(String),

    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),
}

pub type DateResult<T> = Result<T, DateError>;
