//! Pure helpers shared across Helpkit crates.
//!
//! Nothing in this crate touches the network, the filesystem or child
//! processes; those live in `helpkit-infra`.
//!
//! # Feature Tiers
//!
//! - `foundation` (default): every helper module and the validation framework
//! - `observability`: `tracing` events from the parsing helpers

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "foundation")]
pub mod error;

#[cfg(feature = "foundation")]
pub mod arr;
#[cfg(feature = "foundation")]
pub mod color;
#[cfg(feature = "foundation")]
pub mod contact;
#[cfg(feature = "foundation")]
pub mod date;
#[cfg(feature = "foundation")]
pub mod files;
#[cfg(feature = "foundation")]
pub mod organization;
#[cfg(feature = "foundation")]
pub mod password;
#[cfg(feature = "foundation")]
pub mod validation;
#[cfg(feature = "foundation")]
pub mod vat;

#[cfg(feature = "foundation")]
pub use arr::{MultiSorter, SortCriterion};
#[cfg(feature = "foundation")]
pub use color::{Hsl, Hsv, Rgb};
#[cfg(feature = "foundation")]
pub use contact::{PhoneFormat, PhoneNumber, VCard};
#[cfg(feature = "foundation")]
pub use date::Locale;
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult};
#[cfg(feature = "foundation")]
pub use password::{PasswordStrength, PasswordStrengthEstimator};
#[cfg(feature = "foundation")]
pub use validation::{FieldValidator, ValidationError, ValidationResult, Validator};
#[cfg(feature = "foundation")]
pub use vat::VatNumber;
