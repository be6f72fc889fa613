//! # Helpkit Infrastructure
//!
//! The impure half of Helpkit.
//!
//! This crate contains:
//! - An HTTP client with retries, and the reCAPTCHA, VIES and Distance
//!   Matrix clients built on it
//! - A shell command runner with timeouts
//! - Filesystem helpers and a JSON document store
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Depends on `helpkit-domain` for errors, configuration and data holders
//! - Depends on `helpkit-common` for the pure helpers (VAT parsing, path
//!   guarding, file names)
//! - Every failure is reported as `helpkit_domain::HelpkitError`

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod process;
pub mod storage;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::{DistanceMatrixClient, RecaptchaVerifier, ViesClient};
pub use observability::init_logging;
pub use process::Command;
pub use storage::JsonDb;
