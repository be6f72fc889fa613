//! External service integrations
//!
//! Each client consumes a public wire format as-is: the reCAPTCHA
//! `siteverify` form endpoint, the Distance Matrix JSON API and the VIES
//! SOAP service. All of them go through [`crate::http::HttpClient`], so
//! server errors and dropped connections are retried with backoff.

pub mod distance_matrix;
pub mod recaptcha;
pub mod vies;

pub use distance_matrix::{Distance, DistanceMatrix, DistanceMatrixClient};
pub use recaptcha::{RecaptchaResponse, RecaptchaVerifier};
pub use vies::{VatCheckResult, ViesClient};
