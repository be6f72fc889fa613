//! Application constants
//!
//! Centralized location for defaults shared by the configuration structs and
//! the infrastructure clients.

// Remote services
pub const DEFAULT_RECAPTCHA_ENDPOINT: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_VIES_ENDPOINT: &str =
    "https://ec.europa.eu/taxation_customs/vies/services/checkVatService";
pub const DEFAULT_DISTANCE_MATRIX_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";
pub const DEFAULT_RECAPTCHA_MIN_SCORE: f64 = 0.5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// Processes
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

// Files
pub const JSON_EXTENSION: &str = "json";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
