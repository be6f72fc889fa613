//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_DISTANCE_MATRIX_ENDPOINT, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_RECAPTCHA_ENDPOINT, DEFAULT_RECAPTCHA_MIN_SCORE, DEFAULT_VIES_ENDPOINT,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub recaptcha: RecaptchaConfig,
    pub vies: ViesConfig,
    pub distance_matrix: DistanceMatrixConfig,
    pub storage: StorageConfig,
    pub command: CommandConfig,
    pub logging: LoggingConfig,
}

/// reCAPTCHA verification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecaptchaConfig {
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    pub endpoint: String,
    /// Minimum v3 score accepted as human (ignored for v2 responses)
    pub min_score: f64,
    pub timeout_seconds: u64,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            secret: None,
            endpoint: DEFAULT_RECAPTCHA_ENDPOINT.to_string(),
            min_score: DEFAULT_RECAPTCHA_MIN_SCORE,
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// VIES VAT service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViesConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for ViesConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_VIES_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Distance Matrix API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceMatrixConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub language: String,
    pub timeout_seconds: u64,
}

impl Default for DistanceMatrixConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_DISTANCE_MATRIX_ENDPOINT.to_string(),
            language: "fr".to_string(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// JSON store and generated files location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub json_db_root: String,
    pub output_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { json_db_root: "var/db".to_string(), output_dir: "var/output".to_string() }
    }
}

/// Shell command defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub timeout_seconds: u64,
    pub shell: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self { timeout_seconds: DEFAULT_COMMAND_TIMEOUT_SECS, shell: "sh".to_string() }
    }
}

/// Logging output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
