//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Helpkit
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum HelpkitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HelpkitError {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Result type alias for Helpkit operations
pub type Result<T> = std::result::Result<T, HelpkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = HelpkitError::Security("path escapes root".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"type":"Security","message":"path escapes root"}"#);

        let back: HelpkitError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn display_includes_category() {
        let err = HelpkitError::Process("exit code 2".into());
        assert_eq!(err.to_string(), "Process error: exit code 2");
        assert!(!err.is_transient());
        assert!(HelpkitError::Network("timeout".into()).is_transient());
    }
}
