//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from `HELPKIT_*` environment variables
//! 2. If none is set, falls back to loading from file
//! 3. Searches multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Without any file, every section keeps its defaults
//!
//! ## Environment Variables
//! - `HELPKIT_RECAPTCHA_SECRET`: reCAPTCHA secret key
//! - `HELPKIT_RECAPTCHA_ENDPOINT`: `siteverify` URL
//! - `HELPKIT_RECAPTCHA_MIN_SCORE`: minimum v3 score (0.0 - 1.0)
//! - `HELPKIT_VIES_ENDPOINT`: VIES SOAP service URL
//! - `HELPKIT_DISTANCE_MATRIX_API_KEY`: Google Maps API key
//! - `HELPKIT_DISTANCE_MATRIX_LANGUAGE`: language of the returned texts
//! - `HELPKIT_HTTP_TIMEOUT`: timeout in seconds for every HTTP service
//! - `HELPKIT_JSON_DB_ROOT`: JSON store directory
//! - `HELPKIT_OUTPUT_DIR`: generated files directory
//! - `HELPKIT_COMMAND_TIMEOUT`: shell command timeout in seconds
//! - `HELPKIT_COMMAND_SHELL`: shell used for command lines
//! - `HELPKIT_LOG_LEVEL`: default log filter
//! - `HELPKIT_LOG_JSON`: JSON log lines (true/false)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./helpkit.json` or `./helpkit.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use helpkit_domain::{Config, HelpkitError, Result};

const ENV_PREFIX: &str = "HELPKIT_";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If none is set, falls
/// back to a config file, and to defaults when no file exists either.
///
/// # Errors
/// Returns `HelpkitError::Config` if:
/// - An environment variable has an invalid value
/// - The config file format is invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(HelpkitError::Config(reason)) if reason.starts_with("No HELPKIT_") => {
            tracing::debug!("No environment configuration, trying file");
            match find_config_path() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No config file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from environment variables
///
/// Starts from defaults and overrides every field whose variable is set.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `HelpkitError::Config` if no `HELPKIT_*` variable is set or one
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    let mut applied = 0usize;

    let mut set_string = |key: &str, target: &mut String| {
        if let Some(value) = env_opt(key) {
            *target = value;
            applied += 1;
        }
    };
    set_string("HELPKIT_RECAPTCHA_ENDPOINT", &mut config.recaptcha.endpoint);
    set_string("HELPKIT_VIES_ENDPOINT", &mut config.vies.endpoint);
    set_string("HELPKIT_DISTANCE_MATRIX_LANGUAGE", &mut config.distance_matrix.language);
    set_string("HELPKIT_JSON_DB_ROOT", &mut config.storage.json_db_root);
    set_string("HELPKIT_OUTPUT_DIR", &mut config.storage.output_dir);
    set_string("HELPKIT_COMMAND_SHELL", &mut config.command.shell);
    set_string("HELPKIT_LOG_LEVEL", &mut config.logging.level);

    if let Some(secret) = env_opt("HELPKIT_RECAPTCHA_SECRET") {
        config.recaptcha.secret = Some(secret);
        applied += 1;
    }
    if let Some(key) = env_opt("HELPKIT_DISTANCE_MATRIX_API_KEY") {
        config.distance_matrix.api_key = Some(key);
        applied += 1;
    }
    if let Some(score) = env_parse::<f64>("HELPKIT_RECAPTCHA_MIN_SCORE")? {
        if !(0.0..=1.0).contains(&score) {
            return Err(HelpkitError::Config(format!(
                "Invalid HELPKIT_RECAPTCHA_MIN_SCORE: {score} is outside 0.0..=1.0"
            )));
        }
        config.recaptcha.min_score = score;
        applied += 1;
    }
    if let Some(seconds) = env_parse::<u64>("HELPKIT_HTTP_TIMEOUT")? {
        config.recaptcha.timeout_seconds = seconds;
        config.vies.timeout_seconds = seconds;
        config.distance_matrix.timeout_seconds = seconds;
        applied += 1;
    }
    if let Some(seconds) = env_parse::<u64>("HELPKIT_COMMAND_TIMEOUT")? {
        config.command.timeout_seconds = seconds;
        applied += 1;
    }
    if let Some(json) = env_opt("HELPKIT_LOG_JSON") {
        config.logging.json = parse_bool(&json);
        applied += 1;
    }

    if applied == 0 {
        return Err(HelpkitError::Config(format!("No {ENV_PREFIX}* environment variables set")));
    }
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`find_config_path`].
///
/// # Errors
/// Returns `HelpkitError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HelpkitError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            HelpkitError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HelpkitError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HelpkitError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HelpkitError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(HelpkitError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./helpkit.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_path() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.is_file())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("helpkit.json"),
        dir.join("helpkit.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `HelpkitError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| HelpkitError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: &[&str] = &[
        "HELPKIT_RECAPTCHA_SECRET",
        "HELPKIT_RECAPTCHA_ENDPOINT",
        "HELPKIT_RECAPTCHA_MIN_SCORE",
        "HELPKIT_VIES_ENDPOINT",
        "HELPKIT_DISTANCE_MATRIX_API_KEY",
        "HELPKIT_DISTANCE_MATRIX_LANGUAGE",
        "HELPKIT_HTTP_TIMEOUT",
        "HELPKIT_JSON_DB_ROOT",
        "HELPKIT_OUTPUT_DIR",
        "HELPKIT_COMMAND_TIMEOUT",
        "HELPKIT_COMMAND_SHELL",
        "HELPKIT_LOG_LEVEL",
        "HELPKIT_LOG_JSON",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_parse_bool() {
        for value in ["1", "true", "YES", " on "] {
            assert!(parse_bool(value), "{value}");
        }
        for value in ["0", "false", "no", "off", "maybe"] {
            assert!(!parse_bool(value), "{value}");
        }
    }

    #[test]
    fn test_load_from_env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HELPKIT_RECAPTCHA_SECRET", "s3cr3t");
        std::env::set_var("HELPKIT_RECAPTCHA_MIN_SCORE", "0.7");
        std::env::set_var("HELPKIT_HTTP_TIMEOUT", "3");
        std::env::set_var("HELPKIT_JSON_DB_ROOT", "/srv/helpkit/db");
        std::env::set_var("HELPKIT_LOG_JSON", "true");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.recaptcha.secret.as_deref(), Some("s3cr3t"));
        assert!((config.recaptcha.min_score - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.vies.timeout_seconds, 3);
        assert_eq!(config.distance_matrix.timeout_seconds, 3);
        assert_eq!(config.storage.json_db_root, "/srv/helpkit/db");
        assert_eq!(config.storage.output_dir, "var/output");
        assert!(config.logging.json);
        assert_eq!(config.command.shell, "sh");
    }

    #[test]
    fn test_load_from_env_without_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, HelpkitError::Config(msg) if msg.starts_with("No HELPKIT_")));
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HELPKIT_COMMAND_TIMEOUT", "soon");
        let invalid_number = load_from_env();
        std::env::set_var("HELPKIT_COMMAND_TIMEOUT", "30");
        std::env::set_var("HELPKIT_RECAPTCHA_MIN_SCORE", "1.5");
        let out_of_range = load_from_env();
        let through_load = load();
        clear_env();

        assert!(matches!(invalid_number, Err(HelpkitError::Config(msg)) if msg.contains("HELPKIT_COMMAND_TIMEOUT")));
        assert!(matches!(out_of_range, Err(HelpkitError::Config(_))));
        assert!(through_load.is_err(), "invalid variables must not fall back to a file");
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "vies": {"timeout_seconds": 4},
                "command": {"shell": "bash"}
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("config from JSON");
        assert_eq!(config.vies.timeout_seconds, 4);
        assert_eq!(config.command.shell, "bash");
        assert_eq!(config.command.timeout_seconds, 60);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = temp_config(
            r#"
[distance_matrix]
api_key = "maps-key"
language = "en"

[logging]
level = "debug"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("config from TOML");
        assert_eq!(config.distance_matrix.api_key.as_deref(), Some("maps-key"));
        assert_eq!(config.distance_matrix.language, "en");
        assert_eq!(config.logging.level, "debug");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(HelpkitError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = temp_config(r#"{ "this is": "not valid json" "#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(matches!(result, Err(HelpkitError::Config(msg)) if msg.starts_with("Invalid JSON")));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some: content", Path::new("config.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_candidates_in_order() {
        let candidates = candidates_in(Path::new("/app"));
        assert_eq!(candidates[0], PathBuf::from("/app/config.json"));
        assert_eq!(candidates[3], PathBuf::from("/app/helpkit.toml"));
        assert_eq!(candidates.len(), 8);
    }
}
