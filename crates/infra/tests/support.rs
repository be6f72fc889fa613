//! Shared helpers for the infra integration tests

use std::path::{Path, PathBuf};
use std::time::Duration;

use helpkit_infra::HttpClient;

/// Write `contents` to `dir/name` and return the path
#[allow(dead_code)]
pub fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("config file should be written");
    path
}

/// HTTP client that fails fast: one attempt, short timeout
#[allow(dead_code)]
pub fn single_attempt_client() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .max_attempts(1)
        .build()
        .expect("http client should build")
}
