//! File produced by a helper (export, vCard, report)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Metadata about a file written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    pub path: PathBuf,
    /// Name shown to users (download name)
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    /// Lowercase hex SHA-256 of the contents
    pub checksum: Option<String>,
}

impl OutputFile {
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            size: 0,
            checksum: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercase extension of the display name
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name).extension().and_then(|e| e.to_str()).map(str::to_lowercase)
    }

    /// Size in binary units, one decimal ("1.5 KB")
    pub fn human_size(&self) -> String {
        format_bytes(self.size)
    }
}

/// Format a byte count in binary units with one decimal ("1.5 KB")
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
