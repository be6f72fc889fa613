//! Filesystem helpers
//!
//! Every write goes through a temporary file in the target directory and is
//! renamed into place, so readers never observe a half-written file.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use helpkit_common::files::{mime_type_for, sanitize_file_name};
use helpkit_domain::{HelpkitError, OutputFile, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::{io_error, to_helpkit};

/// Create `dir` and its parents if missing
pub fn ensure_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| io_error("create directory", dir, e))
}

/// Replace `path` with `contents` in one rename
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| io_error("create temp file in", parent, e))?;
    temp.write_all(contents).map_err(|e| io_error("write", temp.path(), e))?;
    temp.as_file().sync_all().map_err(|e| io_error("sync", temp.path(), e))?;
    temp.persist(path).map_err(|e| io_error("persist", path, e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "file written");
    Ok(())
}

/// Contents of `path`, `None` when it does not exist
pub fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_error("read", path, err)),
    }
}

/// Deserialize a JSON file, `None` when it does not exist
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Option<T>> {
    let path = path.as_ref();
    let Some(contents) = read_optional(path)? else {
        return Ok(None);
    };
    serde_json::from_str(&contents).map(Some).map_err(|err| {
        HelpkitError::Serialization(format!("invalid JSON in {}: {err}", path.display()))
    })
}

/// Serialize `value` as pretty JSON and write it atomically
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let mut contents = serde_json::to_vec_pretty(value).map_err(to_helpkit)?;
    contents.push(b'\n');
    write_atomic(path, &contents)
}

/// Regular files directly under `dir`, sorted by path
///
/// `extension` is compared without the dot and ignoring case. A missing
/// directory yields an empty list.
pub fn list_files(dir: impl AsRef<Path>, extension: Option<&str>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_error("list", dir, err)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error("list", dir, e))?;
        let path = entry.path();
        if !entry.file_type().map_err(|e| io_error("stat", &path, e))?.is_file() {
            continue;
        }
        let matches = match extension {
            Some(wanted) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.'))),
            None => true,
        };
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Total size in bytes of the files below `dir`, symlinks not followed
pub fn dir_size(dir: impl AsRef<Path>) -> Result<u64> {
    let dir = dir.as_ref();
    let mut total = 0;
    for entry in fs::read_dir(dir).map_err(|e| io_error("list", dir, e))? {
        let entry = entry.map_err(|e| io_error("list", dir, e))?;
        let path = entry.path();
        let metadata = fs::symlink_metadata(&path).map_err(|e| io_error("stat", &path, e))?;
        if metadata.is_dir() {
            total += dir_size(&path)?;
        } else if metadata.is_file() {
            total += metadata.len();
        }
    }
    Ok(total)
}

/// Remove everything inside `dir` but keep the directory; returns the number
/// of top-level entries removed
pub fn clear_dir(dir: impl AsRef<Path>) -> Result<usize> {
    let dir = dir.as_ref();
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(|e| io_error("list", dir, e))? {
        let entry = entry.map_err(|e| io_error("list", dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_error("stat", &path, e))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| io_error("remove", &path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| io_error("remove", &path, e))?;
        }
        removed += 1;
    }
    debug!(dir = %dir.display(), removed, "directory cleared");
    Ok(removed)
}

/// Recursively copy `source` into `destination`; returns the number of files
/// copied. Symlinks are skipped.
pub fn copy_dir(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<u64> {
    let (source, destination) = (source.as_ref(), destination.as_ref());
    ensure_dir(destination)?;

    let mut copied = 0;
    for entry in fs::read_dir(source).map_err(|e| io_error("list", source, e))? {
        let entry = entry.map_err(|e| io_error("list", source, e))?;
        let from = entry.path();
        let to = destination.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| io_error("stat", &from, e))?;
        if file_type.is_dir() {
            copied += copy_dir(&from, &to)?;
        } else if file_type.is_file() {
            fs::copy(&from, &to).map_err(|e| io_error("copy", &from, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// First free path for `name` in `dir`: `report.pdf`, `report (1).pdf`, ...
pub fn unique_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    let dir = dir.as_ref();
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(name);
    let stem = as_path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let extension = as_path.extension().and_then(|e| e.to_str());
    (1..)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// SHA-256 of the file contents, lowercase hex
pub fn checksum(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| io_error("open", path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer).map_err(|e| io_error("read", path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Write generated content under `dir` and describe it
///
/// The name is sanitized and never overwrites an existing file.
pub fn create_output_file(dir: impl AsRef<Path>, name: &str, contents: &[u8]) -> Result<OutputFile> {
    let dir = dir.as_ref();
    ensure_dir(dir)?;

    let safe_name = sanitize_file_name(name);
    let path = unique_path(dir, &safe_name);
    write_atomic(&path, contents)?;

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or(&safe_name).to_string();
    let mime_type = mime_type_for(&file_name);
    Ok(OutputFile::new(path, file_name, mime_type)
        .with_size(u64::try_from(contents.len()).unwrap_or(u64::MAX))
        .with_checksum(hex::encode(Sha256::digest(contents))))
}
