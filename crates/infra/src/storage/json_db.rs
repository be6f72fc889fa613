//! JSON document store
//!
//! One pretty-printed `.json` file per document under a root directory.
//! Names may contain `/` to group documents in sub-directories; anything
//! that would resolve outside the root is refused with
//! [`HelpkitError::Security`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use helpkit_common::files::safe_join;
use helpkit_domain::constants::JSON_EXTENSION;
use helpkit_domain::{HelpkitError, Result};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::files::{ensure_dir, read_json, write_json};
use crate::errors::{io_error, to_helpkit};

static SHARED: Lazy<Mutex<HashMap<PathBuf, Arc<JsonDb>>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// File-backed document store with a read-through cache
#[derive(Debug)]
pub struct JsonDb {
    root: PathBuf,
    cache: RwLock<HashMap<String, Value>>,
}

impl JsonDb {
    /// Open (and create) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        info!(root = %root.display(), "JSON store opened");
        Ok(Self { root, cache: RwLock::new(HashMap::new()) })
    }

    /// Process-wide instance for `root`, opened on first use
    ///
    /// Callers asking for the same directory share one cache.
    pub fn shared(root: impl AsRef<Path>) -> Result<Arc<Self>> {
        let root = root.as_ref();
        ensure_dir(root)?;
        let key = fs::canonicalize(root).map_err(|e| io_error("resolve", root, e))?;

        let mut instances = SHARED.lock();
        if let Some(db) = instances.get(&key) {
            return Ok(Arc::clone(db));
        }
        let db = Arc::new(Self::open(key.clone())?);
        instances.insert(key, Arc::clone(&db));
        Ok(db)
    }

    /// Directory the documents live in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Typed document, `None` when it does not exist
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.get_value(name)? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|err| {
                HelpkitError::Serialization(format!("document '{name}' has an unexpected shape: {err}"))
            }),
            None => Ok(None),
        }
    }

    /// Raw document, served from the cache after the first read
    pub fn get_value(&self, name: &str) -> Result<Option<Value>> {
        let (key, path) = self.resolve(name)?;
        if let Some(value) = self.cache.read().get(&key) {
            return Ok(Some(value.clone()));
        }

        let value: Option<Value> = read_json(&path)?;
        if let Some(value) = &value {
            self.cache.write().insert(key, value.clone());
        }
        Ok(value)
    }

    /// Store `value` under `name`, replacing any previous document
    pub fn put<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let (key, path) = self.resolve(name)?;
        let value = serde_json::to_value(value).map_err(to_helpkit)?;

        // hold the write lock across the file write so readers never see a
        // cached value older than the file
        let mut cache = self.cache.write();
        write_json(&path, &value)?;
        debug!(document = %key, "JSON document stored");
        cache.insert(key, value);
        Ok(())
    }

    /// Remove a document; `false` when there was nothing to remove
    pub fn delete(&self, name: &str) -> Result<bool> {
        let (key, path) = self.resolve(name)?;
        let mut cache = self.cache.write();
        cache.remove(&key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(document = %key, "JSON document deleted");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(io_error("delete", &path, err)),
        }
    }

    /// Whether a document is stored under `name`
    pub fn exists(&self, name: &str) -> Result<bool> {
        let (key, path) = self.resolve(name)?;
        Ok(self.cache.read().contains_key(&key) || path.is_file())
    }

    /// Every document name, sorted, `/`-separated for nested documents
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        collect_names(&self.root, "", &mut names)?;
        names.sort();
        Ok(names)
    }

    /// Forget cached documents so the next reads hit the disk
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Normalized cache key and file path for `name`
    fn resolve(&self, name: &str) -> Result<(String, PathBuf)> {
        let trimmed = name.trim();
        let key = trimmed
            .strip_suffix(&format!(".{JSON_EXTENSION}"))
            .unwrap_or(trimmed)
            .to_string();
        if key.is_empty() {
            return Err(HelpkitError::InvalidInput("document name is empty".into()));
        }

        let path = safe_join(&self.root, &format!("{key}.{JSON_EXTENSION}"))?;
        Ok((key, path))
    }
}

fn collect_names(dir: &Path, prefix: &str, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| io_error("list", dir, e))? {
        let entry = entry.map_err(|e| io_error("list", dir, e))?;
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let file_type = entry.file_type().map_err(|e| io_error("stat", &path, e))?;

        if file_type.is_dir() {
            collect_names(&path, &format!("{prefix}{file_name}/"), names)?;
        } else if let Some(stem) = file_name.strip_suffix(&format!(".{JSON_EXTENSION}")) {
            if file_type.is_file() && !stem.is_empty() {
                names.push(format!("{prefix}{stem}"));
            }
        }
    }
    Ok(())
}
