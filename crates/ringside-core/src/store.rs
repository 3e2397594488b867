//! Local persistence tier.
//!
//! A [`LocalStore`] keeps one JSON document per key under a data directory.
//! It is synchronous, always available, and authoritative for the device's
//! immediate reads; the remote tier in [`crate::remote`] only ever mirrors
//! it. Writes replace the file atomically (temp file, sync, rename) so a
//! crash never leaves a half-written document behind.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use ringside_common::completion::CompletionMap;

/// Errors from the local tier.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document exists but does not parse.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No document stored under the key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// Key would escape the data directory.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Result type for local tier operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage key for a category's completion map: `<category>-progress`.
#[must_use]
pub fn progress_key(category: &str) -> String {
    format!("{category}-progress")
}

/// File-backed synchronous key/value store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Directory holding one `<key>.json` file per key.
    base_dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory. The directory is
    /// created lazily on first write.
    #[must_use]
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path for a key.
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Temp-file path used for atomic replacement.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json.tmp"))
    }

    /// Ensures the data directory exists.
    fn ensure_dir(&self) -> StoreResult<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)?;
        }
        Ok(())
    }

    /// Keys stay inside the data directory.
    fn check_key(key: &str) -> StoreResult<()> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    /// Whether a document exists for the key.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }

    /// Read the raw JSON text stored under a key.
    pub fn read_raw(&self, key: &str) -> StoreResult<String> {
        Self::check_key(key)?;
        let path = self.key_path(key);
        if !path.exists() {
            return Err(StoreError::NotFound(key.to_string()));
        }

        let mut file = fs::File::open(&path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        debug!("Read {} bytes from key {key}", contents.len());
        Ok(contents)
    }

    /// Write raw text under a key, replacing any previous document
    /// atomically.
    pub fn write_raw(&self, key: &str, contents: &str) -> StoreResult<()> {
        Self::check_key(key)?;
        self.ensure_dir()?;

        let temp_path = self.temp_path(key);
        let final_path = self.key_path(key);

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &final_path)?;

        debug!("Wrote {} bytes to key {key}", contents.len());
        Ok(())
    }

    /// Read and deserialize the document stored under a key.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<T> {
        let contents = self.read_raw(key)?;
        serde_json::from_str(&contents).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Serialize and write a document under a key.
    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let contents =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.write_raw(key, &contents)
    }

    /// Read a category's completion map via the `<category>-progress` key.
    pub fn read_progress(&self, category: &str) -> StoreResult<CompletionMap> {
        self.read_json(&progress_key(category))
    }

    /// Write a category's completion map via the `<category>-progress` key.
    pub fn write_progress(&self, category: &str, map: &CompletionMap) -> StoreResult<()> {
        self.write_json(&progress_key(category), map)
    }

    /// Delete the document stored under a key; deleting a missing key is
    /// not an error.
    pub fn delete(&self, key: &str) -> StoreResult<()> {
        Self::check_key(key)?;
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!("Deleted key {key}");
        }
        Ok(())
    }

    /// All stored keys, sorted.
    pub fn list_keys(&self) -> StoreResult<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(key) = name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }
        keys.sort_unstable();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_progress_key_pattern() {
        assert_eq!(progress_key("myrise"), "myrise-progress");
        assert_eq!(progress_key("achievements"), "achievements-progress");
    }

    #[test]
    fn test_progress_round_trip() {
        let (_dir, store) = temp_store();
        let map: CompletionMap = [("c1-a", true), ("c1-b", false)].into_iter().collect();

        store.write_progress("myrise", &map).expect("write");
        let loaded = store.read_progress("myrise").expect("read");
        assert_eq!(loaded, map);
        assert!(store.exists(&progress_key("myrise")));
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let (_dir, store) = temp_store();
        match store.read_progress("showcase") {
            Err(StoreError::NotFound(key)) => assert_eq!(key, "showcase-progress"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_overwrite_replaces_document() {
        let (_dir, store) = temp_store();
        let first: CompletionMap = [("a", true)].into_iter().collect();
        let second: CompletionMap = [("b", true)].into_iter().collect();

        store.write_progress("mygm", &first).expect("write");
        store.write_progress("mygm", &second).expect("overwrite");

        let loaded = store.read_progress("mygm").expect("read");
        assert!(!loaded.is_complete("a"));
        assert!(loaded.is_complete("b"));
    }

    #[test]
    fn test_corrupt_document_is_serialization_error() {
        let (_dir, store) = temp_store();
        store.write_raw("island-progress", "not json").expect("write");
        assert!(matches!(
            store.read_progress("island"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, store) = temp_store();
        let map: CompletionMap = [("a", true)].into_iter().collect();
        store.write_progress("myrise", &map).expect("write");

        store.delete(&progress_key("myrise")).expect("delete");
        assert!(!store.exists(&progress_key("myrise")));
        store.delete(&progress_key("myrise")).expect("redelete");
    }

    #[test]
    fn test_list_keys_sorted() {
        let (_dir, store) = temp_store();
        let map = CompletionMap::new();
        store.write_progress("showcase", &map).expect("write");
        store.write_progress("achievements", &map).expect("write");

        let keys = store.list_keys().expect("list");
        assert_eq!(keys, vec!["achievements-progress", "showcase-progress"]);
    }

    #[test]
    fn test_traversal_keys_rejected() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.write_raw("../escape", "{}"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.read_raw("a/b"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_list_keys_on_missing_dir_is_empty() {
        let dir = TempDir::new().expect("temp dir");
        let store = LocalStore::new(dir.path().join("never-created"));
        assert!(store.list_keys().expect("list").is_empty());
    }
}
