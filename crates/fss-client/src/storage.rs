//! Key/value storage backing the token store.
//!
//! Two implementations are provided: [`FileStorage`] persists a flat JSON
//! object to disk, [`MemoryStorage`] keeps entries in process memory.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Default file name for persisted session state.
pub const SESSION_FILE: &str = "session.json";

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("corrupt storage file '{path}': {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },
}

/// Persistent string key/value storage.
pub trait Storage: Send + Sync + fmt::Debug {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove several keys in as few storage operations as possible.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

// ============================================================================
// MemoryStorage
// ============================================================================

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

// ============================================================================
// FileStorage
// ============================================================================

/// File-backed storage holding a single JSON object of string values.
///
/// Each mutation rewrites the whole file through a temporary file and a
/// rename, so a crash never leaves a half-written document behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Storage at `<data_dir>/session.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(SESSION_FILE))
    }

    /// Storage at an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.display_path(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.display_path(),
            source,
        })
    }

    /// Load for modification. A corrupt file is replaced rather than
    /// blocking every later write.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load() {
            Err(StorageError::Corrupt { path, source }) => {
                tracing::warn!(%path, error = %source, "Discarding corrupt session file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.display_path(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|source| {
            StorageError::Corrupt {
                path: self.display_path(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(write_err)?;

        // Session tokens are readable by the owner only (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&tmp).map_err(write_err)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&tmp, perms).map_err(write_err)?;
        }

        std::fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_all(&[key])
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load_for_write()?;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() == before && self.path.exists() {
            return Ok(());
        }
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set("authToken", "abc").unwrap();
        assert_eq!(storage.get("authToken").unwrap().as_deref(), Some("abc"));

        storage.remove("authToken").unwrap();
        assert!(storage.get("authToken").unwrap().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let temp = tempdir().unwrap();
        FileStorage::new(temp.path()).set("user", "{}").unwrap();

        let reopened = FileStorage::new(temp.path());
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_storage_missing_file_reads_empty() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(&temp.path().join("nested"));
        assert!(storage.get("authToken").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_remove_all_keeps_other_keys() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path());
        storage.set("authToken", "a").unwrap();
        storage.set("refreshToken", "r").unwrap();
        storage.set("theme", "dark").unwrap();

        storage.remove_all(&["authToken", "refreshToken"]).unwrap();

        assert!(storage.get("authToken").unwrap().is_none());
        assert!(storage.get("refreshToken").unwrap().is_none());
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path());
        storage.set("authToken", "secret").unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let temp = tempdir().unwrap();
        let storage = FileStorage::new(temp.path());
        std::fs::write(storage.path(), "{not json").unwrap();

        assert!(matches!(
            storage.get("authToken"),
            Err(StorageError::Corrupt { .. })
        ));

        // Writes recover by starting from an empty document.
        storage.set("authToken", "fresh").unwrap();
        assert_eq!(storage.get("authToken").unwrap().as_deref(), Some("fresh"));
    }
}
