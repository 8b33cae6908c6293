//! Key-value store wrapper with automatic serialization.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// Raw string storage under string keys.
///
/// Last write wins; there are no transactions.
pub trait KvBackend: Send + Sync {
    /// Read the raw value under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Replace the raw value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove `key`; removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// All stored keys, sorted.
    fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Check whether `key` holds a value.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Process-local backend; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = self.entries().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Directory backend storing each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CacheError::OpenError {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::StoreError {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        // Write to a sibling temp file, then rename over the slot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| CacheError::StoreError {
                key: key.to_string(),
                source,
            })
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::StoreError {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| CacheError::StoreError {
            key: "*".to_string(),
            source,
        })?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map_or(false, |e| e == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Type-safe cache over a [`KvBackend`].
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn KvBackend>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap any backend.
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Open an in-memory cache.
    pub fn open_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Open a directory-backed cache.
    pub fn open_dir(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(FileBackend::open(dir)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist and
    /// [`CacheError::Corrupt`] if the stored JSON doesn't parse as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| CacheError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }

    /// Read the raw stored string.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.backend.get(key)
    }

    /// Store a raw string without validation.
    pub fn set_raw(&self, key: &str, raw: &str) -> Result<(), CacheError> {
        self.backend.set(key, raw)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.backend.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip_and_delete() {
        let cache = Cache::open_memory();
        cache.set("viewed", &vec!["p1", "p2"]).unwrap();
        assert!(cache.exists("viewed").unwrap());
        assert_eq!(
            cache.get::<Vec<String>>("viewed").unwrap(),
            Some(vec!["p1".to_string(), "p2".to_string()])
        );

        cache.delete("viewed").unwrap();
        cache.delete("viewed").unwrap();
        assert_eq!(cache.get::<Vec<String>>("viewed").unwrap(), None);
    }

    #[test]
    fn test_corrupt_value_names_key() {
        let cache = Cache::open_memory();
        cache.set_raw("chats", "{not json").unwrap();
        let err = cache.get::<Vec<String>>("chats").unwrap_err();
        assert!(matches!(err, CacheError::Corrupt { ref key, .. } if key == "chats"));
    }

    #[test]
    fn test_clones_share_backend() {
        let cache = Cache::open_memory();
        let other = cache.clone();
        cache.set("favorites", &["p3"]).unwrap();
        assert_eq!(other.keys().unwrap(), vec!["favorites".to_string()]);
    }

    #[test]
    fn test_file_backend_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();

        let cache = Cache::open_dir(dir.path()).unwrap();
        cache.set("favorites", &["p1"]).unwrap();
        drop(cache);

        let reopened = Cache::open_dir(dir.path()).unwrap();
        assert_eq!(
            reopened.get::<Vec<String>>("favorites").unwrap(),
            Some(vec!["p1".to_string()])
        );
        assert!(dir.path().join("favorites.json").exists());
        assert_eq!(reopened.keys().unwrap(), vec!["favorites".to_string()]);
    }

    #[test]
    fn test_file_backend_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::open_dir(dir.path()).unwrap();
        let err = cache.set("../escape", &1).unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey(_)));
    }
}
