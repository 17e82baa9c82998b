use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("value under '{0}' is not UTF-8")]
    NotUtf8(String),
}

/// Durable byte-valued key-value storage.
pub(crate) trait KeyValueStore {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_bytes(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn delete_key(&mut self, key: &str) -> Result<(), StoreError>;

    /// Blank strings read back as absent.
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let Some(bytes) = self.get_bytes(key)? else {
            return Ok(None);
        };
        let raw = String::from_utf8(bytes).map_err(|_| StoreError::NotUtf8(key.to_string()))?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(raw))
    }

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put_bytes(key, value.as_bytes())
    }
}

/// One file per key under a data directory.
pub(crate) struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub(crate) fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        debug!(root = %root.display(), "opened file store");
        Ok(Self { root })
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.key_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn put_bytes(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.key_path(key);
        let staging = self.key_path(&format!("{key}.tmp"));
        fs::write(&staging, value).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| StoreError::Io { path, source })?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStore {
    entries: std::collections::HashMap<String, Vec<u8>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_bytes(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
