use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the slot holding the serialized entry collection.
pub const ENTRIES_KEY: &str = "journal_entries";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read slot '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write slot '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// A durable key-value substrate holding whole serialized values per key.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each slot as `<dir>/<key>.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "slot file not present");
                Ok(None)
            }
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let to_err = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(to_err)?;

        // Rename over the slot so readers only ever see a complete snapshot.
        let path = self.slot_path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(to_err)?;
        fs::rename(&tmp, &path).map_err(to_err)?;
        debug!(path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }
}

/// In-process slots. Writes can be made to fail to simulate a broken disk.
#[derive(Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    failing_writes: usize,
    write_attempts: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.slots.insert(key.to_string(), value.to_string());
        storage
    }

    /// Makes the next `count` writes fail.
    pub fn fail_next_writes(&mut self, count: usize) {
        self.failing_writes = count;
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_attempts += 1;
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(StorageError::Write {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "simulated write failure"),
            });
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read(ENTRIES_KEY).unwrap().is_none());
    }

    #[test]
    fn file_write_overwrites_whole_slot() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));
        storage.write(ENTRIES_KEY, "[1,2,3]").unwrap();
        storage.write(ENTRIES_KEY, "[]").unwrap();

        assert_eq!(storage.read(ENTRIES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(storage.slot_path(ENTRIES_KEY).ends_with("journal_entries.json"));
        assert!(!storage.dir().join(".journal_entries.json.tmp").exists());
    }

    #[test]
    fn memory_storage_fails_on_request() {
        let mut storage = MemoryStorage::new();
        storage.fail_next_writes(1);
        assert!(storage.write("k", "v").is_err());
        assert!(storage.read("k").unwrap().is_none());
        storage.write("k", "v").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(storage.write_attempts(), 2);
    }
}
