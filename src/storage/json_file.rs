//! File-backed storage backend.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{Slot, Storage, StorageError};

/// A [`Storage`] backend that keeps one `<key>.json` file per slot under a
/// directory — the durable "browser profile" of the storefront.
///
/// Clones share the same directory. Writes go straight to disk; there is no
/// buffering and no locking against other processes using the same
/// directory (last write wins).
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open (creating if necessary) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|source| StorageError::Open {
            dir: dir.clone(),
            source,
        })?;

        Ok(Self { dir })
    }

    /// The directory slots are persisted under.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.key()))
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(slot)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                slot: slot.key(),
                source,
            }),
        }
    }

    fn put(&self, slot: Slot, value: &str) -> Result<(), StorageError> {
        fs::write(self.path(slot), value).map_err(|source| StorageError::Io {
            slot: slot.key(),
            source,
        })
    }

    fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        match fs::remove_file(self.path(slot)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                slot: slot.key(),
                source,
            }),
        }
    }
}
