//! In-memory storage backend.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use super::{Slot, Storage, StorageError};

/// A [`Storage`] backend held entirely in memory.
///
/// Clones share the same underlying map, like two pages of one session
/// reading the same browser profile. Used by tests and demos; nothing
/// survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<&'static str, String>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_slots<R>(&self, f: impl FnOnce(&mut HashMap<&'static str, String>) -> R) -> R {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        f(&mut slots)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        Ok(self.with_slots(|slots| slots.get(slot.key()).cloned()))
    }

    fn put(&self, slot: Slot, value: &str) -> Result<(), StorageError> {
        self.with_slots(|slots| slots.insert(slot.key(), value.to_owned()));

        Ok(())
    }

    fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        self.with_slots(|slots| slots.remove(slot.key()));

        Ok(())
    }
}
