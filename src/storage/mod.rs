//! Storage
//!
//! Durable key-value storage for the checkout pipeline. The whole system
//! persists through three named slots, each holding one JSON document; every
//! mutation is written through synchronously, so the store never sits in a
//! different state than what was last written.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

/// The three persistent slots of the checkout pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The shopper's cart lines.
    CartItems,

    /// The shipping address captured at checkout.
    ShippingAddress,

    /// The most recently confirmed order.
    LastOrder,
}

impl Slot {
    /// Every slot, in pipeline order.
    pub const ALL: [Slot; 3] = [Slot::CartItems, Slot::ShippingAddress, Slot::LastOrder];

    /// The storage key this slot is persisted under.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Slot::CartItems => "cartItems",
            Slot::ShippingAddress => "shippingAddress",
            Slot::LastOrder => "lastOrder",
        }
    }
}

/// Errors raised by a storage backend.
///
/// Unreadable slot *contents* are not represented here: a slot that fails to
/// decode is treated as absent (see [`read_slot`]).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be opened or created.
    #[error("failed to open storage at `{dir}`")]
    Open {
        /// Directory the backend was asked to open.
        dir: std::path::PathBuf,

        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Underlying I/O failure reading or writing a slot.
    #[error("storage I/O failure on slot `{slot}`")]
    Io {
        /// Key of the slot being accessed.
        slot: &'static str,

        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialised for persistence.
    #[error("failed to encode slot `{slot}`")]
    Encode {
        /// Key of the slot being written.
        slot: &'static str,

        /// The underlying serialisation error.
        #[source]
        source: serde_json::Error,
    },
}

/// A synchronous, write-through string store with three well-known slots.
///
/// Backends make no attempt to serialise concurrent writers sharing the same
/// underlying store; the last write wins.
pub trait Storage {
    /// Read the raw contents of a slot, or `None` if it has never been
    /// written (or has been removed).
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, slot: Slot) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn put(&self, slot: Slot, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Removing an absent slot is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, slot: Slot) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        (**self).get(slot)
    }

    fn put(&self, slot: Slot, value: &str) -> Result<(), StorageError> {
        (**self).put(slot, value)
    }

    fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        (**self).remove(slot)
    }
}

/// Read and decode a slot.
///
/// An absent slot reads as `None`. So does a slot whose contents fail to
/// decode: the unreadable value is discarded with a warning and the caller
/// proceeds from empty, which is the recovery the rest of the pipeline
/// expects.
///
/// # Errors
///
/// Returns a [`StorageError`] only for backend I/O failures.
pub fn read_slot<T, S>(storage: &S, slot: Slot) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let Some(raw) = storage.get(slot)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            tracing::warn!(slot = slot.key(), %error, "discarding unreadable slot contents");
            Ok(None)
        }
    }
}

/// Encode and write a slot.
///
/// # Errors
///
/// Returns a [`StorageError`] if the value cannot be encoded or the backend
/// cannot be written.
pub fn write_slot<T, S>(storage: &S, slot: Slot, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: Storage + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        slot: slot.key(),
        source,
    })?;

    storage.put(slot, &raw)
}
