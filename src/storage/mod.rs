//! Key-value blob store the portal keeps its records in
//!
//! Mirrors browser local storage: string keys, string values, last writer wins.

pub mod memory;

pub use memory::MemoryStorage;

use crate::error::StorageError;

/// Local storage seam shared by the redb file store and the in-memory store
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting a missing key succeeds
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
