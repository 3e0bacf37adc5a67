use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::StorageError;
use crate::storage::Storage;

/// In-process local storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would grow the stored keys and values past `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: Mutex::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn items(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items()?;

        if let Some(quota) = self.quota_bytes {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum::<usize>()
                + key.len()
                + value.len();

            if used > quota {
                tracing::warn!(
                    "Storage quota exceeded writing '{}': {} bytes (quota: {})",
                    key,
                    used,
                    quota
                );
                return Err(StorageError::QuotaExceeded { quota });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items()?.remove(key);
        Ok(())
    }
}
