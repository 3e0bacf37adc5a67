pub mod tables;

use redb::{Database, Error as RedbError, ReadableDatabase, ReadableTable};
use std::path::Path;
use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::Storage;

/// Database handle type (Arc-wrapped for sharing across handlers)
pub type Db = Arc<Database>;

/// Open or create the redb database at the given path
///
/// Creates the local storage table on first run.
#[allow(clippy::result_large_err)]
pub fn open_database(path: impl AsRef<Path>) -> Result<Db, RedbError> {
    tracing::info!("Opening database at: {:?}", path.as_ref());

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.as_ref().parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            tracing::error!("Failed to create database directory: {}", e);
            RedbError::Io(e)
        })?;
    }

    let db = Database::create(path)?;

    let write_txn = db.begin_write()?;
    {
        let _ = write_txn.open_table(tables::LOCAL_STORAGE)?;
    }
    write_txn.commit()?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(db))
}

/// Local storage backed by a redb file
///
/// Every call runs in its own transaction, so a read-modify-write spanning
/// several calls is not atomic.
#[derive(Clone)]
pub struct RedbStorage {
    db: Db,
    quota_bytes: Option<usize>,
}

impl RedbStorage {
    pub fn new(db: Db) -> Self {
        Self {
            db,
            quota_bytes: None,
        }
    }

    /// Reject writes that would grow the stored keys and values past `quota_bytes`
    pub fn with_quota(db: Db, quota_bytes: usize) -> Self {
        Self {
            db,
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl Storage for RedbStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(tables::LOCAL_STORAGE)?;
        let value = table.get(key)?.map(|v| v.value().to_string());
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::LOCAL_STORAGE)?;

            if let Some(quota) = self.quota_bytes {
                let mut used = key.len() + value.len();
                for entry in table.iter()? {
                    let (k, v) = entry?;
                    if k.value() != key {
                        used += k.value().len() + v.value().len();
                    }
                }

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

            table.insert(key, value)?;
        }
        write_txn.commit()?;

        tracing::debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::LOCAL_STORAGE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;

        tracing::debug!("Removed '{}'", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_storage(temp_dir: &TempDir) -> RedbStorage {
        let db = open_database(temp_dir.path().join("nested/portal.redb")).unwrap();
        RedbStorage::new(db)
    }

    #[test]
    fn test_open_database_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let _storage = temp_storage(&temp_dir);

        assert!(temp_dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = temp_storage(&temp_dir);

        assert_eq!(storage.get_item("registered-users").unwrap(), None);

        storage.set_item("registered-users", "[]").unwrap();
        assert_eq!(
            storage.get_item("registered-users").unwrap().as_deref(),
            Some("[]")
        );

        storage.remove_item("registered-users").unwrap();
        assert_eq!(storage.get_item("registered-users").unwrap(), None);

        // Removing a missing key is not an error
        storage.remove_item("registered-users").unwrap();
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("portal.redb");

        {
            let storage = RedbStorage::new(open_database(&path).unwrap());
            storage.set_item("auth-storage", "{}").unwrap();
        }

        let storage = RedbStorage::new(open_database(&path).unwrap());
        assert_eq!(storage.get_item("auth-storage").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_quota_counts_other_keys_but_not_replaced_value() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_database(temp_dir.path().join("portal.redb")).unwrap();
        let storage = RedbStorage::with_quota(db, 20);

        // "a" + 9 bytes = 10
        storage.set_item("a", "123456789").unwrap();
        // Replacing "a" only counts the new value
        storage.set_item("a", "1234567890123").unwrap();
        // "b" + 6 bytes on top of 14 = 21 > 20
        assert!(matches!(
            storage.set_item("b", "123456"),
            Err(StorageError::QuotaExceeded { quota: 20 })
        ));
        assert_eq!(storage.get_item("b").unwrap(), None);
    }
}
