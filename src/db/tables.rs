use redb::TableDefinition;

/// Local storage table: storage key -> serialized JSON document
///
/// Holds `registered-users`, `user-credentials` and `auth-storage`.
pub const LOCAL_STORAGE: TableDefinition<&str, &str> = TableDefinition::new("local_storage");
