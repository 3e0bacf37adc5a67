use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::constants::{AUTH_STORAGE_KEY, REGISTERED_USERS_KEY, USER_CREDENTIALS_KEY};
use crate::error::{AuthError, StorageError};
use crate::models::{CredentialEntry, CredentialMap, NewUser, PersistedSession, Session, UserProfile};
use crate::storage::Storage;

/// Credential store over local storage
///
/// Keeps three records:
/// - `registered-users`: every `UserProfile`
/// - `user-credentials`: email -> `CredentialEntry` (plain-text password)
/// - `auth-storage`: the current `Session`
///
/// The profile list and the credential map are written separately, so a
/// failure between the two writes leaves a profile without credentials.
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
    session: RwLock<Session>,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl CredentialStore {
    /// Build a store over `storage`, restoring any persisted session
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let session = match read_record::<PersistedSession>(storage.as_ref(), AUTH_STORAGE_KEY) {
            Ok(Some(persisted)) => {
                if persisted.state.is_active() {
                    tracing::info!("Restored authenticated session");
                }
                persisted.state
            }
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!("Discarding unreadable session blob: {}", e);
                Session::default()
            }
        };

        Self {
            storage,
            session: RwLock::new(session),
            write_lock: Mutex::new(()),
        }
    }

    /// Register a new user with `password`
    ///
    /// Fails with `DuplicateUser` when a profile with the same email exists.
    pub fn register(&self, new_user: NewUser, password: &str) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        tracing::info!("Registering user with role {}", new_user.role);

        let mut users: Vec<UserProfile> = read_record(self.storage.as_ref(), REGISTERED_USERS_KEY)
            .map_err(AuthError::RegistrationFailed)?
            .unwrap_or_default();

        if users.iter().any(|u| u.email == new_user.email) {
            tracing::info!("Registration rejected: email already registered");
            return Err(AuthError::DuplicateUser);
        }

        let created_at = Utc::now();
        let id = next_user_id(&users, created_at.timestamp_millis());
        let profile = new_user.into_profile(id.clone(), created_at);
        let email = profile.email.clone();

        users.push(profile);
        write_record(self.storage.as_ref(), REGISTERED_USERS_KEY, &users)
            .map_err(AuthError::RegistrationFailed)?;

        let mut credentials: CredentialMap =
            read_record(self.storage.as_ref(), USER_CREDENTIALS_KEY)
                .map_err(AuthError::RegistrationFailed)?
                .unwrap_or_default();
        credentials.insert(
            email,
            CredentialEntry {
                user_id: id.clone(),
                password: password.to_string(),
            },
        );
        write_record(self.storage.as_ref(), USER_CREDENTIALS_KEY, &credentials).map_err(|e| {
            tracing::error!("Profile {} stored without credentials: {}", id, e);
            AuthError::RegistrationFailed(e)
        })?;

        tracing::info!("New user registered: {}", id);
        Ok(())
    }

    /// Check `email`/`password` and mark the session authenticated
    pub fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let credentials: CredentialMap = read_record(self.storage.as_ref(), USER_CREDENTIALS_KEY)
            .map_err(AuthError::LoginFailed)?
            .unwrap_or_default();

        let entry = match credentials.get(email) {
            Some(entry) if entry.matches(password) => entry,
            _ => {
                tracing::info!("Login rejected: invalid email or password");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let users: Vec<UserProfile> = read_record(self.storage.as_ref(), REGISTERED_USERS_KEY)
            .map_err(AuthError::LoginFailed)?
            .unwrap_or_default();

        let Some(user) = users.into_iter().find(|u| u.id == entry.user_id) else {
            tracing::warn!("Credential entry references missing profile {}", entry.user_id);
            return Err(AuthError::UserNotFound);
        };

        self.replace_session(Session::authenticated(user.clone()))
            .map_err(AuthError::LoginFailed)?;

        tracing::info!("User {} logged in", user.id);
        Ok(user)
    }

    /// Clear the session and delete its persisted blob
    pub fn logout(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();

        if let Err(e) = self.storage.remove_item(AUTH_STORAGE_KEY) {
            tracing::warn!("Failed to remove persisted session: {}", e);
        }

        tracing::info!("User logged out");
    }

    /// True when the session is authenticated and holds a profile
    pub fn check_auth(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_active()
    }

    /// Mark `user` as the authenticated user without a password check
    pub fn set_user(&self, user: UserProfile) -> Result<(), StorageError> {
        self.replace_session(Session::authenticated(user))
    }

    /// Reset the session, keeping an empty persisted blob
    pub fn clear_auth(&self) -> Result<(), StorageError> {
        self.replace_session(Session::default())
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        let session = self.session.read().unwrap_or_else(PoisonError::into_inner);
        session.user.clone().filter(|_| session.is_authenticated)
    }

    pub fn session(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every stored profile, in registration order
    pub fn registered_users(&self) -> Result<Vec<UserProfile>, StorageError> {
        Ok(read_record(self.storage.as_ref(), REGISTERED_USERS_KEY)?.unwrap_or_default())
    }

    /// Probe the backing storage with a read
    pub fn storage_available(&self) -> bool {
        match self.storage.get_item(AUTH_STORAGE_KEY) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Storage health check failed: {:?}", e);
                false
            }
        }
    }

    /// Persist `session`, then swap it in
    fn replace_session(&self, session: Session) -> Result<(), StorageError> {
        write_record(
            self.storage.as_ref(),
            AUTH_STORAGE_KEY,
            &PersistedSession::from(session.clone()),
        )?;
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
        Ok(())
    }
}

/// Time-based id, bumped past the newest stored id when the clock repeats
fn next_user_id(users: &[UserProfile], now_millis: i64) -> String {
    let newest = users
        .iter()
        .filter_map(|u| u.id.parse::<i64>().ok())
        .max()
        .unwrap_or(i64::MIN);

    now_millis.max(newest.saturating_add(1)).to_string()
}

fn read_record<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    // An empty value reads the same as a missing key
    match storage.get_item(key)? {
        Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}

fn write_record<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::storage::MemoryStorage;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            role: Role::User,
        }
    }

    fn memory_store() -> (Arc<MemoryStorage>, CredentialStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = CredentialStore::load(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_register_duplicate_email() {
        let (_, store) = memory_store();

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();
        let second = store.register(new_user("ada@example.org"), "Other1!x");

        assert!(matches!(second, Err(AuthError::DuplicateUser)));
        assert_eq!(store.registered_users().unwrap().len(), 1);
    }

    #[test]
    fn test_register_then_login() {
        let (_, store) = memory_store();

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();
        let user = store.login("ada@example.org", "Abcdef1!").unwrap();

        assert_eq!(user.email, "ada@example.org");
        assert_eq!(user.role, Role::User);
        assert!(store.check_auth());
        assert_eq!(store.current_user(), Some(user));
    }

    #[test]
    fn test_login_wrong_password() {
        let (_, store) = memory_store();

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();
        let result = store.login("ada@example.org", "Abcdef1?");

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(!store.check_auth());
    }

    #[test]
    fn test_login_unknown_email() {
        let (_, store) = memory_store();

        let result = store.login("nobody@example.org", "Abcdef1!");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_email_lookup_is_case_sensitive() {
        let (_, store) = memory_store();

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();

        assert!(matches!(
            store.login("Ada@example.org", "Abcdef1!"),
            Err(AuthError::InvalidCredentials)
        ));
        // A differently-cased email is a distinct account
        store.register(new_user("Ada@example.org"), "Abcdef1!").unwrap();
        assert_eq!(store.registered_users().unwrap().len(), 2);
    }

    #[test]
    fn test_logout_clears_session_and_blob() {
        let (storage, store) = memory_store();

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();
        store.login("ada@example.org", "Abcdef1!").unwrap();
        assert!(storage.get_item(AUTH_STORAGE_KEY).unwrap().is_some());

        store.logout();

        assert!(!store.check_auth());
        assert_eq!(store.current_user(), None);
        assert_eq!(storage.get_item(AUTH_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_orphaned_credential_yields_user_not_found() {
        let (storage, store) = memory_store();

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();
        storage.set_item(REGISTERED_USERS_KEY, "[]").unwrap();

        let result = store.login("ada@example.org", "Abcdef1!");
        assert!(matches!(result, Err(AuthError::UserNotFound)));
        assert!(!store.check_auth());
    }

    #[test]
    fn test_session_restored_on_load() {
        let (storage, store) = memory_store();

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();
        let user = store.login("ada@example.org", "Abcdef1!").unwrap();

        let reloaded = CredentialStore::load(storage);
        assert!(reloaded.check_auth());
        assert_eq!(reloaded.current_user(), Some(user));
    }

    #[test]
    fn test_malformed_session_blob_starts_logged_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(AUTH_STORAGE_KEY, "{not json").unwrap();

        let store = CredentialStore::load(storage);
        assert!(!store.check_auth());
    }

    #[test]
    fn test_malformed_user_list_fails_registration() {
        let (storage, store) = memory_store();
        storage.set_item(REGISTERED_USERS_KEY, "{").unwrap();

        let result = store.register(new_user("ada@example.org"), "Abcdef1!");
        assert!(matches!(
            result,
            Err(AuthError::RegistrationFailed(StorageError::Json(_)))
        ));
    }

    #[test]
    fn test_empty_records_read_as_missing() {
        let (storage, store) = memory_store();
        storage.set_item(REGISTERED_USERS_KEY, "").unwrap();
        storage.set_item(USER_CREDENTIALS_KEY, "").unwrap();

        assert!(matches!(
            store.login("ada@example.org", "Abcdef1!"),
            Err(AuthError::InvalidCredentials)
        ));

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();
        assert_eq!(store.registered_users().unwrap().len(), 1);
        assert!(store.login("ada@example.org", "Abcdef1!").is_ok());

        storage.set_item(AUTH_STORAGE_KEY, "").unwrap();
        let reloaded = CredentialStore::load(storage);
        assert!(!reloaded.check_auth());
    }

    #[test]
    fn test_quota_exceeded_fails_registration() {
        let storage = Arc::new(MemoryStorage::with_quota(64));
        let store = CredentialStore::load(storage);

        let result = store.register(new_user("ada@example.org"), "Abcdef1!");
        let err = result.unwrap_err();

        assert!(matches!(
            err,
            AuthError::RegistrationFailed(StorageError::QuotaExceeded { quota: 64 })
        ));
        assert_eq!(err.to_string(), "Registration failed. Please try again.");
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let (_, store) = memory_store();

        for i in 0..5 {
            store
                .register(new_user(&format!("user{}@example.org", i)), "Abcdef1!")
                .unwrap();
        }

        let mut ids: Vec<String> = store
            .registered_users()
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);

        // Each credential still resolves to its own profile
        let user = store.login("user3@example.org", "Abcdef1!").unwrap();
        assert_eq!(user.email, "user3@example.org");
    }

    #[test]
    fn test_next_user_id() {
        assert_eq!(next_user_id(&[], 1000), "1000");

        let mut existing = new_user("a@b.c").into_profile("1000".to_string(), Utc::now());
        assert_eq!(next_user_id(std::slice::from_ref(&existing), 1000), "1001");
        assert_eq!(next_user_id(std::slice::from_ref(&existing), 5000), "5000");

        // Non-numeric ids are ignored
        existing.id = "legacy".to_string();
        assert_eq!(next_user_id(&[existing], 1000), "1000");
    }

    #[test]
    fn test_set_user_and_clear_auth() {
        let (storage, store) = memory_store();
        let user = new_user("ada@example.org").into_profile("1".to_string(), Utc::now());

        store.set_user(user.clone()).unwrap();
        assert!(store.check_auth());
        assert_eq!(store.session().user, Some(user));

        store.clear_auth().unwrap();
        assert!(!store.check_auth());
        // The cleared session is still persisted
        let raw = storage.get_item(AUTH_STORAGE_KEY).unwrap().unwrap();
        let persisted: PersistedSession = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.state, Session::default());
    }

    #[test]
    fn test_stored_records_use_browser_format() {
        let (storage, store) = memory_store();

        store.register(new_user("ada@example.org"), "Abcdef1!").unwrap();

        let users: serde_json::Value =
            serde_json::from_str(&storage.get_item(REGISTERED_USERS_KEY).unwrap().unwrap())
                .unwrap();
        let credentials: serde_json::Value =
            serde_json::from_str(&storage.get_item(USER_CREDENTIALS_KEY).unwrap().unwrap())
                .unwrap();

        assert_eq!(users[0]["email"], "ada@example.org");
        assert_eq!(users[0]["fullName"], "Test User");
        assert_eq!(credentials["ada@example.org"]["userId"], users[0]["id"]);
        assert_eq!(credentials["ada@example.org"]["password"], "Abcdef1!");
    }
}
