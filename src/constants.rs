// =============================================================================
// Storage Keys
// =============================================================================

/// Serialized list of every registered `UserProfile`
pub const REGISTERED_USERS_KEY: &str = "registered-users";

/// Serialized map of email -> `CredentialEntry`
pub const USER_CREDENTIALS_KEY: &str = "user-credentials";

/// Serialized session envelope (user + isAuthenticated only)
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Version written into the persisted session envelope
pub const SESSION_STATE_VERSION: u32 = 0;

/// Default storage quota in bytes (5MB)
/// Matches the per-origin quota most browsers give local storage
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5_242_880;

// =============================================================================
// Validation Rules
// =============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters accepted by the special-character password rule
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*";

/// Minimum full name length in characters, after trimming
pub const MIN_FULL_NAME_LENGTH: usize = 2;

// =============================================================================
// Navigation
// =============================================================================

/// Page shown after a successful login
pub const LOGIN_REDIRECT: &str = "/";

/// Page shown after a successful registration
pub const REGISTER_REDIRECT: &str = "/login";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_EMAIL_REQUIRED: &str = "Email is required";
pub const ERR_EMAIL_INVALID: &str = "Please enter a valid email address";
pub const ERR_PASSWORD_REQUIRED: &str = "Password is required";
pub const ERR_PASSWORD_RULES: &str = "Password does not meet requirements";
pub const ERR_CONFIRM_REQUIRED: &str = "Please confirm your password";
pub const ERR_PASSWORDS_MISMATCH: &str = "Passwords do not match";
pub const ERR_FULL_NAME_REQUIRED: &str = "Full name is required";
pub const ERR_FULL_NAME_TOO_SHORT: &str = "Full name must be at least 2 characters";
pub const ERR_ROLE_REQUIRED: &str = "Please select a role";
