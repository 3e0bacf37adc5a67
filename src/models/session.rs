use serde::{Deserialize, Serialize};

use crate::constants::SESSION_STATE_VERSION;
use crate::models::UserProfile;

/// Currently logged-in user, restored from `auth-storage` on load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
}

impl Session {
    pub fn authenticated(user: UserProfile) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    /// Authenticated flag set and a profile present
    pub fn is_active(&self) -> bool {
        self.is_authenticated && self.user.is_some()
    }
}

/// On-disk envelope for the session blob: `{"state": {...}, "version": 0}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub state: Session,
    #[serde(default)]
    pub version: u32,
}

impl From<Session> for PersistedSession {
    fn from(state: Session) -> Self {
        Self {
            state,
            version: SESSION_STATE_VERSION,
        }
    }
}
