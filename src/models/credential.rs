use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Password/userId pair stored under `user-credentials`, keyed by email
///
/// The password is kept in clear text; the stored format carries no hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    /// Id of the `UserProfile` this entry belongs to
    pub user_id: String,
    pub password: String,
}

impl CredentialEntry {
    pub fn matches(&self, password: &str) -> bool {
        self.password == password
    }
}

/// Whole credential record: email -> entry
pub type CredentialMap = BTreeMap<String, CredentialEntry>;
