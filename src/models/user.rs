use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Portal role chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Manager,
    Admin,
    Superadmin,
}

impl Role {
    /// Every role, in the order the registration form offers them
    pub const ALL: [Role; 4] = [Role::User, Role::Manager, Role::Admin, Role::Superadmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Human-readable label shown in the role picker
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
            Role::Superadmin => "Super Admin",
        }
    }

    /// Roles allowed to see other users and the role catalogue
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::User => "Basic access to the portal",
            Role::Manager => "Team management and reporting access",
            Role::Admin => "Administrative privileges",
            Role::Superadmin => "Full system access",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is not one of the four portal roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Registered user profile, stored under `registered-users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Time-based id (milliseconds since the Unix epoch, decimal)
    pub id: String,
    pub full_name: String,
    /// Unique, case-sensitive lookup key
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Registration payload: a profile before it has an id and creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl NewUser {
    /// Attach an id and creation time, producing the stored profile
    pub fn into_profile(self, id: String, created_at: DateTime<Utc>) -> UserProfile {
        UserProfile {
            id,
            full_name: self.full_name,
            email: self.email,
            role: self.role,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(
            "owner".parse::<Role>(),
            Err(UnknownRole("owner".to_string()))
        );
        // Roles are matched exactly
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_admin_roles() {
        let admins: Vec<Role> = Role::ALL.into_iter().filter(Role::is_admin).collect();
        assert_eq!(admins, vec![Role::Admin, Role::Superadmin]);
        assert_eq!(Role::Superadmin.label(), "Super Admin");
    }

    #[test]
    fn test_profile_uses_stored_field_names() {
        let profile = NewUser {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.org".to_string(),
            role: Role::Superadmin,
        }
        .into_profile(
            "1733788800000".to_string(),
            DateTime::from_timestamp(1733788800, 0).unwrap(),
        );

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["id"], "1733788800000");
        assert_eq!(value["fullName"], "Ada Lovelace");
        assert_eq!(value["email"], "ada@example.org");
        assert_eq!(value["role"], "superadmin");
        assert!(value["createdAt"].as_str().unwrap().starts_with("2024-12-10T"));
    }

    #[test]
    fn test_profile_reads_browser_written_record() {
        let raw = r#"{
            "id": "1733788800123",
            "fullName": "Grace Hopper",
            "email": "grace@example.org",
            "role": "manager",
            "createdAt": "2024-12-10T00:00:00.123Z"
        }"#;

        let profile: UserProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.role, Role::Manager);
        assert_eq!(profile.created_at.timestamp_millis(), 1733788800123);
    }
}
