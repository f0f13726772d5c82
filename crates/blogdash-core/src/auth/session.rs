use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of the persisted token carrier in days.
/// Mirrors the backend's cookie lifetime; the token's own `exp` claim is
/// usually shorter and is checked separately.
const CARRIER_EXPIRY_DAYS: i64 = 7;

/// Admin role as reported by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    SuperAdmin,
    Admin,
    Author,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::Admin => "admin",
            Role::Author => "author",
            Role::Other(s) => s,
        }
    }

    /// Whether this role may manage other admin accounts.
    pub fn can_manage_admins(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "superadmin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            "author" => Role::Author,
            _ => Role::Other(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::from(s.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Minimal descriptor of the logged-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub role: Role,
    pub admin_id: i64,
    #[serde(default)]
    pub require_2fa: bool,
}

/// What a session slot persists: the token, its user, and when it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: UserInfo,
    pub stored_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: String, user: UserInfo) -> Self {
        Self {
            token,
            user,
            stored_at: Utc::now(),
        }
    }

    pub fn carrier_expires_at(&self) -> DateTime<Utc> {
        self.stored_at + Duration::days(CARRIER_EXPIRY_DAYS)
    }

    /// The carrier lapses independently of the token's own expiry.
    pub fn is_carrier_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.carrier_expires_at()
    }
}

/// Snapshot returned by [`CredentialStore::get`](super::CredentialStore::get).
/// Both halves are `None` when nobody is logged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub token: Option<String>,
    pub user: Option<UserInfo>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }
}

impl From<StoredSession> for Credentials {
    fn from(stored: StoredSession) -> Self {
        Self {
            token: Some(stored.token),
            user: Some(stored.user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_known_and_unknown() {
        assert_eq!(Role::from("superadmin"), Role::SuperAdmin);
        assert_eq!(Role::from("author"), Role::Author);
        assert_eq!(Role::from("editor"), Role::Other("editor".to_string()));
        assert_eq!(Role::from("editor").to_string(), "editor");

        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
    }

    #[test]
    fn test_user_info_wire_format() {
        let user: UserInfo =
            serde_json::from_str(r#"{"name":"A","role":"admin","admin_id":1}"#).unwrap();
        assert_eq!(user.name, "A");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.admin_id, 1);
        assert!(!user.require_2fa);
    }

    #[test]
    fn test_carrier_expiry() {
        let user = UserInfo {
            name: "A".to_string(),
            role: Role::Admin,
            admin_id: 1,
            require_2fa: false,
        };
        let mut stored = StoredSession::new("T".to_string(), user);
        assert!(!stored.is_carrier_expired_at(Utc::now()));

        stored.stored_at = Utc::now() - Duration::days(8);
        assert!(stored.is_carrier_expired_at(Utc::now()));
    }
}
