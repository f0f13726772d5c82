use serde::{Deserialize, Serialize};

use super::deserialize_id;
use crate::auth::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(deserialize_with = "deserialize_id")]
    pub admin_id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Admin {
    pub fn status_display(&self) -> &'static str {
        if self.is_active {
            "active"
        } else {
            "disabled"
        }
    }
}

/// Response of `/auth/admin/info` for the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub admin_id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: Role,
}
