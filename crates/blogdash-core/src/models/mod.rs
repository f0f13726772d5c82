//! Data models for the blog admin API.
//!
//! - `Admin`, `AdminProfile`: admin accounts
//! - `Article`, `Category`: content
//! - `Image`, `ShortLink`: media and link management
//! - `SystemSetting`, `EmailSettings`: system configuration
//! - `SecurityLog`, `LogAnalysis`: security log review

pub mod admin;
pub mod article;
pub mod category;
pub mod media;
pub mod security;
pub mod system;

pub use admin::{Admin, AdminProfile, CreateAdminRequest};
pub use article::{Article, ArticleStatus, ArticleUpdate};
pub use category::{Category, CategoryRequest};
pub use media::{Image, ShortLink};
pub use security::{AnalysisConfig, AnalysisDepth, LogAnalysis, LogPattern, RiskLevel, SecurityLog};
pub use system::{EmailSettings, SystemSetting};

use serde::{Deserialize, Serialize};

/// `{ total, items }` envelope used by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub total: u64,
    pub items: Vec<T>,
}

/// `{ message }` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// IDs come back as strings from some endpoints and numbers from others.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct IdVisitor;

    impl<'de> de::Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
