use serde::{Deserialize, Serialize};

use super::deserialize_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub article_count: u64,
}

/// Body for both category create and update.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: String,
}
