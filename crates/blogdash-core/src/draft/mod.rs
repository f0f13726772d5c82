//! Local persistence of in-progress article drafts.
//!
//! At most one draft exists, stored under a single well-known key. The
//! [`Composer`] decides when it is written and deleted; [`Autosave`] drives
//! periodic writes while a composition view is open.

pub mod autosave;
pub mod composer;
pub mod store;

pub use autosave::{Autosave, DEFAULT_AUTOSAVE_INTERVAL_SECS};
pub use composer::{Composer, ComposerState};
pub use store::{DraftError, DraftStore, FileDraftStore, MemoryDraftStore};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Cover image chosen for an article. `file` is set when the image is a
/// local file still to be uploaded with the article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Snapshot of the article composition form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub cover_image: CoverImage,
}

impl Draft {
    /// True when no field holds anything worth saving.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.content.is_empty()
            && self.category_id.is_empty()
            && self.cover_image.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_wire_keys() {
        let draft = Draft {
            title: "Hello".to_string(),
            content: "<p>Body</p>".to_string(),
            category_id: "3".to_string(),
            cover_image: CoverImage {
                url: "/covers/a.png".to_string(),
                file: None,
            },
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["categoryId"], "3");
        assert_eq!(json["coverImage"]["url"], "/covers/a.png");
        assert!(json["coverImage"].get("file").is_none());
    }

    #[test]
    fn test_draft_tolerates_missing_fields() {
        let draft: Draft = serde_json::from_str(r#"{"title":"Only a title"}"#).unwrap();
        assert_eq!(draft.title, "Only a title");
        assert!(draft.cover_image.url.is_empty());
        assert!(!draft.is_empty());
        assert!(Draft::default().is_empty());
    }
}
