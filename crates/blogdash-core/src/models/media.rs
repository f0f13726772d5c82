use serde::{Deserialize, Serialize};

use super::deserialize_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub image_id: i64,
    pub url: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Image {
    pub fn size_display(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        if self.file_size >= MB {
            format!("{:.1} MB", self.file_size as f64 / MB as f64)
        } else if self.file_size >= KB {
            format!("{:.1} KB", self.file_size as f64 / KB as f64)
        } else {
            format!("{} B", self.file_size)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLink {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub code: String,
    pub original_url: String,
    pub short_url: String,
    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_visit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_display() {
        let mut image: Image = serde_json::from_str(
            r#"{"image_id":1,"url":"/img/1.png","file_size":512}"#,
        )
        .unwrap();
        assert_eq!(image.size_display(), "512 B");
        image.file_size = 2048;
        assert_eq!(image.size_display(), "2.0 KB");
        image.file_size = 3 * 1024 * 1024 + 512 * 1024;
        assert_eq!(image.size_display(), "3.5 MB");
    }

    #[test]
    fn test_short_link_optional_fields() {
        let link: ShortLink = serde_json::from_str(
            r#"{"id":7,"code":"abc","original_url":"https://example.com","short_url":"https://s.example/abc"}"#,
        )
        .unwrap();
        assert_eq!(link.id, "7");
        assert_eq!(link.visits, 0);
        assert!(link.last_visit.is_none());
    }
}
