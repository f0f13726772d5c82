//! Typed client for the blog admin API.
//!
//! Every method requires a session and goes through the [`Gateway`], so
//! the 401 policy applies uniformly. Non-success statuses become
//! [`ApiError::Api`] carrying the backend's `detail` message.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::gateway::Gateway;
use super::transport::{ApiRequest, ApiResponse, FormPart, PartValue};
use super::ApiError;
use crate::draft::Draft;
use crate::models::{
    Admin, AdminProfile, AnalysisConfig, Article, ArticleStatus, ArticleUpdate, Category,
    CategoryRequest, CreateAdminRequest, EmailSettings, Image, ListResponse, LogAnalysis,
    MessageResponse, SecurityLog, ShortLink, SystemSetting,
};
use crate::utils::{plain_text, sanitize_html};

const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Clone is cheap - the gateway shares its transport and store.
#[derive(Clone)]
pub struct AdminClient {
    gateway: Gateway,
}

impl AdminClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Check if response is successful, returning an error with body if not.
    fn check_response(response: ApiResponse) -> Result<ApiResponse, ApiError> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, &response.text()))
        }
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.gateway.send(request, true).await?;
        Self::check_response(response)?.json()
    }

    /// For endpoints whose success body carries nothing we use.
    async fn call_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.gateway.send(request, true).await?;
        Self::check_response(response)?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(ApiRequest::get(path)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.call(ApiRequest::post(path).json(body)?).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.call(ApiRequest::put(path).json(body)?).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call_unit(ApiRequest::delete(path)).await
    }

    // ===== Profile =====

    pub async fn profile(&self) -> Result<AdminProfile, ApiError> {
        self.get("/auth/admin/info").await
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<MessageResponse, ApiError> {
        let body = json!({ "old_password": old_password, "new_password": new_password });
        self.put("/auth/admin/password", &body).await
    }

    /// Replace the signed-in admin's avatar; returns the backend's JSON
    /// description of the stored image, including its `url`.
    pub async fn upload_avatar(&self, path: &Path) -> Result<serde_json::Value, ApiError> {
        let part = Self::file_part("file", path)?;
        if let PartValue::File { ref mime, ref bytes, .. } = part.value {
            if !mime.as_deref().is_some_and(|m| m.starts_with("image/")) {
                return Err(ApiError::Validation("Avatar must be an image file".to_string()));
            }
            if bytes.len() > MAX_AVATAR_BYTES {
                return Err(ApiError::Validation("Avatar must be 2 MB or smaller".to_string()));
            }
        }
        self.call(ApiRequest::post("/auth/admin/avatar").multipart(vec![part]))
            .await
    }

    // ===== Admin accounts =====

    pub async fn list_admins(&self) -> Result<ListResponse<Admin>, ApiError> {
        self.get("/auth/admin/list").await
    }

    pub async fn create_admin(&self, request: &CreateAdminRequest) -> Result<MessageResponse, ApiError> {
        self.post("/auth/admin/create", request).await
    }

    pub async fn set_admin_status(&self, admin_id: &str, active: bool) -> Result<MessageResponse, ApiError> {
        let path = format!("/auth/admin/{}/status", admin_id);
        self.put(&path, &json!({ "status": active })).await
    }

    pub async fn reset_admin_password(&self, admin_id: &str, password: &str) -> Result<MessageResponse, ApiError> {
        let path = format!("/auth/admin/{}/password", admin_id);
        self.put(&path, &json!({ "password": password })).await
    }

    /// Email a newly created admin their initial credentials.
    pub async fn send_admin_password(&self, email: &str, username: &str, password: &str) -> Result<(), ApiError> {
        let body = json!({ "email": email, "username": username, "password": password });
        self.call_unit(ApiRequest::post("/auth/admin/send-password").json(&body)?).await
    }

    pub async fn delete_admin(&self, admin_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/auth/admin/{}", admin_id)).await
    }

    // ===== Articles =====

    pub async fn list_articles(&self) -> Result<ListResponse<Article>, ApiError> {
        self.get("/auth/admin/article/list").await
    }

    pub async fn article(&self, id: &str) -> Result<Article, ApiError> {
        self.get(&format!("/auth/admin/article/detail/{}", id)).await
    }

    /// Publish a composed draft. Title, content and category are required.
    /// The content is cleaned to the allowed markup and the title is sent as
    /// plain text.
    pub async fn create_article(&self, draft: &Draft) -> Result<(), ApiError> {
        let parts = Self::article_form(draft)?;
        debug!(parts = parts.len(), "Submitting article");
        self.call_unit(ApiRequest::post("/auth/admin/article/create").multipart(parts))
            .await
    }

    pub async fn update_article(&self, id: &str, update: &ArticleUpdate) -> Result<Article, ApiError> {
        let mut update = update.clone();
        update.title = plain_text(&update.title);
        update.content = sanitize_html(&update.content);
        self.put(&format!("/auth/admin/article/update/{}", id), &update).await
    }

    pub async fn delete_article(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/auth/admin/articles/{}", id)).await
    }

    fn article_form(draft: &Draft) -> Result<Vec<FormPart>, ApiError> {
        let content = sanitize_html(&draft.content);
        if content.trim().is_empty() {
            return Err(ApiError::Validation("Article content is required".to_string()));
        }
        let title = plain_text(&draft.title);
        if title.is_empty() {
            return Err(ApiError::Validation("Article title is required".to_string()));
        }
        if draft.category_id.trim().is_empty() {
            return Err(ApiError::Validation("Article category is required".to_string()));
        }

        let text = |name: &str, value: String| FormPart {
            name: name.to_string(),
            value: PartValue::Text(value),
        };
        let mut parts = vec![
            text("title", title),
            text("content", content),
            text("category_id", draft.category_id.clone()),
            text("status", ArticleStatus::Published.as_str().to_string()),
        ];
        if let Some(ref file) = draft.cover_image.file {
            parts.push(Self::file_part("cover", file)?);
        }
        Ok(parts)
    }

    fn file_part(name: &str, path: &Path) -> Result<FormPart, ApiError> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(FormPart {
            name: name.to_string(),
            value: PartValue::File {
                mime: mime_guess::from_path(path).first().map(|m| m.essence_str().to_string()),
                file_name,
                bytes,
            },
        })
    }

    // ===== Categories =====

    pub async fn list_categories(&self) -> Result<ListResponse<Category>, ApiError> {
        self.get("/auth/admin/category/list").await
    }

    pub async fn create_category(&self, request: &CategoryRequest) -> Result<Category, ApiError> {
        self.post("/auth/admin/category/create", request).await
    }

    pub async fn update_category(&self, id: &str, request: &CategoryRequest) -> Result<Category, ApiError> {
        self.put(&format!("/auth/admin/category/update/{}", id), request).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/auth/admin/category/delete/{}", id)).await
    }

    // ===== Images =====

    pub async fn list_images(&self) -> Result<ListResponse<Image>, ApiError> {
        self.get("/auth/admin/image/list").await
    }

    /// Upload an image file; returns the backend's JSON description of it.
    pub async fn upload_image(&self, path: &Path) -> Result<serde_json::Value, ApiError> {
        let part = Self::file_part("file", path)?;
        self.call(ApiRequest::post("/auth/admin/image/upload").multipart(vec![part]))
            .await
    }

    pub async fn delete_image(&self, image_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/auth/admin/image/{}", image_id)).await
    }

    // ===== Short links =====

    pub async fn list_short_links(&self) -> Result<ListResponse<ShortLink>, ApiError> {
        self.get("/auth/shortlink").await
    }

    pub async fn create_short_link(&self, original_url: &str, description: Option<&str>) -> Result<ShortLink, ApiError> {
        let mut body = json!({ "original_url": original_url });
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            body["description"] = json!(description);
        }
        self.post("/auth/shortlink", &body).await
    }

    pub async fn delete_short_link(&self, code: &str) -> Result<(), ApiError> {
        self.delete(&format!("/auth/shortlink/{}", code)).await
    }

    pub async fn regenerate_short_link(&self, code: &str) -> Result<ShortLink, ApiError> {
        self.call(ApiRequest::put(format!("/auth/shortlink/{}/regenerate", code)))
            .await
    }

    // ===== System settings =====

    pub async fn system_settings(&self) -> Result<Vec<SystemSetting>, ApiError> {
        self.get("/auth/system/settings").await
    }

    pub async fn set_system_name(&self, name: &str) -> Result<(), ApiError> {
        let request = ApiRequest::put("/auth/system/name").json(&json!({ "system_name": name }))?;
        self.call_unit(request).await
    }

    pub async fn set_email_settings(&self, settings: &EmailSettings) -> Result<(), ApiError> {
        self.call_unit(ApiRequest::put("/auth/system/email").json(settings)?)
            .await
    }

    // ===== Security logs =====

    pub async fn security_logs(&self) -> Result<ListResponse<SecurityLog>, ApiError> {
        self.get("/auth/admin/log/security").await
    }

    pub async fn analyze_logs(&self, config: &AnalysisConfig) -> Result<LogAnalysis, ApiError> {
        self.post("/auth/admin/log/analyze", config).await
    }
}
