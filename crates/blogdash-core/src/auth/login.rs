//! Password login with an optional TOTP second factor.
//!
//! The backend answers a correct password on a 2FA-enabled account with
//! `{"require_2fa": true}` and no token; the client then repeats the login
//! with `totp_code` set. Only a response carrying `access_token` creates a
//! session.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::session::{Role, UserInfo};
use super::store::CredentialStore;
use crate::api::transport::ApiRequest;
use crate::api::{ApiError, Gateway};

const LOGIN_PATH: &str = "/auth/admin/login";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp_code: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            totp_code: None,
        }
    }

    pub fn with_totp(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.totp_code = (!code.trim().is_empty()).then(|| code.trim().to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
    #[allow(dead_code)]
    token_type: Option<String>,
    name: Option<String>,
    role: Option<String>,
    admin_id: Option<i64>,
    #[serde(default)]
    require_2fa: bool,
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Password accepted; a TOTP code is needed to finish.
    SecondFactorRequired { message: String },
    Authenticated(UserInfo),
}

fn login_error(status: u16, body: &str) -> ApiError {
    let fallback = match status {
        401 => "Invalid username or password",
        403 => "Account disabled",
        422 => "Request validation failed",
        _ => "Login failed",
    };
    ApiError::Api {
        status,
        detail: ApiError::detail(body).unwrap_or_else(|| fallback.to_string()),
    }
}

/// Log in through `gateway`. On success the session is written to the
/// gateway's credential store, replacing any previous one.
pub async fn login(gateway: &Gateway, request: &LoginRequest) -> Result<LoginOutcome, ApiError> {
    let http = ApiRequest::post(LOGIN_PATH).json(request)?;

    // A 401 here means refused credentials or code, not an expired session,
    // so the body is kept for the message.
    let response = gateway.send_raw(http, false).await?;

    if !response.is_success() {
        warn!(username = %request.username, status = response.status, "Login failed");
        return Err(login_error(response.status, &response.text()));
    }

    let body: LoginResponse = response.json()?;

    if body.require_2fa {
        info!(username = %request.username, "Second factor required");
        return Ok(LoginOutcome::SecondFactorRequired {
            message: body
                .message
                .unwrap_or_else(|| "Enter your verification code".to_string()),
        });
    }

    let missing = |field: &str| ApiError::InvalidResponse(format!("Login response missing {field}"));
    let token = body.access_token.ok_or_else(|| missing("access_token"))?;
    let user = UserInfo {
        name: body.name.ok_or_else(|| missing("name"))?,
        role: Role::from(body.role.ok_or_else(|| missing("role"))?),
        admin_id: body.admin_id.ok_or_else(|| missing("admin_id"))?,
        require_2fa: body.require_2fa,
    };

    gateway.store().set(token, user.clone())?;
    info!(admin_id = user.admin_id, "Login successful");
    Ok(LoginOutcome::Authenticated(user))
}

pub fn logout(store: &CredentialStore) {
    store.clear();
    info!("Logged out");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::gateway::testing::*;
    use crate::api::transport::RequestBody;
    use serde_json::json;

    fn setup(transport: ScriptedTransport) -> (Arc<ScriptedTransport>, Gateway) {
        let transport = Arc::new(transport);
        let gateway = Gateway::new(transport.clone(), CredentialStore::in_memory());
        (transport, gateway)
    }

    #[tokio::test]
    async fn test_two_step_login() {
        let (transport, gateway) = setup(
            ScriptedTransport::new()
                .respond(200, r#"{"require_2fa": true, "message": "Enter your code"}"#)
                .respond(
                    200,
                    r#"{"access_token":"T","token_type":"bearer","name":"A","role":"admin","admin_id":1,"require_2fa":false}"#,
                ),
        );

        let first = login(&gateway, &LoginRequest::new("a", "p")).await.unwrap();
        assert_eq!(
            first,
            LoginOutcome::SecondFactorRequired {
                message: "Enter your code".to_string()
            }
        );
        assert!(gateway.store().get().is_empty());
        assert_eq!(
            transport.last().body,
            RequestBody::Json(json!({ "username": "a", "password": "p" }))
        );

        let second = login(&gateway, &LoginRequest::new("a", "p").with_totp("123456"))
            .await
            .unwrap();
        assert!(matches!(second, LoginOutcome::Authenticated(_)));
        assert_eq!(
            transport.last().body,
            RequestBody::Json(json!({ "username": "a", "password": "p", "totp_code": "123456" }))
        );

        let creds = gateway.store().get();
        assert_eq!(creds.token.as_deref(), Some("T"));
        let user = creds.user.unwrap();
        assert_eq!(user.name, "A");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.admin_id, 1);
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let (_, gateway) = setup(ScriptedTransport::new().respond(401, r#"{"detail":"Wrong password"}"#));
        let err = login(&gateway, &LoginRequest::new("a", "wrong")).await.unwrap_err();
        match err {
            ApiError::Api { status, detail } => {
                assert_eq!(status, 401);
                assert_eq!(detail, "Wrong password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(gateway.store().get().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_totp_code_keeps_server_detail() {
        let (transport, gateway) = setup(
            ScriptedTransport::new().respond(401, r#"{"detail":"Invalid verification code"}"#),
        );
        let request = LoginRequest::new("a", "p").with_totp("000000");

        match login(&gateway, &request).await.unwrap_err() {
            ApiError::Api { status, detail } => {
                assert_eq!(status, 401);
                assert_eq!(detail, "Invalid verification code");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_without_detail_falls_back() {
        let (_, gateway) = setup(ScriptedTransport::new().respond(401, ""));
        match login(&gateway, &LoginRequest::new("a", "wrong")).await.unwrap_err() {
            ApiError::Api { detail, .. } => assert_eq!(detail, "Invalid username or password"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disabled_account_uses_server_detail() {
        let (_, gateway) = setup(ScriptedTransport::new().respond(403, r#"{"detail":"Account locked"}"#));
        match login(&gateway, &LoginRequest::new("a", "p")).await.unwrap_err() {
            ApiError::Api { status, detail } => {
                assert_eq!(status, 403);
                assert_eq!(detail, "Account locked");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let (_, gateway) = setup(ScriptedTransport::new().respond(422, "not json"));
        match login(&gateway, &LoginRequest::new("a", "p")).await.unwrap_err() {
            ApiError::Api { detail, .. } => assert_eq!(detail, "Request validation failed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_new_login_replaces_session() {
        let (_, gateway) = setup(ScriptedTransport::new().respond(
            200,
            r#"{"access_token":"NEW","name":"B","role":"author","admin_id":2,"require_2fa":false}"#,
        ));
        gateway.store().set("OLD", admin_user()).unwrap();

        login(&gateway, &LoginRequest::new("b", "p")).await.unwrap();

        let creds = gateway.store().get();
        assert_eq!(creds.token.as_deref(), Some("NEW"));
        assert_eq!(creds.user.unwrap().role, Role::Author);
    }

    #[tokio::test]
    async fn test_incomplete_response_is_rejected() {
        let (_, gateway) = setup(ScriptedTransport::new().respond(200, r#"{"require_2fa": false}"#));
        let err = login(&gateway, &LoginRequest::new("a", "p")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(gateway.store().get().is_empty());
    }

    #[test]
    fn test_blank_totp_is_omitted() {
        let request = LoginRequest::new("a", "p").with_totp("  ");
        assert!(request.totp_code.is_none());
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("totp_code").is_none());
    }

    #[test]
    fn test_logout_clears() {
        let store = logged_in_store();
        logout(&store);
        logout(&store);
        assert!(store.get().is_empty());
    }
}
