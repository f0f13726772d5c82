//! Authenticated request gateway.
//!
//! Every call to the backend goes through [`Gateway::send`], which owns
//! the session-expiry policy:
//! - a call that requires auth is never dispatched without a valid session
//! - a 401 from any call clears the session, whatever `require_auth` was
//!
//! Both cases come back as [`ApiError::Auth`]; the gateway never navigates.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::{debug, warn};

use super::transport::{ApiRequest, ApiResponse, HttpTransport};
use super::{ApiError, AuthFailure};
use crate::auth::CredentialStore;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const UNAUTHORIZED: u16 = 401;

/// Clone is cheap; clones share the transport and the credential store.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn HttpTransport>,
    store: CredentialStore,
    timeout: Duration,
}

impl Gateway {
    pub fn new(transport: Arc<dyn HttpTransport>, store: CredentialStore) -> Self {
        Self {
            transport,
            store,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Dispatch `request` once. Returns the raw response for any status
    /// other than 401.
    pub async fn send(&self, request: ApiRequest, require_auth: bool) -> Result<ApiResponse, ApiError> {
        let response = self.send_raw(request, require_auth).await?;
        if response.status == UNAUTHORIZED {
            return Err(AuthFailure::SessionExpired.into());
        }
        Ok(response)
    }

    /// Like [`send`](Self::send) but hands a 401 back as a response. The
    /// session is still cleared. Login uses this to report why the
    /// credentials were refused.
    pub(crate) async fn send_raw(
        &self,
        mut request: ApiRequest,
        require_auth: bool,
    ) -> Result<ApiResponse, ApiError> {
        if require_auth {
            let token = self.store.valid_token().ok_or_else(|| self.reject(&request))?;
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| self.reject(&request))?;
            request.headers.insert(AUTHORIZATION, value);
        }

        let method = request.method.clone();
        let path = request.path.clone();
        debug!(%method, path = %path, require_auth, "Sending request");

        let response = tokio::time::timeout(self.timeout, self.transport.dispatch(request))
            .await
            .map_err(|_| {
                warn!(%method, path = %path, timeout = ?self.timeout, "Request timed out");
                ApiError::Timeout(self.timeout)
            })??;

        if response.status == UNAUTHORIZED {
            warn!(%method, path = %path, "Server rejected session, clearing it");
            self.store.clear();
        }

        debug!(%method, path = %path, status = response.status, "Response received");
        Ok(response)
    }

    fn reject(&self, request: &ApiRequest) -> ApiError {
        warn!(method = %request.method, path = %request.path, "No valid session for request");
        self.store.clear();
        AuthFailure::NotAuthenticated.into()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Transport that replays canned responses and records what it was sent.
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<ApiResponse>>,
        requests: Mutex<Vec<ApiRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn delayed(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(ApiResponse::new(status, body.as_bytes().to_vec()));
            self
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last(&self) -> ApiRequest {
            self.requests
                .lock()
                .unwrap()
                .last()
                .cloned()
                .expect("no request was dispatched")
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let next = self.responses.lock().unwrap().pop_front();
            Ok(next.unwrap_or_else(|| ApiResponse::new(200, b"{}".to_vec())))
        }
    }

    pub fn live_token() -> String {
        crate::auth::token::encode_test_token(&serde_json::json!({
            "sub": "a",
            "role": "admin",
            "admin_id": 1,
            "exp": (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp()
        }))
    }

    pub fn admin_user() -> crate::auth::UserInfo {
        crate::auth::UserInfo {
            name: "A".to_string(),
            role: crate::auth::Role::Admin,
            admin_id: 1,
            require_2fa: false,
        }
    }

    pub fn logged_in_store() -> CredentialStore {
        let store = CredentialStore::in_memory();
        store.set(live_token(), admin_user()).unwrap();
        store
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use reqwest::header::{HeaderName, CONTENT_TYPE};

    fn gateway(transport: &Arc<ScriptedTransport>, store: &CredentialStore) -> Gateway {
        Gateway::new(transport.clone(), store.clone())
    }

    #[tokio::test]
    async fn test_injects_bearer_header() {
        let store = logged_in_store();
        let transport = Arc::new(ScriptedTransport::new().respond(200, "[]"));

        let request = ApiRequest::get("/auth/admin/list")
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let response = gateway(&transport, &store).send(request, true).await.unwrap();
        assert_eq!(response.status, 200);

        let sent = transport.last();
        let expected = format!("Bearer {}", store.get().token.unwrap());
        assert_eq!(sent.headers.get(AUTHORIZATION).unwrap(), expected.as_str());
        assert_eq!(sent.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(sent.headers.len(), 2);
    }

    #[tokio::test]
    async fn test_no_session_never_reaches_network() {
        let store = CredentialStore::in_memory();
        let transport = Arc::new(ScriptedTransport::new());

        let err = gateway(&transport, &store)
            .send(ApiRequest::get("/auth/admin/list"), true)
            .await
            .unwrap_err();

        assert_eq!(err.auth_failure(), Some(AuthFailure::NotAuthenticated));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_cleared_before_dispatch() {
        let store = CredentialStore::in_memory();
        let expired = crate::auth::token::encode_test_token(&serde_json::json!({
            "exp": (chrono::Utc::now() - chrono::Duration::minutes(1)).timestamp()
        }));
        store.set(expired, admin_user()).unwrap();
        let transport = Arc::new(ScriptedTransport::new());

        let err = gateway(&transport, &store)
            .send(ApiRequest::get("/auth/admin/info"), true)
            .await
            .unwrap_err();

        assert_eq!(err.auth_failure(), Some(AuthFailure::NotAuthenticated));
        assert_eq!(transport.calls(), 0);
        assert!(store.get().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_even_without_require_auth() {
        for require_auth in [true, false] {
            let store = logged_in_store();
            let transport = Arc::new(ScriptedTransport::new().respond(401, r#"{"detail":"expired"}"#));

            let err = gateway(&transport, &store)
                .send(ApiRequest::get("/auth/system/settings"), require_auth)
                .await
                .unwrap_err();

            assert_eq!(err.auth_failure(), Some(AuthFailure::SessionExpired));
            assert!(store.get().is_empty());
            assert_eq!(transport.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_raw_send_returns_unauthorized_body_and_clears_session() {
        let store = logged_in_store();
        let transport = Arc::new(ScriptedTransport::new().respond(401, r#"{"detail":"Wrong password"}"#));

        let response = gateway(&transport, &store)
            .send_raw(ApiRequest::post("/auth/admin/login"), false)
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.text(), r#"{"detail":"Wrong password"}"#);
        assert!(store.get().is_empty());
    }

    #[tokio::test]
    async fn test_public_call_has_no_authorization_header() {
        let store = logged_in_store();
        let transport = Arc::new(ScriptedTransport::new());

        gateway(&transport, &store)
            .send(ApiRequest::post("/auth/admin/login"), false)
            .await
            .unwrap();

        assert!(transport.last().headers.get(AUTHORIZATION).is_none());
        assert!(!store.get().is_empty());
    }

    #[tokio::test]
    async fn test_business_errors_are_returned_untouched() {
        let store = logged_in_store();
        let transport = Arc::new(ScriptedTransport::new().respond(403, r#"{"detail":"nope"}"#));

        let response = gateway(&transport, &store)
            .send(ApiRequest::delete("/auth/admin/3"), true)
            .await
            .unwrap();

        assert_eq!(response.status, 403);
        assert_eq!(response.text(), r#"{"detail":"nope"}"#);
        assert!(!store.get().is_empty());
    }

    #[tokio::test]
    async fn test_dispatches_exactly_once_per_call() {
        let store = logged_in_store();
        let transport = Arc::new(ScriptedTransport::new().respond(500, "boom"));
        let gw = gateway(&transport, &store);

        let response = gw.send(ApiRequest::get("/auth/admin/list"), true).await.unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_hung_request_times_out() {
        let store = logged_in_store();
        let transport = Arc::new(ScriptedTransport::delayed(Duration::from_secs(5)));

        let err = gateway(&transport, &store)
            .with_timeout(Duration::from_millis(20))
            .send(ApiRequest::get("/auth/admin/list"), true)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Timeout(_)));
        assert!(!store.get().is_empty());
    }

    #[tokio::test]
    async fn test_caller_headers_survive() {
        let store = logged_in_store();
        let transport = Arc::new(ScriptedTransport::new());
        let custom = HeaderName::from_static("x-request-source");

        gateway(&transport, &store)
            .send(
                ApiRequest::get("/auth/shortlink").header(custom.clone(), HeaderValue::from_static("cli")),
                true,
            )
            .await
            .unwrap();

        assert_eq!(transport.last().headers.get(custom).unwrap(), "cli");
    }
}
