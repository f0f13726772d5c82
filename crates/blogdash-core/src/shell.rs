//! The outer shell: turns tagged authentication failures into navigation.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::api::ApiError;
use crate::auth::Route;

/// Whatever hosts the views (a terminal, a window) implements this.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}

#[derive(Clone)]
pub struct Shell {
    navigator: Arc<dyn Navigator>,
}

impl Shell {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Await a gateway-backed operation. An authentication failure sends
    /// the user to the login entry point once and is then returned as-is,
    /// so the caller can stop what it was doing.
    pub async fn run<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let result = operation.await;
        if let Err(ApiError::Auth(failure)) = &result {
            info!(%failure, "Redirecting to login");
            self.navigator.redirect(Route::Login);
        }
        result
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.redirect(route);
    }
}
