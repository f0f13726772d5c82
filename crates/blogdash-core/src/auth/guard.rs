//! Route-level session gate.
//!
//! This is a UX gate, not a security boundary: the gateway's 401 handling
//! is what actually enforces expiry. The guard only keeps protected views
//! from starting when there is obviously no session, and keeps a logged-in
//! user away from the login form.

use std::fmt;

use tracing::debug;

use super::store::CredentialStore;

/// Views of the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The unauthenticated entry point.
    Login,
    /// The default protected view.
    Dashboard,
    Posts,
    ComposePost,
    Categories,
    Users,
    Links,
    Images,
    Settings,
    Analytics,
    Profile,
}

impl Route {
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Dashboard => "/dashboard",
            Route::Posts => "/dashboard/posts",
            Route::ComposePost => "/dashboard/posts/create",
            Route::Categories => "/dashboard/categories",
            Route::Users => "/dashboard/users",
            Route::Links => "/dashboard/links",
            Route::Images => "/dashboard/images",
            Route::Settings => "/dashboard/settings",
            Route::Analytics => "/dashboard/analytics",
            Route::Profile => "/dashboard/profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(Route),
}

/// Decide whether `route` may render given the current session.
pub fn guard(route: Route, store: &CredentialStore) -> GuardDecision {
    if route.is_protected() {
        if store.get().token.is_none() {
            store.clear();
            debug!(%route, "No session, redirecting to login");
            return GuardDecision::Redirect(Route::Login);
        }
    } else if store.is_valid() {
        debug!(%route, "Already logged in, redirecting to dashboard");
        return GuardDecision::Redirect(Route::Dashboard);
    }
    GuardDecision::Proceed
}
