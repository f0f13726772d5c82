//! Shared state for one CLI invocation.

use std::future::Future;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::debug;

use blogdash_core::auth::{guard, GuardDecision, UserInfo};
use blogdash_core::{AdminClient, ApiError, Config, CredentialStore, Gateway, ReqwestTransport, Route, Shell};

use crate::navigator::TerminalNavigator;

pub struct App {
    pub config: Config,
    pub store: CredentialStore,
    pub gateway: Gateway,
    pub client: AdminClient,
    pub shell: Shell,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let store = CredentialStore::new(config.session_slot()?);
        let transport = ReqwestTransport::new(config.api_base_url.clone(), config.request_timeout())?;
        let gateway = Gateway::new(Arc::new(transport), store.clone()).with_timeout(config.request_timeout());
        let client = AdminClient::new(gateway.clone());
        let shell = Shell::new(Arc::new(TerminalNavigator));

        Ok(Self {
            config,
            store,
            gateway,
            client,
            shell,
        })
    }

    /// Run the session guard for `route`. Protected commands call this
    /// before doing any work.
    pub fn enter(&self, route: Route) -> Result<()> {
        match guard(route, &self.store) {
            GuardDecision::Proceed => Ok(()),
            GuardDecision::Redirect(target) => {
                debug!(%route, %target, "Guard redirect");
                self.shell.navigate(target);
                bail!("Not logged in")
            }
        }
    }

    /// Await an API call through the shell, so an auth failure prints the
    /// re-login notice once.
    pub async fn call<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        Ok(self.shell.run(operation).await?)
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.store.get().user
    }

    pub fn require_admin_manager(&self) -> Result<()> {
        match self.user() {
            Some(user) if user.role.can_manage_admins() => Ok(()),
            Some(user) => bail!("Role '{}' cannot manage admin accounts", user.role),
            None => bail!("Not logged in"),
        }
    }
}
