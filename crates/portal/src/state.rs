//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::PlanCatalog;
use crate::config::PortalConfig;
use crate::directory::UserDirectory;
use crate::gateway::Gateway;
use crate::services::AccountService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// gateway, the user-directory projection, the plan catalog and the
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    gateway: Arc<dyn Gateway>,
    accounts: AccountService,
    directory: UserDirectory,
    catalog: PlanCatalog,
}

impl AppState {
    /// Assemble the application state.
    #[must_use]
    pub fn new(
        config: PortalConfig,
        gateway: Arc<dyn Gateway>,
        directory: UserDirectory,
        catalog: PlanCatalog,
    ) -> Self {
        let accounts = AccountService::new(
            Arc::clone(&gateway),
            config.bootstrap_cpf.clone(),
            config.login_email_domain.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                accounts,
                directory,
                catalog,
            }),
        }
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the platform gateway.
    #[must_use]
    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.inner.gateway
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    /// Get a reference to the user-directory projection.
    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.inner.directory
    }

    /// Get a reference to the plan catalog.
    #[must_use]
    pub fn catalog(&self) -> &PlanCatalog {
        &self.inner.catalog
    }
}
