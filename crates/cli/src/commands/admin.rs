//! Bootstrap administrator registration command.

use std::sync::Arc;

use cotador_core::Cpf;
use cotador_portal::config::PortalConfig;
use cotador_portal::gateway::{Gateway, PlatformGateway};
use cotador_portal::services::{AccountError, AccountService, Registration};

/// Register the reserved administrator account on the platform.
///
/// Uses the configured bootstrap CPF, so the created account comes out
/// approved and flagged administrator. Safe to re-run: an existing account
/// is reported, not an error.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or the platform
/// rejects the registration for any reason other than an existing account.
pub async fn bootstrap(
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = PortalConfig::from_env()?;
    let gateway: Arc<dyn Gateway> = Arc::new(PlatformGateway::new(&config.platform));
    let accounts = AccountService::new(
        gateway,
        config.bootstrap_cpf.clone(),
        config.login_email_domain.clone(),
    );

    let registration = Registration {
        name: name.to_owned(),
        email: email.to_owned(),
        phone: phone.to_owned(),
        cpf: Cpf::mask(&config.bootstrap_cpf),
        password: password.to_owned(),
    };

    match accounts.register(&registration).await {
        Ok(outcome) => {
            tracing::info!(
                user_id = %outcome.user_id,
                "administrator account created (status: {})",
                outcome.status
            );
            Ok(())
        }
        Err(AccountError::AlreadyRegistered) => {
            tracing::info!("administrator account already exists, nothing to do");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
