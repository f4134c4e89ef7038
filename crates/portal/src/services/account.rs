//! Account service.
//!
//! Orchestrates sign-in and registration against the platform gateway: the
//! synthetic-email bridge, field validation, the bootstrap-administrator
//! rule and the mapping of gateway failures onto screen messages.

use std::sync::Arc;

use cotador_core::{AccountStatus, Cpf, UserId, numeric_input};

use crate::gateway::{Gateway, GatewayError, NewUser};
use crate::models::User;

/// Exact password length required at registration.
pub const PASSWORD_LENGTH: usize = 6;

/// Errors surfaced to the login/registration screens.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A required field was left empty. Caught before any gateway call.
    #[error("missing required fields")]
    MissingFields,

    /// The password is not exactly six numeric digits. Caught before any
    /// gateway call.
    #[error("password must be exactly {PASSWORD_LENGTH} numeric digits")]
    InvalidPassword,

    /// The CPF/password pair did not match an identity.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The CPF already has an account.
    #[error("CPF already registered")]
    AlreadyRegistered,

    /// Any other gateway failure, surfaced verbatim behind a prefix.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl AccountError {
    /// The localized message shown on the screen.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFields => "Por favor, preencha todos os campos.".to_owned(),
            Self::InvalidPassword => {
                "A senha deve conter exatamente 6 dígitos numéricos.".to_owned()
            }
            Self::InvalidCredentials => {
                "CPF ou senha inválidos (Se é seu primeiro acesso, faça o cadastro).".to_owned()
            }
            Self::AlreadyRegistered => "Este CPF já possui cadastro. Tente fazer login.".to_owned(),
            Self::Gateway(e) => format!("Erro: {e}"),
        }
    }
}

/// A registration form, already masked.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: Cpf,
    pub password: String,
}

/// What a successful registration produced.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationOutcome {
    pub user_id: UserId,
    pub is_admin: bool,
    pub status: AccountStatus,
}

/// A verified identity plus its user row, when one exists.
///
/// The row is `None` for an identity whose registration failed between the
/// two sign-up steps; such orphans stay signed in as minimal non-admins.
#[derive(Debug)]
pub struct SignedIn {
    pub user_id: UserId,
    pub user: Option<User>,
}

/// Sign-in and registration over the platform gateway.
#[derive(Clone)]
pub struct AccountService {
    gateway: Arc<dyn Gateway>,
    bootstrap_cpf: String,
    email_domain: String,
}

impl AccountService {
    /// Create the service.
    ///
    /// `bootstrap_cpf` holds the digits of the reserved administrator CPF;
    /// `email_domain` is the suffix of the synthetic login address.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        bootstrap_cpf: impl Into<String>,
        email_domain: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            bootstrap_cpf: bootstrap_cpf.into(),
            email_domain: email_domain.into(),
        }
    }

    /// Whether this CPF is the reserved bootstrap administrator.
    #[must_use]
    pub fn is_bootstrap_admin(&self, cpf: &Cpf) -> bool {
        cpf.digits() == self.bootstrap_cpf
    }

    /// Verify a CPF/password pair.
    ///
    /// Account status plays no part here: a pending or rejected user signs
    /// in successfully.
    ///
    /// # Errors
    ///
    /// `MissingFields` before any gateway call when either input is empty;
    /// `InvalidCredentials` on a mismatch; `Gateway` otherwise.
    pub async fn sign_in(&self, cpf: &Cpf, password: &str) -> Result<SignedIn, AccountError> {
        if cpf.is_empty() || password.is_empty() {
            return Err(AccountError::MissingFields);
        }

        let email = cpf.synthetic_email(&self.email_domain);
        let session = self
            .gateway
            .sign_in(&email, password)
            .await
            .map_err(|e| match e {
                GatewayError::InvalidCredentials => AccountError::InvalidCredentials,
                other => AccountError::Gateway(other),
            })?;

        let user = self.gateway.find_user(session.user_id).await?;
        if user.is_none() {
            tracing::warn!(user_id = %session.user_id, "identity has no users row");
        }

        Ok(SignedIn {
            user_id: session.user_id,
            user,
        })
    }

    /// Register a new account.
    ///
    /// Two sequential gateway calls: create the auth identity, then insert
    /// the user row keyed by it. A failure of the first aborts before the
    /// second. A failure of the second leaves an orphaned identity behind;
    /// nothing reconciles it.
    ///
    /// # Errors
    ///
    /// `MissingFields`/`InvalidPassword` before any gateway call;
    /// `AlreadyRegistered` when the CPF (or its synthetic email) is taken;
    /// `Gateway` otherwise.
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationOutcome, AccountError> {
        if registration.name.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.phone.trim().is_empty()
            || registration.cpf.is_empty()
            || registration.password.is_empty()
        {
            return Err(AccountError::MissingFields);
        }

        if registration.password.len() != PASSWORD_LENGTH
            || !numeric_input::accept(&registration.password, PASSWORD_LENGTH)
        {
            return Err(AccountError::InvalidPassword);
        }

        let is_admin = self.is_bootstrap_admin(&registration.cpf);
        let status = if is_admin {
            AccountStatus::Approved
        } else {
            AccountStatus::Pending
        };

        let email = registration.cpf.synthetic_email(&self.email_domain);
        let identity = self
            .gateway
            .sign_up(&email, &registration.password)
            .await
            .map_err(|e| match e {
                GatewayError::Api { ref message, .. }
                    if message.contains("already registered") =>
                {
                    AccountError::AlreadyRegistered
                }
                other => AccountError::Gateway(other),
            })?;

        let row = NewUser {
            id: identity.id,
            cpf: registration.cpf.clone(),
            name: registration.name.clone(),
            email: registration.email.clone(),
            phone: registration.phone.clone(),
            status,
            is_admin,
        };

        self.gateway
            .insert_user(&row)
            .await
            .map_err(|e| match e {
                GatewayError::Conflict(_) => AccountError::AlreadyRegistered,
                other => AccountError::Gateway(other),
            })?;

        Ok(RegistrationOutcome {
            user_id: identity.id,
            is_admin,
            status,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    const BOOTSTRAP_CPF: &str = "236616";
    const DOMAIN: &str = "temmaissaude.com";

    fn service() -> (Arc<MemoryGateway>, AccountService) {
        let gateway = Arc::new(MemoryGateway::new());
        let service = AccountService::new(gateway.clone(), BOOTSTRAP_CPF, DOMAIN);
        (gateway, service)
    }

    fn registration(cpf: &str) -> Registration {
        Registration {
            name: "Maria Souza".to_owned(),
            email: "maria@example.com".to_owned(),
            phone: "(11) 98765-4321".to_owned(),
            cpf: Cpf::mask(cpf),
            password: "123456".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_register_ordinary_cpf_is_pending_non_admin() {
        let (gateway, service) = service();
        let outcome = service.register(&registration("111.222.333-44")).await.unwrap();

        assert!(!outcome.is_admin);
        assert_eq!(outcome.status, AccountStatus::Pending);

        let row = gateway.find_user(outcome.user_id).await.unwrap().unwrap();
        assert_eq!(row.status, AccountStatus::Pending);
        assert!(!row.is_admin);
    }

    #[tokio::test]
    async fn test_register_bootstrap_cpf_is_approved_admin() {
        let (gateway, service) = service();
        let outcome = service.register(&registration(BOOTSTRAP_CPF)).await.unwrap();

        assert!(outcome.is_admin);
        assert_eq!(outcome.status, AccountStatus::Approved);

        let row = gateway.find_user(outcome.user_id).await.unwrap().unwrap();
        assert!(row.is_admin);
        assert_eq!(row.status, AccountStatus::Approved);
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields_before_any_call() {
        let (gateway, service) = service();
        let mut incomplete = registration("111.222.333-44");
        incomplete.phone = String::new();

        let err = service.register(&incomplete).await.unwrap_err();
        assert!(matches!(err, AccountError::MissingFields));
        assert_eq!(err.user_message(), "Por favor, preencha todos os campos.");
        assert_eq!(gateway.identity_count(), 0);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_password_before_any_call() {
        let (gateway, service) = service();

        for password in ["12345", "1234567", "12a456"] {
            let mut bad = registration("111.222.333-44");
            bad.password = password.to_owned();
            assert!(
                matches!(
                    service.register(&bad).await.unwrap_err(),
                    AccountError::InvalidPassword
                ),
                "password {password:?} should be rejected"
            );
        }
        assert_eq!(gateway.identity_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_cpf_maps_to_already_registered() {
        let (_gateway, service) = service();
        service.register(&registration("111.222.333-44")).await.unwrap();

        let err = service
            .register(&registration("111.222.333-44"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AlreadyRegistered));
        assert_eq!(
            err.user_message(),
            "Este CPF já possui cadastro. Tente fazer login."
        );
    }

    #[tokio::test]
    async fn test_sign_in_before_approval_succeeds() {
        let (_gateway, service) = service();
        let outcome = service.register(&registration("111.222.333-44")).await.unwrap();
        assert_eq!(outcome.status, AccountStatus::Pending);

        let signed_in = service
            .sign_in(&Cpf::mask("111.222.333-44"), "123456")
            .await
            .unwrap();
        assert_eq!(signed_in.user_id, outcome.user_id);
        assert_eq!(
            signed_in.user.unwrap().status,
            AccountStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_is_localized() {
        let (_gateway, service) = service();
        service.register(&registration("111.222.333-44")).await.unwrap();

        let err = service
            .sign_in(&Cpf::mask("111.222.333-44"), "000000")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
        assert_eq!(
            err.user_message(),
            "CPF ou senha inválidos (Se é seu primeiro acesso, faça o cadastro)."
        );
    }

    #[tokio::test]
    async fn test_sign_in_empty_fields_rejected_locally() {
        let (_gateway, service) = service();
        let err = service.sign_in(&Cpf::mask(""), "123456").await.unwrap_err();
        assert!(matches!(err, AccountError::MissingFields));
    }

    #[tokio::test]
    async fn test_orphan_identity_signs_in_without_row() {
        let (gateway, service) = service();
        // Identity created directly, as if the row insert had failed.
        gateway
            .sign_up(&format!("11122233344@{DOMAIN}"), "123456")
            .await
            .unwrap();

        let signed_in = service
            .sign_in(&Cpf::mask("111.222.333-44"), "123456")
            .await
            .unwrap();
        assert!(signed_in.user.is_none());
    }
}
