//! Login and registration route handlers.
//!
//! The two screens of the logged-out state machine. Switching between them
//! is a plain navigation, which resets every field and message by
//! construction. Authentication itself is delegated to the platform through
//! the account service; this layer maps outcomes onto the screens.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum::Form;
use serde::Deserialize;
use tower_sessions::Session;

use cotador_core::{Cpf, phone};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::Registration;
use crate::state::AppState;

/// Success message after registering the bootstrap administrator.
const ADMIN_CREATED_MSG: &str = "Conta de Administrador criada com sucesso! Acessando...";

/// Success message after an ordinary registration.
const PENDING_APPROVAL_MSG: &str = "Cadastro realizado com sucesso! Aguarde a aprovação do \
                                    administrador. Você será notificado pelo WhatsApp.";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub cpf: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        error: None,
        success: None,
    }
}

/// Handle login form submission.
///
/// Derives the synthetic login email from the CPF and verifies the pair
/// against the platform. Status does not gate authentication; redirection
/// depends only on the administrator flag.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let cpf = Cpf::mask(&form.cpf);

    match state.accounts().sign_in(&cpf, &form.password).await {
        Ok(signed_in) => {
            let current = CurrentUser {
                id: signed_in.user_id,
                cpf,
                name: signed_in.user.as_ref().map(|u| u.name.clone()),
                is_admin: signed_in.user.as_ref().is_some_and(|u| u.is_admin),
            };

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {e}");
                return LoginTemplate {
                    error: Some("Erro: não foi possível iniciar a sessão.".to_owned()),
                    success: None,
                }
                .into_response();
            }

            set_sentry_user(&current.id);
            if current.is_admin {
                Redirect::to("/admin").into_response()
            } else {
                Redirect::to("/cotacao").into_response()
            }
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            LoginTemplate {
                error: Some(e.user_message()),
                success: None,
            }
            .into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        error: None,
        success: None,
    }
}

/// Handle registration form submission.
///
/// Validation failures and gateway errors re-render the registration form;
/// an ordinary success lands back on the login screen with the
/// pending-approval message, while the bootstrap administrator stays here
/// with the immediate-access message.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let registration = Registration {
        name: form.name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        phone: phone::mask(&form.phone),
        cpf: Cpf::mask(&form.cpf),
        password: form.password,
    };

    match state.accounts().register(&registration).await {
        Ok(outcome) if outcome.is_admin => RegisterTemplate {
            error: None,
            success: Some(ADMIN_CREATED_MSG.to_owned()),
        }
        .into_response(),
        Ok(_) => LoginTemplate {
            error: None,
            success: Some(PENDING_APPROVAL_MSG.to_owned()),
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            RegisterTemplate {
                error: Some(e.user_message()),
                success: None,
            }
            .into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("Failed to clear session on logout: {e}");
    }
    clear_sentry_user();
    Redirect::to("/").into_response()
}
