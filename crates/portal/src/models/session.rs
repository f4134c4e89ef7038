//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use cotador_core::{Cpf, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Platform-assigned user ID.
    pub id: UserId,
    /// Masked CPF used to sign in.
    pub cpf: Cpf,
    /// Display name, when a user row exists for the identity.
    pub name: Option<String>,
    /// Whether the account carries the administrator flag.
    pub is_admin: bool,
}

impl CurrentUser {
    /// Display name with the CPF as fallback for row-less identities.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.cpf.as_str())
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
