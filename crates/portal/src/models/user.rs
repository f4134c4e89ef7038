//! User domain type.
//!
//! The platform owns the durable `users` row; this is the portal's
//! read-through projection of it.

use chrono::{DateTime, Utc};

use cotador_core::{AccountStatus, Cpf, UserId};

/// A registrant as the portal sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Platform-assigned identifier, shared with the auth identity.
    pub id: UserId,
    /// Masked CPF, the human-facing natural key and login handle.
    pub cpf: Cpf,
    /// Display name.
    pub name: String,
    /// Contact email (distinct from the synthetic login address).
    pub email: String,
    /// Contact phone, masked.
    pub phone: String,
    /// Lifecycle status; only administrators change it.
    pub status: AccountStatus,
    /// Whether this account is the administrator.
    pub is_admin: bool,
    /// Server-assigned creation time, immutable.
    pub created_at: DateTime<Utc>,
}
