//! Gateway to the managed platform that owns authentication, the `users`
//! table and its change feed.
//!
//! Everything of durable consequence lives behind this boundary: the portal
//! never persists state of its own. The [`Gateway`] trait is the
//! repository-style seam that lets the screens and services run against the
//! real platform in production ([`PlatformGateway`]) and against an in-memory
//! fake in tests ([`MemoryGateway`]).

mod error;
mod feed;
mod http;
mod memory;

pub use error::{AuthErrorBody, GatewayError, RestErrorBody, UNIQUE_VIOLATION};
pub use http::PlatformGateway;
pub use memory::MemoryGateway;

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cotador_core::{AccountStatus, Cpf, UserId};

use crate::models::User;

/// An authentication identity created by `sign_up`.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    /// Platform-assigned UUID; the user row is keyed by the same value.
    pub id: UserId,
}

/// An authenticated session returned by `sign_in`.
#[derive(Debug)]
pub struct AuthSession {
    /// Identity the credentials belong to.
    pub user_id: UserId,
    /// Bearer token for the identity. The portal keeps its own cookie
    /// session and does not hold onto this.
    pub access_token: SecretString,
}

/// A new row for the `users` table, keyed by the auth identity.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub id: UserId,
    pub cpf: Cpf,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: AccountStatus,
    pub is_admin: bool,
    // created_at is assigned server-side
}

/// Wire form of a `users` row.
///
/// Columns use underscore-separated names; [`UserRecord::into_user`] maps a
/// row onto the portal's domain type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub cpf: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Map the wire row onto the domain type.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Parse` if the row carries a status outside the
    /// lifecycle vocabulary.
    pub fn into_user(self) -> Result<User, GatewayError> {
        let status: AccountStatus = self
            .status
            .parse()
            .map_err(|e| GatewayError::Parse(format!("invalid status in users row: {e}")))?;

        Ok(User {
            id: UserId::new(self.id),
            cpf: Cpf::mask(&self.cpf),
            name: self.name,
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            status,
            is_admin: self.is_admin,
            created_at: self.created_at,
        })
    }
}

/// One event from the `users` table change feed.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// A row was inserted.
    Insert(User),
    /// A row was updated; the event carries the full new row.
    Update(User),
    /// A row was deleted.
    Delete(UserId),
}

/// A live subscription to the `users` change feed.
///
/// Wraps the platform's event stream; dropping the feed closes the
/// underlying connection, releasing the subscription deterministically.
pub struct ChangeFeed {
    events: Pin<Box<dyn Stream<Item = ChangeResult> + Send>>,
}

type ChangeResult = Result<ChangeEvent, GatewayError>;

impl ChangeFeed {
    pub(crate) fn new(events: impl Stream<Item = ChangeResult> + Send + 'static) -> Self {
        Self {
            events: Box::pin(events),
        }
    }

    /// Wait for the next change event.
    ///
    /// Broken events are logged and skipped; `None` means the feed ended.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        while let Some(item) = self.events.next().await {
            match item {
                Ok(event) => return Some(event),
                Err(e) => tracing::warn!("dropping malformed change event: {e}"),
            }
        }
        None
    }
}

/// Repository-style interface over the platform.
///
/// `list_users` returns the full table ordered by creation time descending;
/// `update_status` touches only the `status` column of one row.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Create an authentication identity.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, GatewayError>;

    /// Verify a credential pair.
    ///
    /// A mismatch yields [`GatewayError::InvalidCredentials`]; account status
    /// plays no part here.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError>;

    /// Fetch every `users` row, newest first.
    async fn list_users(&self) -> Result<Vec<User>, GatewayError>;

    /// Insert one `users` row.
    ///
    /// A duplicate CPF surfaces as [`GatewayError::Conflict`].
    async fn insert_user(&self, user: &NewUser) -> Result<(), GatewayError>;

    /// Fetch a single row by identifier.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, GatewayError>;

    /// Set the `status` column of one row.
    async fn update_status(&self, id: UserId, status: AccountStatus) -> Result<(), GatewayError>;

    /// Subscribe to insert/update/delete events on the `users` table.
    async fn subscribe(&self) -> Result<ChangeFeed, GatewayError>;
}
