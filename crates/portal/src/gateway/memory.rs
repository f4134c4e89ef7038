//! In-memory gateway for tests and offline development.
//!
//! Mirrors the platform's observable behavior: email-keyed credential
//! verification, a CPF unique constraint on the users table, and a broadcast
//! change feed. Nothing survives the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_stream::stream;
use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::broadcast;
use uuid::Uuid;

use cotador_core::{AccountStatus, Cpf, UserId};

use crate::models::User;

use super::error::GatewayError;
use super::{AuthIdentity, AuthSession, ChangeEvent, ChangeFeed, Gateway, NewUser};

const FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct Identity {
    id: UserId,
    password: String,
}

#[derive(Default)]
struct MemoryInner {
    /// Auth identities keyed by login email.
    identities: HashMap<String, Identity>,
    /// The users table, newest row first.
    users: Vec<User>,
}

/// In-memory stand-in for the hosted platform.
#[derive(Clone)]
pub struct MemoryGateway {
    inner: Arc<Mutex<MemoryInner>>,
    feed: broadcast::Sender<ChangeEvent>,
}

impl MemoryGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(MemoryInner::default())),
            feed,
        }
    }

    /// Preload a user row without emitting a change event.
    pub fn seed(&self, user: User) {
        let mut inner = self.lock();
        inner.users.insert(0, user);
    }

    /// Number of auth identities created so far.
    #[must_use]
    pub fn identity_count(&self) -> usize {
        self.lock().identities.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ChangeEvent) {
        // No receivers is fine; the feed is fire-and-forget.
        let _ = self.feed.send(event);
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, GatewayError> {
        let mut inner = self.lock();
        if inner.identities.contains_key(email) {
            return Err(GatewayError::Api {
                code: "422".to_owned(),
                message: "User already registered".to_owned(),
            });
        }

        let identity = Identity {
            id: UserId::new(Uuid::new_v4()),
            password: password.to_owned(),
        };
        let id = identity.id;
        inner.identities.insert(email.to_owned(), identity);

        Ok(AuthIdentity { id })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let inner = self.lock();
        let identity = inner
            .identities
            .get(email)
            .ok_or(GatewayError::InvalidCredentials)?;
        if identity.password != password {
            return Err(GatewayError::InvalidCredentials);
        }

        Ok(AuthSession {
            user_id: identity.id,
            access_token: SecretString::from(format!("memory-token-{}", identity.id)),
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        Ok(self.lock().users.clone())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<(), GatewayError> {
        let row = {
            let mut inner = self.lock();
            let digits = user.cpf.digits();
            if inner.users.iter().any(|u| u.cpf.digits() == digits) {
                return Err(GatewayError::Conflict(
                    "duplicate key value violates unique constraint \"users_cpf_key\""
                        .to_owned(),
                ));
            }

            let row = User {
                id: user.id,
                cpf: Cpf::mask(user.cpf.as_str()),
                name: user.name.clone(),
                email: user.email.clone(),
                phone: user.phone.clone(),
                status: user.status,
                is_admin: user.is_admin,
                created_at: Utc::now(),
            };
            inner.users.insert(0, row.clone());
            row
        };

        self.emit(ChangeEvent::Insert(row));
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, GatewayError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_status(&self, id: UserId, status: AccountStatus) -> Result<(), GatewayError> {
        let updated = {
            let mut inner = self.lock();
            let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
                // A patch matching no rows is a no-op, as on the platform.
                return Ok(());
            };
            user.status = status;
            user.clone()
        };

        self.emit(ChangeEvent::Update(updated));
        Ok(())
    }

    async fn subscribe(&self) -> Result<ChangeFeed, GatewayError> {
        let mut receiver = self.feed.subscribe();

        Ok(ChangeFeed::new(stream! {
            loop {
                match receiver.recv().await {
                    Ok(event) => yield Ok(event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        yield Err(GatewayError::Stream(format!("feed lagged by {n} events")));
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user(id: UserId, cpf: &str) -> NewUser {
        NewUser {
            id,
            cpf: Cpf::mask(cpf),
            name: "Maria Souza".to_owned(),
            email: "maria@example.com".to_owned(),
            phone: "(11) 98765-4321".to_owned(),
            status: AccountStatus::Pending,
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let gateway = MemoryGateway::new();
        let identity = gateway
            .sign_up("11122233344@temmaissaude.com", "123456")
            .await
            .unwrap();

        let session = gateway
            .sign_in("11122233344@temmaissaude.com", "123456")
            .await
            .unwrap();
        assert_eq!(session.user_id, identity.id);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let gateway = MemoryGateway::new();
        gateway
            .sign_up("11122233344@temmaissaude.com", "123456")
            .await
            .unwrap();

        let err = gateway
            .sign_in("11122233344@temmaissaude.com", "654321")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_rejected() {
        let gateway = MemoryGateway::new();
        gateway
            .sign_up("11122233344@temmaissaude.com", "123456")
            .await
            .unwrap();
        let err = gateway
            .sign_up("11122233344@temmaissaude.com", "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Api { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_cpf_is_a_conflict() {
        let gateway = MemoryGateway::new();
        gateway
            .insert_user(&new_user(UserId::new(Uuid::new_v4()), "11122233344"))
            .await
            .unwrap();

        // Same digits, different masking: still the same CPF.
        let err = gateway
            .insert_user(&new_user(UserId::new(Uuid::new_v4()), "111.222.333-44"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_users_newest_first() {
        let gateway = MemoryGateway::new();
        gateway
            .insert_user(&new_user(UserId::new(Uuid::new_v4()), "11122233344"))
            .await
            .unwrap();
        gateway
            .insert_user(&new_user(UserId::new(Uuid::new_v4()), "55566677788"))
            .await
            .unwrap();

        let users = gateway.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].cpf.digits(), "55566677788");
    }

    #[tokio::test]
    async fn test_feed_sees_insert_and_update() {
        let gateway = MemoryGateway::new();
        let mut feed = gateway.subscribe().await.unwrap();

        let id = UserId::new(Uuid::new_v4());
        gateway.insert_user(&new_user(id, "11122233344")).await.unwrap();
        gateway
            .update_status(id, AccountStatus::Approved)
            .await
            .unwrap();

        let Some(ChangeEvent::Insert(user)) = feed.next().await else {
            panic!("expected insert event");
        };
        assert_eq!(user.id, id);

        let Some(ChangeEvent::Update(user)) = feed.next().await else {
            panic!("expected update event");
        };
        assert_eq!(user.status, AccountStatus::Approved);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_is_noop() {
        let gateway = MemoryGateway::new();
        gateway
            .update_status(UserId::new(Uuid::new_v4()), AccountStatus::Approved)
            .await
            .unwrap();
    }
}
