//! Client-held projection of the `users` table.
//!
//! The platform owns the table; the portal keeps a read-through projection
//! for the admin panel. On startup the directory fetches the full list
//! (newest first) and subscribes to the change feed; each emitted delta is
//! applied directly to the cached collection keyed by identifier. The
//! subscription lives as long as the directory and is released when it is
//! dropped.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use cotador_core::{AccountStatus, UserId};

use crate::gateway::{ChangeEvent, Gateway, GatewayError};
use crate::models::User;

/// The cached `users` projection plus its feed subscription.
pub struct UserDirectory {
    projection: Arc<RwLock<Vec<User>>>,
    reader: Option<JoinHandle<()>>,
}

impl UserDirectory {
    /// Fetch the initial list and start consuming the change feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial fetch or the subscription fails.
    pub async fn start(gateway: Arc<dyn Gateway>) -> Result<Self, GatewayError> {
        let users = gateway.list_users().await?;
        let mut feed = gateway.subscribe().await?;

        let projection = Arc::new(RwLock::new(users));
        let feed_target = Arc::clone(&projection);
        let reader = tokio::spawn(async move {
            while let Some(event) = feed.next().await {
                apply(&feed_target, event).await;
            }
            tracing::warn!("users change feed ended; projection is frozen");
        });

        Ok(Self {
            projection,
            reader: Some(reader),
        })
    }

    /// A directory over a fixed list, with no feed behind it.
    #[must_use]
    pub fn detached(users: Vec<User>) -> Self {
        Self {
            projection: Arc::new(RwLock::new(users)),
            reader: None,
        }
    }

    /// Every cached row, newest first.
    pub async fn snapshot(&self) -> Vec<User> {
        self.projection.read().await.clone()
    }

    /// Rows still awaiting an administrator decision.
    pub async fn pending(&self) -> Vec<User> {
        self.projection
            .read()
            .await
            .iter()
            .filter(|u| u.status == AccountStatus::Pending)
            .cloned()
            .collect()
    }

    /// Every non-administrator row.
    pub async fn non_admins(&self) -> Vec<User> {
        self.projection
            .read()
            .await
            .iter()
            .filter(|u| !u.is_admin)
            .cloned()
            .collect()
    }

    /// How many rows are pending.
    pub async fn pending_count(&self) -> usize {
        self.projection
            .read()
            .await
            .iter()
            .filter(|u| u.status == AccountStatus::Pending)
            .count()
    }

    /// Look up a cached row by identifier.
    pub async fn find(&self, id: UserId) -> Option<User> {
        self.projection
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    #[cfg(test)]
    pub(crate) async fn apply_event(&self, event: ChangeEvent) {
        apply(&self.projection, event).await;
    }
}

impl Drop for UserDirectory {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Apply one change event to the projection, keyed by id.
async fn apply(projection: &RwLock<Vec<User>>, event: ChangeEvent) {
    let mut users = projection.write().await;
    match event {
        ChangeEvent::Insert(user) | ChangeEvent::Update(user) => {
            if let Some(slot) = users.iter_mut().find(|u| u.id == user.id) {
                *slot = user;
            } else {
                // Keep newest-first order when slotting in a fresh row.
                let at = users
                    .iter()
                    .position(|u| u.created_at <= user.created_at)
                    .unwrap_or(users.len());
                users.insert(at, user);
            }
        }
        ChangeEvent::Delete(id) => {
            users.retain(|u| u.id != id);
        }
    }
}
