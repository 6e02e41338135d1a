//! Where accounts are read from and notifications are written to.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uic_inventory_notifications_models::{Account, Notification};

use crate::NotificationError;

/// Backing store for notification fan-out.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// All accounts that could receive a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Store`] if the accounts cannot be read.
    async fn accounts(&self) -> Result<Vec<Account>, NotificationError>;

    /// Persists a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Store`] if the save fails.
    async fn save(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    accounts: Vec<Account>,
    saved: Mutex<Vec<Notification>>,
}

impl MemoryNotificationStore {
    /// Creates a store over a fixed set of accounts.
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Notifications saved so far, oldest first.
    pub async fn saved(&self) -> Vec<Notification> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn accounts(&self) -> Result<Vec<Account>, NotificationError> {
        Ok(self.accounts.clone())
    }

    async fn save(&self, notification: Notification) -> Result<(), NotificationError> {
        self.saved.lock().await.push(notification);
        Ok(())
    }
}
