#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Notification fan-out for account events.
//!
//! Each handler builds one [`Notification`] addressed to the accounts that
//! receive its type, links it to the account's profile page, and saves it
//! once through a [`NotificationStore`]. Failed saves are returned to the
//! caller; nothing is retried.

pub mod store;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uic_inventory_notifications_models::{
    Account, AccountNotification, AdminAccountNotification, Notification, NotificationType,
};

pub use store::{MemoryNotificationStore, NotificationStore};

/// Errors from notification handling.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The backing store failed.
    #[error("Notification store error: {message}")]
    Store {
        /// Description of the failure.
        message: String,
    },
}

/// A notification with its type, timestamp, and recipients filled in.
#[must_use]
pub fn basic_notification(
    notification_type: NotificationType,
    accounts: &[Account],
    created_at: DateTime<Utc>,
) -> Notification {
    Notification {
        notification_type,
        created_at,
        recipient_ids: accounts
            .iter()
            .filter(|a| a.receives(notification_type))
            .map(|a| a.id)
            .collect(),
        additional_data: BTreeMap::new(),
        url: None,
    }
}

/// A notification about `account`, linking to its profile.
#[must_use]
pub fn account_notification(
    account: &Account,
    notification_type: NotificationType,
    accounts: &[Account],
    created_at: DateTime<Utc>,
) -> Notification {
    let mut notification = basic_notification(notification_type, accounts, created_at);
    notification
        .additional_data
        .insert("name".to_string(), account.full_name());
    notification.url = Some(format!("/account/{}/profile", account.id));
    notification
}

/// Handles a new account registration.
///
/// # Errors
///
/// Returns [`NotificationError`] if the store cannot be read or written.
pub async fn handle_account_notification<S: NotificationStore + ?Sized>(
    store: &S,
    event: &AccountNotification,
) -> Result<Notification, NotificationError> {
    log::info!(
        "Handling new account creation notification for account {}",
        event.account.id
    );
    notify(store, &event.account, event.notification_type).await
}

/// Handles an admin promotion.
///
/// # Errors
///
/// Returns [`NotificationError`] if the store cannot be read or written.
pub async fn handle_admin_account_notification<S: NotificationStore + ?Sized>(
    store: &S,
    event: &AdminAccountNotification,
) -> Result<Notification, NotificationError> {
    log::info!(
        "Handling admin account promotion notification for account {}",
        event.account.id
    );
    notify(store, &event.account, event.notification_type).await
}

async fn notify<S: NotificationStore + ?Sized>(
    store: &S,
    account: &Account,
    notification_type: NotificationType,
) -> Result<Notification, NotificationError> {
    let accounts = store.accounts().await?;
    let notification = account_notification(account, notification_type, &accounts, Utc::now());

    if notification.recipient_ids.is_empty() {
        log::warn!("No recipients for {notification_type} notification");
    }

    store.save(notification.clone()).await?;
    log::debug!(
        "Saved {notification_type} notification for {} recipients",
        notification.recipient_ids.len()
    );
    Ok(notification)
}
