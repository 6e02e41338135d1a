#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Account notification events and notification records.
//!
//! Raising an [`AccountNotification`] or [`AdminAccountNotification`]
//! produces one [`Notification`] addressed to every account that receives
//! notifications of that [`NotificationType`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// What an account is allowed to do.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccessLevel {
    /// Regular site owner.
    #[default]
    Standard,
    /// Program staff who review inventories.
    Elevated,
}

/// The kinds of notification the application emits.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    /// Someone registered a new account.
    NewUserAccountRegistration,
    /// An account was given elevated access.
    AdminPromotion,
    /// An inventory was submitted for review.
    InventorySubmission,
    /// An inventory was approved.
    ApprovedInventory,
    /// An inventory was authorized by rule.
    AuthorizedBySubmission,
}

impl NotificationType {
    /// Access level an account needs to receive this type.
    #[must_use]
    pub const fn audience(self) -> AccessLevel {
        match self {
            Self::NewUserAccountRegistration
            | Self::AdminPromotion
            | Self::InventorySubmission => AccessLevel::Elevated,
            Self::ApprovedInventory | Self::AuthorizedBySubmission => AccessLevel::Standard,
        }
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Access level.
    #[serde(default)]
    pub access: AccessLevel,
    /// Whether the account opted in to notifications.
    #[serde(default)]
    pub receive_notifications: bool,
}

impl Account {
    /// `"First Last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this account should be sent notifications of `kind`.
    ///
    /// Elevated accounts receive every type they opted in to; standard
    /// accounts only receive types addressed to standard accounts.
    #[must_use]
    pub fn receives(&self, kind: NotificationType) -> bool {
        self.receive_notifications && self.access >= kind.audience()
    }
}

/// A new account was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNotification {
    /// The account the notification is about.
    pub account: Account,
    /// What happened.
    pub notification_type: NotificationType,
}

/// An account was promoted to elevated access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccountNotification {
    /// The account the notification is about.
    pub account: Account,
    /// What happened.
    pub notification_type: NotificationType,
}

/// A notification fanned out to its recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// What happened.
    pub notification_type: NotificationType,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Accounts the notification is addressed to.
    pub recipient_ids: Vec<i64>,
    /// Values interpolated into the notification text.
    #[serde(default)]
    pub additional_data: BTreeMap<String, String>,
    /// Page the notification links to.
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    fn account(access: AccessLevel, receive_notifications: bool) -> Account {
        Account {
            id: 3,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            access,
            receive_notifications,
        }
    }

    #[test]
    fn notification_type_names() {
        assert_eq!(
            NotificationType::NewUserAccountRegistration.to_string(),
            "new_user_account_registration"
        );
        assert_eq!(
            NotificationType::from_str("admin_promotion").unwrap(),
            NotificationType::AdminPromotion
        );
    }

    #[test]
    fn elevated_opt_in_receives_everything() {
        let admin = account(AccessLevel::Elevated, true);
        assert!(admin.receives(NotificationType::AdminPromotion));
        assert!(admin.receives(NotificationType::ApprovedInventory));
    }

    #[test]
    fn standard_accounts_skip_staff_notifications() {
        let owner = account(AccessLevel::Standard, true);
        assert!(!owner.receives(NotificationType::NewUserAccountRegistration));
        assert!(owner.receives(NotificationType::ApprovedInventory));
    }

    #[test]
    fn opted_out_accounts_receive_nothing() {
        let admin = account(AccessLevel::Elevated, false);
        assert!(!admin.receives(NotificationType::InventorySubmission));
    }

    #[test]
    fn account_deserializes_with_defaults() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "id": 9,
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com"
        }))
        .unwrap();

        assert_eq!(account.access, AccessLevel::Standard);
        assert!(!account.receive_notifications);
        assert_eq!(account.full_name(), "Grace Hopper");
    }
}
