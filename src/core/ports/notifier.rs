//! Notifier port
//!
//! Defines the interface for delivering talkback messages.

use serde::Serialize;

use crate::core::models::Notification;

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Delivery {
    /// Message saved to the talk page
    Delivered,
    /// Not sent, e.g. the talk page opts out of bot messages
    Skipped(String),
    /// The write failed
    Failed(String),
}

impl Delivery {
    /// Whether the message reached the talk page
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Delivers notifications to subscribers
///
/// Delivery never fails the caller; problems are logged by the
/// implementation and reported through [`Delivery`].
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// Tell `notification.user` about a reply on `notification.page`
    fn notify(&self, notification: &Notification) -> Delivery;
}
