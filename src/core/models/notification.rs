//! Notification model

use serde::Serialize;

use super::{SectionKey, Signature};

/// A section that received a reply the subscriber has not seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionChange {
    /// The subscribed section
    pub section: SectionKey,
    /// First new signature found in the section
    pub trigger: Signature,
}

/// A talkback to deliver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Subscriber to notify
    pub user: String,
    /// Page the reply appeared on
    pub page: String,
    /// Heading of the section the reply appeared in
    pub heading: String,
}

impl Notification {
    /// Build the notification for `change` on `page`
    #[must_use]
    pub fn for_change(user: &str, page: &str, change: &SectionChange) -> Self {
        Self {
            user: user.to_string(),
            page: page.to_string(),
            heading: change.section.heading.clone(),
        }
    }
}
