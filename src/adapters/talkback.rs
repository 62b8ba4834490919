//! Talk-page notifier
//!
//! Appends `{{subst:<template>|1=<page>|2=<heading>}}` to the subscriber's
//! `User talk:` page. Appending server-side keeps concurrent edits to the
//! talk page.

use crate::adapters::writer::{WriteOutcome, save_with_retry};
use crate::core::models::Notification;
use crate::core::ports::{Delivery, EditRequest, Notifier, WikiSite};

/// Delivers notifications as talk-page messages
pub struct TalkbackNotifier<'a> {
    site: &'a dyn WikiSite,
    template: String,
    summary: String,
    max_attempts: u32,
}

impl std::fmt::Debug for TalkbackNotifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TalkbackNotifier")
            .field("template", &self.template)
            .field("summary", &self.summary)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl<'a> TalkbackNotifier<'a> {
    /// Notifier substituting `template` with edit summary `summary`
    pub fn new(
        site: &'a dyn WikiSite,
        template: impl Into<String>,
        summary: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        Self {
            site,
            template: template.into(),
            summary: summary.into(),
            max_attempts,
        }
    }

    /// Wikitext appended for `notification`
    #[must_use]
    pub fn message(&self, notification: &Notification) -> String {
        format!(
            "\n\n{{{{subst:{}|1={}|2={}}}}}",
            self.template,
            template_arg(&notification.page),
            template_arg(&notification.heading)
        )
    }
}

/// Talk page of `user`
#[must_use]
pub fn talk_page(user: &str) -> String {
    format!("User talk:{user}")
}

fn template_arg(value: &str) -> String {
    value.replace('|', "{{!}}")
}

impl Notifier for TalkbackNotifier<'_> {
    fn notify(&self, notification: &Notification) -> Delivery {
        let request = EditRequest::append(
            talk_page(&notification.user),
            self.message(notification),
            self.summary.as_str(),
        );
        match save_with_retry(self.site, &request, self.max_attempts) {
            WriteOutcome::Saved => {
                log::info!(
                    "notified {} of a reply in '{}' § {}",
                    notification.user,
                    notification.page,
                    notification.heading
                );
                Delivery::Delivered
            },
            WriteOutcome::Excluded => Delivery::Skipped(format!("{} excludes bots", request.title)),
            WriteOutcome::Rejected(err) | WriteOutcome::Failed(err) => Delivery::Failed(err.to_string()),
        }
    }
}
