//! Shared test fakes and helpers
//!
//! In-memory stand-ins for the wiki, the notifier and the clock. State sits
//! behind `RefCell`/`Cell` because the ports take `&self`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::time::Duration;

use sectionwatch::core::models::{Notification, Revision};
use sectionwatch::core::ports::{Delivery, EditMode, EditRequest, Notifier, WikiSite};
use sectionwatch::error::WikiError;
use sectionwatch::scheduler::{Clock, StopHandle};

/// Subscription template used throughout the tests
pub const TEMPLATE: &str = "User:Twelephant-bot/subscription";

/// Bot account used throughout the tests
pub const BOT: &str = "Twelephant-bot";

/// A timestamp in the default (zh.wikipedia) format
pub fn timestamp(minute: u32) -> String {
    format!("2024年1月2日 (二) 11:{minute:02} (UTC)")
}

/// A signature line for `user` at `minute`
pub fn sig(user: &str, minute: u32) -> String {
    format!("[[User:{user}|{user}]]（[[User talk:{user}|留言]]） {}", timestamp(minute))
}

/// A level-2 section with one comment per signer
pub fn section(heading: &str, comments: &[(&str, u32)]) -> String {
    let mut text = format!("== {heading} ==\n");
    for (user, minute) in comments {
        text.push_str(&format!("Comment. {}\n", sig(user, *minute)));
    }
    text
}

/// In-memory wiki
///
/// Revision ids are global and increase with every save. Edits are applied
/// to the stored pages and also recorded.
pub struct FakeWiki {
    user: String,
    pages: RefCell<BTreeMap<String, Revision>>,
    next_id: Cell<u64>,
    embedded: RefCell<Vec<String>>,
    broken: RefCell<Vec<String>>,
    rejected: RefCell<Vec<String>>,
    discovery_down: Cell<bool>,
    edits: RefCell<Vec<EditRequest>>,
    fetches: Cell<usize>,
}

impl Default for FakeWiki {
    fn default() -> Self {
        Self::new(BOT)
    }
}

impl FakeWiki {
    /// Empty wiki where the bot is logged in as `user`
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            pages: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(100),
            embedded: RefCell::new(Vec::new()),
            broken: RefCell::new(Vec::new()),
            rejected: RefCell::new(Vec::new()),
            discovery_down: Cell::new(false),
            edits: RefCell::new(Vec::new()),
            fetches: Cell::new(0),
        }
    }

    fn bump(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    /// Save `content` as a new revision of `title`; returns its id
    pub fn set_page(&self, title: &str, content: &str) -> u64 {
        let id = self.bump();
        self.pages.borrow_mut().insert(title.to_string(), Revision::new(id, content));
        id
    }

    /// Delete `title`
    pub fn delete_page(&self, title: &str) {
        self.pages.borrow_mut().remove(title);
    }

    /// Current text of `title`
    pub fn text(&self, title: &str) -> Option<String> {
        self.pages.borrow().get(title).map(|r| r.content.clone())
    }

    /// Current revision id of `title`
    pub fn revision_id(&self, title: &str) -> Option<u64> {
        self.pages.borrow().get(title).map(|r| r.id)
    }

    /// Create a subscription page that transcludes [`TEMPLATE`]
    pub fn subscribe(&self, title: &str, content: &str) {
        self.set_page(title, content);
        self.embedded.borrow_mut().push(title.to_string());
    }

    /// JSON subscription page for `user` watching `sections` of `page`
    pub fn subscribe_json(&self, user: &str, page: &str, sections: &[(&str, u8)]) {
        let sections: Vec<serde_json::Value> =
            sections.iter().map(|(h, l)| serde_json::json!([h, l])).collect();
        let content = serde_json::json!([[page, sections], ""]).to_string();
        self.subscribe(&format!("User:{user}/subscription.json"), &content);
    }

    /// Make reads of `title` fail
    pub fn break_page(&self, title: &str) {
        self.broken.borrow_mut().push(title.to_string());
    }

    /// Make edits to `title` fail with a protection error
    pub fn protect(&self, title: &str) {
        self.rejected.borrow_mut().push(title.to_string());
    }

    /// Make template discovery fail
    pub fn set_discovery_down(&self, down: bool) {
        self.discovery_down.set(down);
    }

    /// Every edit attempted, in order
    pub fn edits(&self) -> Vec<EditRequest> {
        self.edits.borrow().clone()
    }

    /// Edits attempted on `title`
    pub fn edits_to(&self, title: &str) -> Vec<EditRequest> {
        self.edits.borrow().iter().filter(|e| e.title == title).cloned().collect()
    }

    /// Number of full revision fetches so far
    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }

    fn check(&self, title: &str) -> Result<(), WikiError> {
        if self.broken.borrow().iter().any(|b| b == title) {
            return Err(WikiError::Api {
                code: "internal_api_error".into(),
                info: format!("cannot read {title}"),
            });
        }
        Ok(())
    }
}

impl WikiSite for FakeWiki {
    fn username(&self) -> &str {
        &self.user
    }

    fn latest_revision_id(&self, title: &str) -> Result<Option<u64>, WikiError> {
        self.check(title)?;
        Ok(self.revision_id(title))
    }

    fn latest_revision(&self, title: &str) -> Result<Option<Revision>, WikiError> {
        self.check(title)?;
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.pages.borrow().get(title).cloned())
    }

    fn embedded_in(&self, template: &str, namespace: i32) -> Result<Vec<String>, WikiError> {
        if self.discovery_down.get() {
            return Err(WikiError::Malformed("embeddedin unavailable".into()));
        }
        assert_eq!(template, TEMPLATE);
        assert_eq!(namespace, 2);
        Ok(self.embedded.borrow().clone())
    }

    fn edit(&self, request: &EditRequest) -> Result<(), WikiError> {
        self.edits.borrow_mut().push(request.clone());
        if self.rejected.borrow().iter().any(|t| *t == request.title) {
            return Err(WikiError::Protected(request.title.clone()));
        }
        let text = match &request.mode {
            EditMode::Append {
                text,
            } => self.text(&request.title).unwrap_or_default() + text,
            EditMode::Replace {
                text, ..
            } => text.clone(),
        };
        self.set_page(&request.title, &text);
        Ok(())
    }
}

/// Notifier that records every notification
#[derive(Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
    fail: Cell<bool>,
}

impl RecordingNotifier {
    /// Report every delivery as failed from now on
    pub fn fail_all(&self) {
        self.fail.set(true);
    }

    /// Notifications received so far
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.borrow().clone()
    }

    /// Forget received notifications
    pub fn clear(&self) {
        self.sent.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Delivery {
        self.sent.borrow_mut().push(notification.clone());
        if self.fail.get() {
            Delivery::Failed("talk page is protected".into())
        } else {
            Delivery::Delivered
        }
    }
}

/// Virtual clock: lets `budget` sleeps pass instantly, then reports a stop
pub struct ManualClock {
    budget: Cell<u32>,
    elapsed: Cell<Duration>,
}

impl ManualClock {
    /// Clock that allows `budget` sleeps
    pub fn new(budget: u32) -> Self {
        Self {
            budget: Cell::new(budget),
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    /// Total virtual time slept
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Clock for ManualClock {
    fn sleep(&self, duration: Duration, stop: &StopHandle) -> bool {
        if stop.is_stopped() || self.budget.get() == 0 {
            return false;
        }
        self.budget.set(self.budget.get() - 1);
        self.elapsed.set(self.elapsed.get() + duration);
        true
    }
}
