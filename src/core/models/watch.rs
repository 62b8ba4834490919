//! Watch models
//!
//! - [`WatchEntry`] - what a user subscribes to on one page
//! - [`PageState`] - the baseline kept for one user+page pair
//! - [`WatchTable`] - every user's page states, swapped wholesale on reload

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SectionKey;

/// A fetched page revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Revision identifier
    pub id: u64,
    /// Full wikitext of the revision
    pub content: String,
}

impl Revision {
    /// Create a revision
    pub fn new(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// A user's subscription to sections of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    /// Page title
    pub page: String,
    /// Subscribed sections, duplicates removed, first occurrence kept
    pub sections: Vec<SectionKey>,
}

impl WatchEntry {
    /// Create an entry, collapsing duplicate section keys
    pub fn new(page: impl Into<String>, sections: impl IntoIterator<Item = SectionKey>) -> Self {
        let mut unique: Vec<SectionKey> = Vec::new();
        for key in sections {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        Self {
            page: page.into(),
            sections: unique,
        }
    }
}

/// Baseline for one user+page pair
///
/// Content and revision id only change together through [`PageState::advance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    #[serde(rename = "latest_revision")]
    content: String,
    #[serde(rename = "latest_revision_id")]
    revision_id: u64,
    #[serde(rename = "section_names")]
    sections: Vec<SectionKey>,
}

impl PageState {
    /// Start watching `sections` with `revision` as the baseline
    #[must_use]
    pub fn new(revision: Revision, sections: Vec<SectionKey>) -> Self {
        Self {
            content: revision.content,
            revision_id: revision.id,
            sections,
        }
    }

    /// Last-seen content
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Last-seen revision id
    #[must_use]
    pub const fn revision_id(&self) -> u64 {
        self.revision_id
    }

    /// Subscribed sections
    #[must_use]
    pub fn sections(&self) -> &[SectionKey] {
        &self.sections
    }

    /// Whether `revision_id` differs from the baseline
    #[must_use]
    pub const fn is_stale(&self, revision_id: u64) -> bool {
        self.revision_id != revision_id
    }

    /// Replace the baseline with `revision`
    pub fn advance(&mut self, revision: Revision) {
        self.content = revision.content;
        self.revision_id = revision.id;
    }
}

/// Page states of every subscribed user
///
/// Users and pages are kept in ordered maps so a tick always visits them in
/// the same order. Serializes to the record-page format:
/// `{user: {page: {latest_revision, latest_revision_id, section_names}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchTable {
    users: BTreeMap<String, BTreeMap<String, PageState>>,
}

impl WatchTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page for `user`, keeping an existing entry for the same page
    ///
    /// Returns `false` when the page was already watched.
    pub fn insert(&mut self, user: &str, page: impl Into<String>, state: PageState) -> bool {
        let pages = self.users.entry(user.to_string()).or_default();
        let page = page.into();
        if pages.contains_key(&page) {
            return false;
        }
        pages.insert(page, state);
        true
    }

    /// Register `user` with no pages
    pub fn add_user(&mut self, user: &str) {
        self.users.entry(user.to_string()).or_default();
    }

    /// Page state for `user` on `page`
    #[must_use]
    pub fn get(&self, user: &str, page: &str) -> Option<&PageState> {
        self.users.get(user).and_then(|pages| pages.get(page))
    }

    /// Users in the table
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    /// Iterate `(user, page, state)` mutably, in order
    pub fn entries_mut(&mut self) -> impl Iterator<Item = (&str, &str, &mut PageState)> {
        self.users.iter_mut().flat_map(|(user, pages)| {
            pages.iter_mut().map(move |(page, state)| (user.as_str(), page.as_str(), state))
        })
    }

    /// Number of users
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of watched (user, page) pairs
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.users.values().map(BTreeMap::len).sum()
    }

    /// Whether no page is watched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.page_count() == 0
    }
}
