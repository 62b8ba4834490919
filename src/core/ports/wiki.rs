//! Wiki site port
//!
//! Defines the interface for reading and writing pages on the wiki.

use crate::core::models::Revision;
use crate::error::WikiError;

/// Namespace number of `User:` pages
pub const USER_NAMESPACE: i32 = 2;

/// How an edit changes the page text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    /// Replace the whole text; `base_revision` detects conflicting saves
    Replace {
        /// New page text
        text: String,
        /// Revision the new text was derived from, `None` for a new page
        base_revision: Option<u64>,
    },
    /// Append `text` to whatever the page holds when the save lands
    Append {
        /// Text to append
        text: String,
    },
}

impl EditMode {
    /// The text being written
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Replace {
                text, ..
            }
            | Self::Append {
                text,
            } => text,
        }
    }
}

/// A single page write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Target page title
    pub title: String,
    /// Text change
    pub mode: EditMode,
    /// Edit summary
    pub summary: String,
    /// Mark as a minor edit
    pub minor: bool,
}

impl EditRequest {
    /// Append `text` to `title`
    pub fn append(title: impl Into<String>, text: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            mode: EditMode::Append {
                text: text.into(),
            },
            summary: summary.into(),
            minor: false,
        }
    }

    /// Replace the text of `title`
    pub fn replace(
        title: impl Into<String>,
        text: impl Into<String>,
        summary: impl Into<String>,
        base_revision: Option<u64>,
    ) -> Self {
        Self {
            title: title.into(),
            mode: EditMode::Replace {
                text: text.into(),
                base_revision,
            },
            summary: summary.into(),
            minor: true,
        }
    }

    /// Set the minor flag
    #[must_use]
    pub const fn minor(mut self, minor: bool) -> Self {
        self.minor = minor;
        self
    }
}

/// Access to one wiki
///
/// Implementations are blocking; the poll loop is single-threaded.
pub trait WikiSite {
    /// Account the bot is logged in as
    fn username(&self) -> &str;

    /// Latest revision id of `title`, `None` if the page does not exist
    fn latest_revision_id(&self, title: &str) -> Result<Option<u64>, WikiError>;

    /// Latest revision of `title`, `None` if the page does not exist
    fn latest_revision(&self, title: &str) -> Result<Option<Revision>, WikiError>;

    /// Titles of pages in `namespace` that transclude `template`
    fn embedded_in(&self, template: &str, namespace: i32) -> Result<Vec<String>, WikiError>;

    /// Save a page
    fn edit(&self, request: &EditRequest) -> Result<(), WikiError>;

    /// Text of `title`, `None` if the page does not exist
    fn page_text(&self, title: &str) -> Result<Option<String>, WikiError> {
        Ok(self.latest_revision(title)?.map(|revision| revision.content))
    }
}
