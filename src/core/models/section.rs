//! Section model
//!
//! A section is a heading-delimited region of a page. Sections from two
//! revisions are the same logical section only when heading text and level
//! are both identical; there is no fuzzy matching or rename tracking.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a section: `(heading, level)`
///
/// Serialized as a two-element array, `["Discussion", 2]`, which is the
/// shape users write in their subscription pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, u8)", into = "(String, u8)")]
pub struct SectionKey {
    /// Heading text without the surrounding `=` markup
    pub heading: String,
    /// Nesting level (number of `=` on each side)
    pub level: u8,
}

impl SectionKey {
    /// Create a key
    pub fn new(heading: impl Into<String>, level: u8) -> Self {
        Self {
            heading: heading.into(),
            level,
        }
    }

    /// Whether `section` is this logical section
    #[must_use]
    pub fn matches(&self, section: &Section) -> bool {
        self.level == section.level && self.heading == section.heading
    }

    /// First section in `sections` with this key
    #[must_use]
    pub fn find_in<'a>(&self, sections: &'a [Section]) -> Option<&'a Section> {
        sections.iter().find(|section| self.matches(section))
    }
}

impl From<(String, u8)> for SectionKey {
    fn from((heading, level): (String, u8)) -> Self {
        Self {
            heading,
            level,
        }
    }
}

impl From<SectionKey> for (String, u8) {
    fn from(key: SectionKey) -> Self {
        (key.heading, key.level)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marks = "=".repeat(usize::from(self.level));
        write!(f, "{marks} {} {marks}", self.heading)
    }
}

/// A section of one page revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text, empty for the lead section
    pub heading: String,
    /// Nesting level, at least 1
    pub level: u8,
    /// Raw text up to the next heading of equal or shallower level
    pub body: String,
}

impl Section {
    /// Create a section
    pub fn new(heading: impl Into<String>, level: u8, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            level,
            body: body.into(),
        }
    }

    /// The `(heading, level)` identity of this section
    #[must_use]
    pub fn key(&self) -> SectionKey {
        SectionKey::new(self.heading.clone(), self.level)
    }
}
