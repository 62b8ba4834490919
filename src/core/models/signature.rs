//! Signature model
//!
//! A signature is the "user link ... timestamp" tail that talk-page
//! contributors leave after each comment. Identity is the exact matched text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One signed comment marker found in wikitext
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Wrap a matched substring
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The matched text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Signature {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
