//! Wikitext heuristics
//!
//! Regex-based implementations of the text analysis ports, tuned for
//! zh.wikipedia signatures, plus the bot exclusion check.

mod bots;
mod sections;
mod signature;

pub use bots::bot_may_edit;
pub use sections::{HeadingSplitter, LEAD_LEVEL, MAX_LEVEL};
pub use signature::{DEFAULT_TIMESTAMP_PATTERN, RegexSignatureExtractor, USER_LINK_PATTERN};
