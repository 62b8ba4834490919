//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between core business logic
//! and external systems (the wiki, talk-page delivery, text heuristics).
//!
//! Implementations live in the `adapters` module.

mod notifier;
mod text_analysis;
mod wiki;

pub use notifier::{Delivery, Notifier};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use text_analysis::{SectionSplitter, SignatureExtractor};
pub use wiki::{EditMode, EditRequest, USER_NAMESPACE, WikiSite};
