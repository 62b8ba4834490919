//! Domain models for sectionwatch
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Signature`] - "user X signed a comment at time T"
//! - [`Section`] / [`SectionKey`] - a heading-delimited region and its identity
//! - [`WatchEntry`] / [`PageState`] / [`WatchTable`] - who watches what, and the baselines
//! - [`Notification`] - a talkback to deliver

mod notification;
mod section;
mod signature;
mod watch;

pub use notification::{Notification, SectionChange};
pub use section::{Section, SectionKey};
pub use signature::Signature;
pub use watch::{PageState, Revision, WatchEntry, WatchTable};
