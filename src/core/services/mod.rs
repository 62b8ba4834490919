//! Business logic services
//!
//! Orchestration over domain models. I/O goes through the port traits
//! passed in, never through adapters directly.
//!
//! - [`detector`] - Decide which subscribed sections got a new reply
//! - [`poller`] - One pass over the watch table

pub mod detector;
pub mod poller;

pub use detector::ChangeDetector;
pub use poller::{check_page, poll_tick};
