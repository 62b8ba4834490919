//! sectionwatch - A wiki bot that tells users about new replies in the talk-page
//! sections they subscribe to
//!
//! This library provides section splitting and signature detection over
//! wikitext, the poll loop that compares revisions, and the MediaWiki
//! adapters that discover subscriptions and deliver talk-page notifications.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod paths;
pub mod scheduler;
pub mod watcher;
