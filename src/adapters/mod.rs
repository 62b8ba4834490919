//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `mediawiki/` - Action API client ([`WikiSite`](crate::core::ports::WikiSite))
//! - `wikitext/` - Signature and heading heuristics, bot exclusion
//! - `writer` - Page writes with bounded conflict retry
//! - `talkback` - Talk-page [`Notifier`](crate::core::ports::Notifier)
//! - `subscription` - Subscription page discovery and parsing
//! - `record` - Watch table mirror on the wiki

pub mod mediawiki;
pub mod record;
pub mod subscription;
pub mod talkback;
pub mod wikitext;
pub mod writer;
