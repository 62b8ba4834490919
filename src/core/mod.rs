//! Core domain logic for sectionwatch
//!
//! This module contains the notification logic with no I/O dependencies.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (`SectionKey`, `PageState`, `WatchTable`)
//! - `services/` - Change detection and the poll pass
//! - `ports/` - Trait definitions for the wiki and notification delivery

pub mod models;
pub mod ports;
pub mod services;
