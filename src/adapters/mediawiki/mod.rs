//! MediaWiki Action API adapter
//!
//! Implements [`WikiSite`](crate::core::ports::WikiSite) over HTTP with a
//! bot-password login.

mod client;
pub mod response;

pub use client::MediaWikiClient;
