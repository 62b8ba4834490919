//! sectionwatch - A wiki bot that tells users about new replies in the talk-page
//! sections they subscribe to
//!
//! Reads its settings from `config.toml` and `$SECTIONWATCH_PASSWORD`, logs in,
//! loads subscriptions and polls until the process is stopped.

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

use anyhow::{Context, Result};
use sectionwatch::adapters::mediawiki::MediaWikiClient;
use sectionwatch::config::BotConfig;
use sectionwatch::paths;
use sectionwatch::scheduler::{Scheduler, StopHandle, SystemClock};
use sectionwatch::watcher::Watcher;

/// Main entry point for the sectionwatch bot
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("sectionwatch v{}", sectionwatch::VERSION);

    let config = BotConfig::load().context("failed to load configuration")?;
    let password = config
        .site
        .password
        .as_deref()
        .with_context(|| format!("no bot password: set site.password or ${}", paths::PASSWORD_ENV))?;
    let site = MediaWikiClient::connect(&config.site, password)
        .with_context(|| format!("failed to log in to {}", config.site.api_url))?;

    let mut watcher = Watcher::new(&site, &config).context("invalid signature pattern")?;
    watcher.load().context("failed to load subscriptions")?;

    let scheduler = Scheduler::new(config.schedule.interval(), config.schedule.reload_every);
    scheduler.run(&mut watcher, &SystemClock, &StopHandle::new());
    Ok(())
}
