//! The running bot: owns the watch table and wires adapters to the core
//!
//! A reload builds a complete new table before swapping it in, so a failed
//! reload leaves the previous subscriptions in place.

use crate::adapters::record::RecordWriter;
use crate::adapters::subscription::SubscriptionLoader;
use crate::adapters::talkback::TalkbackNotifier;
use crate::adapters::wikitext::{HeadingSplitter, RegexSignatureExtractor};
use crate::config::BotConfig;
use crate::core::models::WatchTable;
use crate::core::ports::WikiSite;
use crate::core::services::{ChangeDetector, poll_tick};
use crate::error::{AnalysisError, WikiError};
use crate::output::{LoadReport, OutputMode, TickReport};
use crate::scheduler::Task;

/// Subscriptions plus everything needed to serve them
pub struct Watcher<'a> {
    site: &'a dyn WikiSite,
    splitter: HeadingSplitter,
    signatures: RegexSignatureExtractor,
    notifier: TalkbackNotifier<'a>,
    record: Option<RecordWriter<'a>>,
    template: String,
    format: OutputMode,
    table: WatchTable,
}

impl std::fmt::Debug for Watcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("template", &self.template)
            .field("users", &self.table.user_count())
            .field("pages", &self.table.page_count())
            .finish_non_exhaustive()
    }
}

impl<'a> Watcher<'a> {
    /// Watcher with an empty table; call [`load`](Self::load) before polling
    pub fn new(site: &'a dyn WikiSite, config: &BotConfig) -> Result<Self, AnalysisError> {
        let max_attempts = config.edit.max_attempts;
        Ok(Self {
            site,
            splitter: HeadingSplitter::new(),
            signatures: RegexSignatureExtractor::new(&config.signature.timestamp_pattern)?,
            notifier: TalkbackNotifier::new(
                site,
                config.notification.template.as_str(),
                config.notification.summary.as_str(),
                max_attempts,
            ),
            record: config
                .subscription
                .record_page()
                .map(|page| RecordWriter::new(site, page, max_attempts)),
            template: config.subscription.template.clone(),
            format: config.report.format,
            table: WatchTable::new(),
        })
    }

    /// Current subscriptions
    #[must_use]
    pub const fn table(&self) -> &WatchTable {
        &self.table
    }

    /// Rebuild the table from the wiki and swap it in
    pub fn load(&mut self) -> Result<LoadReport, WikiError> {
        let (table, report) = SubscriptionLoader::new(self.site, self.template.as_str()).load()?;
        log::info!("{}", report.render(self.format));
        self.table = table;
        self.save_record();
        Ok(report)
    }

    /// Check every watched page once
    pub fn poll(&mut self) -> TickReport {
        let detector = ChangeDetector::new(&self.splitter, &self.signatures);
        let report = poll_tick(&mut self.table, self.site, &detector, &self.notifier);
        log::info!("{}", report.render(self.format));
        if report.advanced() > 0 {
            self.save_record();
        }
        report
    }

    fn save_record(&self) {
        if let Some(record) = &self.record
            && !record.save(&self.table)
        {
            log::warn!("record page '{}' was not updated", record.page());
        }
    }
}

impl Task for Watcher<'_> {
    fn tick(&mut self) {
        self.poll();
    }

    fn reload(&mut self) {
        if let Err(err) = self.load() {
            log::error!("reloading subscriptions failed, keeping {} users: {err}", self.table.user_count());
        }
    }
}
