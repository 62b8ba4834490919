//! Record page - the watch table as JSON on the wiki
//!
//! Format: `{user: {page: {latest_revision, latest_revision_id, section_names}}}`.

use crate::adapters::writer::save_with_retry;
use crate::core::models::WatchTable;
use crate::core::ports::{EditRequest, WikiSite};

/// Edit summary for record updates
pub const RECORD_SUMMARY: &str = "Update";

/// Writes the watch table to a record page
pub struct RecordWriter<'a> {
    site: &'a dyn WikiSite,
    page: String,
    max_attempts: u32,
}

impl std::fmt::Debug for RecordWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordWriter").field("page", &self.page).finish_non_exhaustive()
    }
}

impl<'a> RecordWriter<'a> {
    /// Writer for `page`
    pub fn new(site: &'a dyn WikiSite, page: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            site,
            page: page.into(),
            max_attempts,
        }
    }

    /// Record page title
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Replace the record page with `table`; returns whether it was saved
    pub fn save(&self, table: &WatchTable) -> bool {
        let json = match serde_json::to_string(table) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not serialize watch table: {err}");
                return false;
            },
        };
        let base = match self.site.latest_revision_id(&self.page) {
            Ok(base) => base,
            Err(err) => {
                log::warn!("could not read '{}' before saving: {err}", self.page);
                return false;
            },
        };
        let request = EditRequest::replace(self.page.as_str(), json, RECORD_SUMMARY, base);
        let saved = save_with_retry(self.site, &request, self.max_attempts).is_saved();
        if saved {
            log::debug!("saved {} watched pages to '{}'", table.page_count(), self.page);
        }
        saved
    }
}
