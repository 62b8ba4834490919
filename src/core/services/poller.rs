//! Poller - one tick over every watched page
//!
//! For each (user, page) pair: skip it if the revision id is unchanged,
//! otherwise fetch the page, run the detector, deliver notifications and
//! advance the baseline. Each pair yields a [`PageOutcome`]; an error on one
//! pair never stops the others.

use chrono::Utc;

use super::ChangeDetector;
use crate::core::models::{Notification, PageState, WatchTable};
use crate::core::ports::{Notifier, WikiSite};
use crate::error::CheckError;
use crate::output::{PageOutcome, PageReport, TickReport};

/// Check every page in `table` once
pub fn poll_tick(
    table: &mut WatchTable,
    site: &dyn WikiSite,
    detector: &ChangeDetector<'_>,
    notifier: &dyn Notifier,
) -> TickReport {
    let mut report = TickReport::new(Utc::now());
    for (user, page, state) in table.entries_mut() {
        let outcome = match check_page(user, page, state, site, detector, notifier) {
            Ok(outcome) => outcome,
            Err(err) => {
                let sections: Vec<String> = state.sections().iter().map(ToString::to_string).collect();
                log::warn!(
                    "checking '{page}' for {user} failed: {err}; subscribed sections: {}",
                    sections.join(", ")
                );
                PageOutcome::Failed {
                    reason: err.to_string(),
                }
            },
        };
        report.outcomes.push(PageReport {
            user: user.to_string(),
            page: page.to_string(),
            outcome,
        });
    }
    report
}

/// Check one page for one subscriber
///
/// The baseline advances after all notifications were attempted, whether
/// or not they were delivered.
pub fn check_page(
    user: &str,
    page: &str,
    state: &mut PageState,
    site: &dyn WikiSite,
    detector: &ChangeDetector<'_>,
    notifier: &dyn Notifier,
) -> Result<PageOutcome, CheckError> {
    let Some(latest_id) = site.latest_revision_id(page)? else {
        log::debug!("'{page}' no longer exists");
        return Ok(PageOutcome::Missing);
    };
    if !state.is_stale(latest_id) {
        return Ok(PageOutcome::Unchanged);
    }
    let Some(revision) = site.latest_revision(page)? else {
        log::debug!("'{page}' was deleted while checking");
        return Ok(PageOutcome::Missing);
    };
    log::debug!("'{page}' moved from r{} to r{} ({user})", state.revision_id(), revision.id);

    let changes = detector.detect(user, state.sections(), state.content(), &revision.content)?;
    let mut deliveries = Vec::with_capacity(changes.len());
    for change in &changes {
        let notification = Notification::for_change(user, page, change);
        let delivery = notifier.notify(&notification);
        deliveries.push((change.section.heading.clone(), delivery));
    }

    let revision_id = revision.id;
    state.advance(revision);
    Ok(PageOutcome::checked(revision_id, deliveries))
}
