//! Page writes with bounded conflict retry
//!
//! Conflicts are retried up to the attempt limit, re-reading the base
//! revision for whole-page replacements. Policy rejections (protection,
//! blacklists, abuse filter) stop at once. Pages that exclude the bot are
//! never written.

use crate::adapters::wikitext::bot_may_edit;
use crate::core::ports::{EditMode, EditRequest, WikiSite};
use crate::error::WikiError;

/// How a write ended
#[derive(Debug)]
pub enum WriteOutcome {
    /// The edit was saved
    Saved,
    /// The page opts out of edits by this bot
    Excluded,
    /// The wiki refused the edit on policy grounds; not retried
    Rejected(WikiError),
    /// Conflicts exhausted the attempts, or another error occurred
    Failed(WikiError),
}

impl WriteOutcome {
    /// Whether the edit was saved
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Save `request`, retrying edit conflicts up to `max_attempts` times
pub fn save_with_retry(site: &dyn WikiSite, request: &EditRequest, max_attempts: u32) -> WriteOutcome {
    match site.page_text(&request.title) {
        Ok(Some(text)) if !bot_may_edit(&text, site.username()) => {
            log::warn!("'{}' excludes {}; not editing", request.title, site.username());
            return WriteOutcome::Excluded;
        },
        Ok(_) => {},
        Err(err) => return give_up(request, WriteOutcome::Failed(err)),
    }

    let mut request = request.clone();
    let mut last_conflict = None;
    for attempt in 1..=max_attempts.max(1) {
        match site.edit(&request) {
            Ok(()) => return WriteOutcome::Saved,
            Err(err) if err.is_conflict() => {
                log::warn!("edit conflict on '{}' (attempt {attempt}/{max_attempts})", request.title);
                if let Err(refresh) = refresh_base(site, &mut request) {
                    return give_up(&request, WriteOutcome::Failed(refresh));
                }
                last_conflict = Some(err);
            },
            Err(err) if err.is_policy_rejection() => {
                return give_up(&request, WriteOutcome::Rejected(err));
            },
            Err(err) => return give_up(&request, WriteOutcome::Failed(err)),
        }
    }
    let err = last_conflict.unwrap_or_else(|| WikiError::EditConflict(request.title.clone()));
    give_up(&request, WriteOutcome::Failed(err))
}

fn refresh_base(site: &dyn WikiSite, request: &mut EditRequest) -> Result<(), WikiError> {
    if let EditMode::Replace {
        base_revision, ..
    } = &mut request.mode
    {
        *base_revision = site.latest_revision_id(&request.title)?;
    }
    Ok(())
}

fn give_up(request: &EditRequest, outcome: WriteOutcome) -> WriteOutcome {
    if let WriteOutcome::Rejected(err) | WriteOutcome::Failed(err) = &outcome {
        let preview: String = request.mode.text().chars().take(100).collect();
        log::warn!(
            "edit to '{}' was stopped: {err}; text '{preview}', summary '{}'",
            request.title,
            request.summary
        );
    }
    outcome
}
