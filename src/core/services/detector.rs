//! Change detector - decides which subscribed sections got a new reply
//!
//! Pure logic: takes the previous and current page text and returns the
//! sections worth a notification. Fetching, delivery and the baseline update
//! live in the poller.

use std::collections::HashSet;

use crate::core::models::{SectionChange, SectionKey, Signature};
use crate::core::ports::{SectionSplitter, SignatureExtractor};
use crate::error::AnalysisError;

/// Compares two revisions of a page for one subscriber
#[derive(Clone, Copy)]
pub struct ChangeDetector<'a> {
    splitter: &'a dyn SectionSplitter,
    signatures: &'a dyn SignatureExtractor,
}

impl std::fmt::Debug for ChangeDetector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDetector").finish_non_exhaustive()
    }
}

impl<'a> ChangeDetector<'a> {
    /// Create a detector from the text analysis capabilities
    #[must_use]
    pub fn new(splitter: &'a dyn SectionSplitter, signatures: &'a dyn SignatureExtractor) -> Self {
        Self {
            splitter,
            signatures,
        }
    }

    /// Sections of `watched` with a reply in `now` that `user` has not seen
    ///
    /// For each subscribed section present in `now` (first match on
    /// heading and level), signatures already in the same section of `then`
    /// and the subscriber's own signatures are ignored. The first remaining
    /// signature triggers one change for that section. A section absent from
    /// `then` has an empty baseline; one absent from `now` is skipped.
    ///
    /// Changes are returned in document order of `now`.
    pub fn detect(
        &self,
        user: &str,
        watched: &[SectionKey],
        then: &str,
        now: &str,
    ) -> Result<Vec<SectionChange>, AnalysisError> {
        if watched.is_empty() {
            return Ok(Vec::new());
        }
        let then_sections = self.splitter.split(then);
        let now_sections = self.splitter.split(now);

        let mut seen: HashSet<&SectionKey> = HashSet::new();
        let mut changes = Vec::new();
        for section in &now_sections {
            let Some(key) = watched.iter().find(|key| key.matches(section)) else {
                continue;
            };
            if !seen.insert(key) {
                continue;
            }

            let baseline: HashSet<Signature> = key
                .find_in(&then_sections)
                .map(|old| self.signatures.signatures(&old.body))
                .unwrap_or_default()
                .into_iter()
                .collect();
            let fresh: Vec<Signature> = self
                .signatures
                .signatures(&section.body)
                .into_iter()
                .filter(|sig| !baseline.contains(sig))
                .collect();
            if fresh.is_empty() {
                continue;
            }

            let own: HashSet<Signature> =
                self.signatures.own_signatures(&section.body, user)?.into_iter().collect();
            if let Some(trigger) = fresh.into_iter().find(|sig| !own.contains(sig)) {
                log::debug!("new reply in {key} for {user}: {trigger}");
                changes.push(SectionChange {
                    section: key.clone(),
                    trigger,
                });
            }
        }
        Ok(changes)
    }
}
