//! Property-based tests for the change detector
//!
//! Uses proptest to verify properties that should hold for all inputs.

use proptest::prelude::*;
use sectionwatch::adapters::wikitext::{DEFAULT_TIMESTAMP_PATTERN, HeadingSplitter, RegexSignatureExtractor};
use sectionwatch::core::models::SectionKey;
use sectionwatch::core::services::ChangeDetector;

use crate::common::section;

const HEADINGS: [&str; 3] = ["Alpha", "Beta", "Gamma"];

fn page(comments: &[Vec<(String, u32)>]) -> String {
    HEADINGS
        .iter()
        .zip(comments)
        .map(|(heading, signers)| {
            let signers: Vec<(&str, u32)> = signers.iter().map(|(u, m)| (u.as_str(), *m)).collect();
            section(heading, &signers)
        })
        .collect()
}

fn signers() -> impl Strategy<Value = Vec<(String, u32)>> {
    prop::collection::vec(("[A-Z][a-z]{2,6}", 0u32..60), 0..4)
}

fn pages() -> impl Strategy<Value = Vec<Vec<(String, u32)>>> {
    prop::collection::vec(signers(), 3)
}

proptest! {
    /// A subscriber's own replies never notify them
    #[test]
    fn own_replies_never_notify(
        user in "[A-Z][a-z]{2,6}",
        then in pages(),
        minutes in prop::collection::vec(0u32..60, 3),
    ) {
        let mut now = then.clone();
        for (signers, minute) in now.iter_mut().zip(&minutes) {
            signers.push((user.clone(), *minute));
        }
        let splitter = HeadingSplitter::new();
        let signatures = RegexSignatureExtractor::new(DEFAULT_TIMESTAMP_PATTERN).unwrap();
        let watched: Vec<SectionKey> = HEADINGS.iter().map(|h| SectionKey::new(*h, 2)).collect();
        let changes = ChangeDetector::new(&splitter, &signatures)
            .detect(&user, &watched, &page(&then), &page(&now))
            .unwrap();
        prop_assert!(changes.is_empty());
    }

    /// Each watched section yields at most one change per comparison
    #[test]
    fn at_most_one_change_per_section(then in pages(), now in pages()) {
        let splitter = HeadingSplitter::new();
        let signatures = RegexSignatureExtractor::new(DEFAULT_TIMESTAMP_PATTERN).unwrap();
        let mut watched: Vec<SectionKey> = HEADINGS.iter().map(|h| SectionKey::new(*h, 2)).collect();
        watched.push(SectionKey::new("Alpha", 2));
        let changes = ChangeDetector::new(&splitter, &signatures)
            .detect("Subscriber", &watched, &page(&then), &page(&now))
            .unwrap();
        prop_assert!(changes.len() <= HEADINGS.len());
        for heading in HEADINGS {
            prop_assert!(changes.iter().filter(|c| c.section.heading == heading).count() <= 1);
        }
    }

    /// Comparing a page with itself never notifies
    #[test]
    fn identical_revisions_never_notify(text in pages()) {
        let splitter = HeadingSplitter::new();
        let signatures = RegexSignatureExtractor::new(DEFAULT_TIMESTAMP_PATTERN).unwrap();
        let watched: Vec<SectionKey> = HEADINGS.iter().map(|h| SectionKey::new(*h, 2)).collect();
        let text = page(&text);
        let changes = ChangeDetector::new(&splitter, &signatures)
            .detect("Subscriber", &watched, &text, &text)
            .unwrap();
        prop_assert!(changes.is_empty());
    }
}
