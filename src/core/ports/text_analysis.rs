//! Text analysis ports
//!
//! Signature and section detection are heuristics over raw wikitext. Keeping
//! them behind traits lets the detector be tested with hand-built sections
//! and lets another site plug in its own conventions.

use crate::core::models::{Section, Signature};
use crate::error::AnalysisError;

/// Finds signed comments in wikitext
pub trait SignatureExtractor {
    /// All signatures in `text`, in order of first occurrence
    fn signatures(&self, text: &str) -> Vec<Signature>;

    /// Signatures in `text` whose user link points at `user`
    fn own_signatures(&self, text: &str, user: &str) -> Result<Vec<Signature>, AnalysisError>;
}

/// Splits wikitext into sections
pub trait SectionSplitter {
    /// Sections of `text` in document order
    fn split(&self, text: &str) -> Vec<Section>;
}
