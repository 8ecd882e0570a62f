//! Per-batch term frequency counts.

use crate::Document;
use std::collections::BTreeMap;

/// How many match occurrences each term contributed across the batch
/// currently being ranked. Rebuilt for every batch; never a corpus index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFrequencyIndex {
    counts: BTreeMap<String, usize>,
}

impl DocumentFrequencyIndex {
    pub fn build(documents: &[Document]) -> Self {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            for (term, ranges) in &doc.match_locations {
                *counts.entry(term.clone()).or_insert(0) += ranges.len();
            }
        }

        tracing::debug!("[FREQ] {} terms over {} documents", counts.len(), documents.len());

        Self { counts }
    }

    /// Raw count, 0 for unknown terms.
    pub fn get(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Count usable as a divisor: missing or zero counts become 1.
    pub fn weight(&self, term: &str) -> usize {
        self.get(term).max(1)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(term, count)| (term.as_str(), *count))
    }
}
