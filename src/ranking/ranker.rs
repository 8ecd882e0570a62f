//! Document scoring, ordering and truncation.

use super::DocumentFrequencyIndex;
use crate::{Document, Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Weight of a term hit anywhere in the document path.
const PATH_HIT_WEIGHT: f64 = 1.0;
/// Extra weight when the hit is in the file name itself.
const FILENAME_HIT_WEIGHT: f64 = 2.0;
/// Scales the in-document match count for location ranking.
const MATCH_COUNT_WEIGHT: f64 = 0.1;
/// Pivoted length normalization slope for weighted ranking.
const LENGTH_NORM_SLOPE: f64 = 0.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankStrategy {
    /// Scores from where terms hit the document path.
    Location,
    /// TF-IDF style scores from term counts and batch rarity.
    #[default]
    Weighted,
}

impl std::str::FromStr for RankStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "location" | "loc" => Ok(RankStrategy::Location),
            "weighted" | "tfidf" | "tf-idf" => Ok(RankStrategy::Weighted),
            other => Err(Error::Config(format!("Unknown ranking strategy: '{other}'"))),
        }
    }
}

/// Cap on the number of ranked results kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultLimit {
    Unlimited,
    Limit(usize),
}

impl From<i64> for ResultLimit {
    /// Any negative value means no limit.
    fn from(value: i64) -> Self {
        if value < 0 {
            ResultLimit::Unlimited
        } else {
            ResultLimit::Limit(value as usize)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ranker {
    strategy: RankStrategy,
    total_files: usize,
}

impl Ranker {
    pub fn new(strategy: RankStrategy, total_files: usize) -> Self {
        Self {
            strategy,
            total_files,
        }
    }

    /// Write a score into every document. Order is left untouched.
    pub fn score(&self, documents: &mut [Document], index: &DocumentFrequencyIndex) {
        match self.strategy {
            RankStrategy::Location => rank_location(documents),
            RankStrategy::Weighted => rank_weighted(self.total_files, documents, index),
        }
    }

    /// Score, sort and then truncate a complete batch.
    pub fn rank(
        &self,
        documents: &mut Vec<Document>,
        index: &DocumentFrequencyIndex,
        limit: ResultLimit,
    ) {
        self.score(documents, index);
        sort_results(documents);
        truncate_results(documents, limit);

        tracing::info!(
            "[RANK] Ranked {} documents using {:?} strategy",
            documents.len(),
            self.strategy
        );
    }
}

/// Score documents by how often the matched terms appear in their path.
///
/// Independent of term rarity. File name hits count more than directory hits,
/// and the in-document match count adds a small dampened bonus.
pub fn rank_location(documents: &mut [Document]) {
    for doc in documents.iter_mut() {
        let path = doc.location.to_lowercase();
        let filename = path
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or_default()
            .to_string();

        let mut score = 0.0;
        for term in doc.match_locations.keys() {
            let term = term.to_lowercase();
            if term.is_empty() {
                continue;
            }
            score += path.matches(term.as_str()).count() as f64 * PATH_HIT_WEIGHT;
            score += filename.matches(term.as_str()).count() as f64 * FILENAME_HIT_WEIGHT;
        }
        score += (1.0 + doc.match_count() as f64).ln() * MATCH_COUNT_WEIGHT;

        doc.score = score;
    }
}

/// TF-IDF style scoring.
///
/// Each term contributes `count * ln(1 + N / df)` where `N` is the number of
/// files the matcher looked at and `df` the term's batch frequency. The sum
/// is divided by a pivoted length norm against the batch's mean byte length.
pub fn rank_weighted(
    total_files: usize,
    documents: &mut [Document],
    index: &DocumentFrequencyIndex,
) {
    if documents.is_empty() {
        return;
    }

    let corpus = total_files.max(1) as f64;
    let avg_bytes = documents.iter().map(|d| d.bytes as f64).sum::<f64>() / documents.len() as f64;

    for doc in documents.iter_mut() {
        let mut weight = 0.0;
        for (term, ranges) in &doc.match_locations {
            let df = index.weight(term) as f64;
            let idf = (1.0 + corpus / df).ln();
            weight += ranges.len() as f64 * idf;
        }

        let norm = if avg_bytes > 0.0 {
            (1.0 - LENGTH_NORM_SLOPE) + LENGTH_NORM_SLOPE * (doc.bytes.max(1) as f64 / avg_bytes)
        } else {
            1.0
        };

        doc.score = weight / norm;
    }
}

/// Score descending, then location ascending. The sort is stable, so
/// documents equal on both keep their batch order.
pub fn sort_results(documents: &mut [Document]) {
    documents.sort_by(compare_documents);
}

fn compare_documents(a: &Document, b: &Document) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.location.cmp(&b.location))
}

/// Drop everything past `limit`. Only meaningful after a full sort.
pub fn truncate_results(documents: &mut Vec<Document>, limit: ResultLimit) {
    if let ResultLimit::Limit(limit) = limit {
        documents.truncate(limit);
    }
}
