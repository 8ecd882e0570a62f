//! Ranking pipeline: drain, index, rank, then pick snippets per document.

use crate::ranking::{DocumentFrequencyIndex, Ranker};
use crate::snippet::{SnippetExtractor, WindowSelector};
use crate::{Batch, Config, Document, RankedResult};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct Summarizer {
    config: Config,
    extractor: Arc<dyn SnippetExtractor>,
}

impl Summarizer {
    pub fn new(config: Config) -> Self {
        let extractor =
            WindowSelector::new(config.snippet.length, config.snippet.indicator.clone());
        Self::with_extractor(config, Arc::new(extractor))
    }

    pub fn with_extractor(config: Config, extractor: Arc<dyn SnippetExtractor>) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rank a whole batch as handed over by the matcher.
    pub fn run_batch(&self, batch: Batch) -> Vec<RankedResult> {
        self.run(batch.documents, batch.total_files)
    }

    /// Drain `input` completely, then rank and summarize it.
    ///
    /// Nothing is scored until the input is exhausted: batch frequencies and
    /// length normalization are only meaningful over the complete set.
    pub fn run<I>(&self, input: I, total_files: usize) -> Vec<RankedResult>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut documents: Vec<Document> = input
            .into_iter()
            .map(|mut doc| {
                doc.normalize();
                doc
            })
            .collect();

        info!(
            "[SUMMARIZE] Collected {} documents ({} files searched)",
            documents.len(),
            total_files
        );

        let index = DocumentFrequencyIndex::build(&documents);
        let ranker = Ranker::new(self.config.ranking.strategy, total_files);
        ranker.rank(&mut documents, &index, self.config.ranking.limit());

        let count = self.config.snippet.count.max(1);

        info!(
            "[SUMMARIZE] Selecting up to {} snippet(s) per document with '{}' extractor",
            count,
            self.extractor.name()
        );

        documents
            .par_iter()
            .map(|doc| self.summarize_document(doc, &index, count))
            .collect()
    }

    fn summarize_document(
        &self,
        doc: &Document,
        index: &DocumentFrequencyIndex,
        count: usize,
    ) -> RankedResult {
        let (snippets, error) = match self.extractor.extract(doc, index) {
            Ok(mut snippets) => {
                snippets.truncate(count);
                (snippets, None)
            }
            Err(e) => {
                warn!("[SUMMARIZE] Snippet selection failed for {}: {}", doc.location, e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        RankedResult {
            filename: doc.filename.clone(),
            location: doc.location.clone(),
            score: doc.score,
            snippets,
            error,
        }
    }
}
