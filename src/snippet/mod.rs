pub mod highlight;
pub mod window;

use crate::ranking::DocumentFrequencyIndex;
use crate::{Document, Result, Snippet};

/// Picks display excerpts for one document.
///
/// Implementations return snippets best first; callers cap the list.
pub trait SnippetExtractor: Send + Sync {
    fn extract(&self, document: &Document, index: &DocumentFrequencyIndex) -> Result<Vec<Snippet>>;

    fn name(&self) -> &str;
}

pub use highlight::remap_highlights;
pub use window::{WindowSelector, DEFAULT_INDICATOR, DEFAULT_SNIPPET_LENGTH};
