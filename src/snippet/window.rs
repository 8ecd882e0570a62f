//! Frequency weighted sliding window snippet selection.
//!
//! Every match is tried as the anchor of a window. The window grows outward
//! over neighbouring matches within half the target length, gets padded out
//! to roughly the target length and nudged onto whitespace. Windows score
//! higher when they capture more matches and when the anchor term is rare
//! in the current result batch.

use super::{remap_highlights, SnippetExtractor};
use crate::ranking::DocumentFrequencyIndex;
use crate::text::{char_safe_range, char_safe_slice, find_nearby_space, Probe};
use crate::{Document, Result, Snippet};

pub const DEFAULT_SNIPPET_LENGTH: usize = 300;
pub const DEFAULT_INDICATOR: &str = "…";

/// How far a window boundary may move to land on whitespace.
const SPACE_SEARCH_DISTANCE: usize = 10;

#[derive(Debug, Clone, Copy)]
struct Occurrence<'a> {
    term: &'a str,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: usize,
    end: usize,
    score: f64,
}

impl Window {
    fn overlaps(&self, other: &Window) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone)]
pub struct WindowSelector {
    length: usize,
    indicator: String,
}

impl Default for WindowSelector {
    fn default() -> Self {
        Self::new(DEFAULT_SNIPPET_LENGTH, DEFAULT_INDICATOR)
    }
}

impl WindowSelector {
    /// A zero length falls back to [`DEFAULT_SNIPPET_LENGTH`].
    pub fn new(length: usize, indicator: impl Into<String>) -> Self {
        Self {
            length: if length == 0 { DEFAULT_SNIPPET_LENGTH } else { length },
            indicator: indicator.into(),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    /// Flatten all term ranges into one list ordered by `(start, end, term)`,
    /// clamped to the content length.
    fn occurrences<'a>(&self, document: &'a Document) -> Vec<Occurrence<'a>> {
        let len = document.content.len();

        let mut occurrences: Vec<Occurrence<'a>> = document
            .match_locations
            .iter()
            .flat_map(|(term, ranges)| {
                ranges.iter().map(move |range| Occurrence {
                    term: term.as_str(),
                    start: range.start.min(len),
                    end: range.end.min(len),
                })
            })
            .collect();

        occurrences.sort_by(|a, b| (a.start, a.end, a.term).cmp(&(b.start, b.end, b.term)));
        occurrences
    }

    /// One candidate window per anchor, in anchor order.
    fn windows(
        &self,
        content: &str,
        occurrences: &[Occurrence<'_>],
        index: &DocumentFrequencyIndex,
    ) -> Vec<Window> {
        let len = content.len();
        let wrap = self.length / 2;

        occurrences
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                let mut start = anchor.start;
                let mut end = anchor.end;
                let mut members = 1usize;

                for candidate in occurrences[..i].iter().rev() {
                    if anchor.end.saturating_sub(candidate.start) > wrap {
                        break;
                    }
                    start = start.min(candidate.start);
                    end = end.max(candidate.end);
                    members += 1;
                }

                for candidate in &occurrences[i + 1..] {
                    if candidate.end.saturating_sub(anchor.start) > wrap {
                        break;
                    }
                    start = start.min(candidate.start);
                    end = end.max(candidate.end);
                    members += 1;
                }

                let (core_start, core_end) = (start, end);

                let width = end - start;
                if width < self.length {
                    let pad = (self.length - width) / 2;
                    start = start.saturating_sub(pad);
                    end = end.saturating_add(pad).min(len);
                }

                // Cosmetic only; never cuts into the matched core.
                if start > 0 {
                    let space =
                        find_nearby_space(content, start, SPACE_SEARCH_DISTANCE, Probe::LeftFirst);
                    if let Some(space) = space {
                        start = (space + 1).min(core_start);
                    }
                }
                if end < len {
                    let space =
                        find_nearby_space(content, end, SPACE_SEARCH_DISTANCE, Probe::RightFirst);
                    if let Some(space) = space {
                        end = space.max(core_end);
                    }
                }

                let score = (1 + members) as f64 / index.weight(anchor.term) as f64;

                Window { start, end, score }
            })
            .collect()
    }

    /// Leading bytes of a document that has nothing to highlight.
    fn sentinel(&self, content: &str) -> Snippet {
        let prefix = char_safe_slice(content, 0, self.length);
        let mut rendered = prefix.to_string();
        if prefix.len() < content.len() {
            rendered.push_str(&self.indicator);
        }

        Snippet {
            content: rendered,
            start_pos: 0,
            end_pos: 0,
            lead: 0,
            score: 0.0,
            highlights: Vec::new(),
        }
    }

    fn render(&self, document: &Document, window: &Window) -> Snippet {
        let content = document.content.as_str();
        let (start, end) = char_safe_range(content, window.start, window.end);

        let mut rendered = String::with_capacity(end - start + self.indicator.len() * 2);
        let mut lead = 0;
        if start > 0 {
            rendered.push_str(&self.indicator);
            lead = self.indicator.len();
        }
        rendered.push_str(&content[start..end]);
        if end < content.len() {
            rendered.push_str(&self.indicator);
        }

        Snippet {
            content: rendered,
            start_pos: start,
            end_pos: end,
            lead,
            score: window.score,
            highlights: remap_highlights(document, start, end),
        }
    }
}

impl SnippetExtractor for WindowSelector {
    fn extract(&self, document: &Document, index: &DocumentFrequencyIndex) -> Result<Vec<Snippet>> {
        document.validate()?;

        let content = document.content.as_str();
        let occurrences = self.occurrences(document);

        if occurrences.is_empty() {
            tracing::debug!("[SNIPPET] No matches in {}, using leading bytes", document.location);
            return Ok(vec![self.sentinel(content)]);
        }

        let windows = self.windows(content, &occurrences, index);
        let best_score = windows.iter().map(|w| w.score).fold(0.0, f64::max);

        if content.len() <= self.length {
            let whole = Window {
                start: 0,
                end: content.len(),
                score: best_score,
            };
            return Ok(vec![self.render(document, &whole)]);
        }

        // Stable sort: equal scores keep anchor order, so the first found wins.
        let mut ranked = windows;
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut chosen: Vec<Window> = Vec::new();
        for window in ranked {
            if chosen.iter().any(|c| c.overlaps(&window)) {
                continue;
            }
            chosen.push(window);
        }

        tracing::debug!(
            "[SNIPPET] {} windows from {} matches in {}",
            chosen.len(),
            occurrences.len(),
            document.location
        );

        Ok(chosen.iter().map(|w| self.render(document, w)).collect())
    }

    fn name(&self) -> &str {
        "window"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchLocations, MatchRange};

    fn document(content: &str, terms: &[(&str, Vec<(usize, usize)>)]) -> Document {
        let mut ml = MatchLocations::new();
        for (term, ranges) in terms {
            ml.insert(
                term.to_string(),
                ranges.iter().map(|&(s, e)| MatchRange::new(s, e)).collect(),
            );
        }
        Document::new("/test/doc.txt", content, ml)
    }

    #[test]
    fn test_cat_sat_on_the_mat() {
        let doc = document(
            "the cat sat on the mat",
            &[("cat", vec![(4, 7)]), ("mat", vec![(19, 22)])],
        );
        let index = DocumentFrequencyIndex::build(std::slice::from_ref(&doc));

        let snippets = WindowSelector::new(10, "…").extract(&doc, &index).unwrap();

        assert_eq!(snippets.len(), 2);

        // Equal scores: the earlier anchor wins.
        let best = &snippets[0];
        assert_eq!((best.start_pos, best.end_pos), (4, 11));
        assert_eq!(best.content, "…cat sat…");
        assert_eq!(best.lead, "…".len());
        assert_eq!(best.highlights, vec![MatchRange::new(0, 3)]);

        let second = &snippets[1];
        assert_eq!((second.start_pos, second.end_pos), (15, 22));
        assert_eq!(second.content, "…the mat");
        assert_eq!(second.highlights, vec![MatchRange::new(4, 7)]);
        assert_eq!(best.score, second.score);
    }

    #[test]
    fn test_clustered_matches_preferred() {
        let selector = WindowSelector::new(20, "…");

        let spread = document(
            "the cat sat on the rug and the mat was red",
            &[("cat", vec![(4, 7)]), ("mat", vec![(31, 34)])],
        );
        let index = DocumentFrequencyIndex::build(std::slice::from_ref(&spread));
        let spread_best = selector.extract(&spread, &index).unwrap().remove(0);

        let clustered = document(
            "the cat mat sat on the rug today",
            &[("cat", vec![(4, 7)]), ("mat", vec![(8, 11)])],
        );
        let index = DocumentFrequencyIndex::build(std::slice::from_ref(&clustered));
        let clustered_best = selector.extract(&clustered, &index).unwrap().remove(0);

        assert!(clustered_best.score > spread_best.score);
        assert_eq!(spread_best.highlights.len(), 1);
        assert_eq!(
            clustered_best.highlights,
            vec![MatchRange::new(4, 7), MatchRange::new(8, 11)]
        );
        assert_eq!((clustered_best.start_pos, clustered_best.end_pos), (0, 18));
        assert_eq!(clustered_best.content, "the cat mat sat on…");
    }

    #[test]
    fn test_dense_rare_cluster_beats_sparse_pair() {
        let filler = "lorem ipsum ".repeat(20);
        let content = format!("{filler}qux {filler}{filler}qux {filler}foo bar baz {filler}");
        let qux: Vec<(usize, usize)> =
            content.match_indices("qux").map(|(i, _)| (i, i + 3)).collect();
        let at = |word: &str| {
            let i = content.find(word).unwrap();
            (i, i + word.len())
        };
        let (foo, bar, baz) = (at("foo"), at("bar"), at("baz"));
        assert!(qux[1].0 - qux[0].1 > 200);

        let doc = document(
            &content,
            &[("qux", qux.clone()), ("foo", vec![foo]), ("bar", vec![bar]), ("baz", vec![baz])],
        );
        let noise = document(
            "qux qux qux qux",
            &[("qux", vec![(0, 3), (4, 7), (8, 11), (12, 15)])],
        );
        let index = DocumentFrequencyIndex::build(&[doc.clone(), noise]);
        assert!(index.get("qux") > index.get("foo"));

        let snippets = WindowSelector::new(60, "…").extract(&doc, &index).unwrap();
        let best = &snippets[0];

        assert!(best.start_pos <= foo.0);
        assert!(best.end_pos >= baz.1);
        assert_eq!(best.highlights.len(), 3);
        assert_eq!(snippets.len(), 3);
    }

    #[test]
    fn test_short_document_returned_whole() {
        let doc = document("short text", &[("short", vec![(0, 5)])]);
        let index = DocumentFrequencyIndex::build(std::slice::from_ref(&doc));

        let snippets = WindowSelector::new(100, "…").extract(&doc, &index).unwrap();

        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].content, "short text");
        assert_eq!((snippets[0].start_pos, snippets[0].end_pos), (0, 10));
        assert_eq!(snippets[0].lead, 0);
        assert_eq!(snippets[0].highlights, vec![MatchRange::new(0, 5)]);
    }

    #[test]
    fn test_no_matches_gives_sentinel() {
        let content = "a".repeat(50);
        let doc = document(&content, &[]);
        let index = DocumentFrequencyIndex::default();

        let snippets = WindowSelector::new(20, "...").extract(&doc, &index).unwrap();

        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].is_sentinel());
        assert_eq!(snippets[0].content, format!("{}...", "a".repeat(20)));
        assert!(snippets[0].highlights.is_empty());
    }

    #[test]
    fn test_window_aligned_to_char_boundaries() {
        let content = format!("{}needle{}", "é".repeat(50), "é".repeat(50));
        let doc = document(&content, &[("needle", vec![(100, 106)])]);
        let index = DocumentFrequencyIndex::build(std::slice::from_ref(&doc));

        let snippets = WindowSelector::new(12, "…").extract(&doc, &index).unwrap();
        let best = &snippets[0];

        assert_eq!((best.start_pos, best.end_pos), (96, 110));
        assert_eq!(best.content, "…ééneedleéé…");
        assert_eq!(best.highlights, vec![MatchRange::new(4, 10)]);
    }

    #[test]
    fn test_out_of_range_offsets_are_clamped() {
        let content = "word ".repeat(40);
        let doc = document(&content, &[("word", vec![(195, 900)])]);
        let index = DocumentFrequencyIndex::build(std::slice::from_ref(&doc));

        let snippets = WindowSelector::new(20, "…").extract(&doc, &index).unwrap();

        assert!(snippets[0].end_pos <= content.len());
        assert!(snippets[0].highlights.is_empty());
    }

    #[test]
    fn test_inverted_range_is_an_error() {
        let doc = document("some content here", &[("bad", vec![(9, 3)])]);
        let index = DocumentFrequencyIndex::default();

        assert!(WindowSelector::default().extract(&doc, &index).is_err());
    }

    #[test]
    fn test_zero_length_uses_default() {
        let selector = WindowSelector::new(0, "…");
        assert_eq!(selector.length(), DEFAULT_SNIPPET_LENGTH);
        assert_eq!(selector.indicator(), "…");
        assert_eq!(selector.name(), "window");
    }
}
