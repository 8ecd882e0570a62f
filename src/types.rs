use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Half-open byte range `[start, end)` into a document's content.
///
/// Serialized as a two element array so batches stay compact: `[4, 7]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when the range lies entirely inside `[start, end]`.
    pub fn within(&self, start: usize, end: usize) -> bool {
        self.start >= start && self.end <= end
    }
}

impl From<[usize; 2]> for MatchRange {
    fn from(pair: [usize; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<MatchRange> for [usize; 2] {
    fn from(range: MatchRange) -> Self {
        [range.start, range.end]
    }
}

/// Term to match ranges. A `BTreeMap` keeps term iteration sorted so map
/// ordering never leaks into scores.
pub type MatchLocations = BTreeMap<String, Vec<MatchRange>>;

/// A candidate document produced by the upstream matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub filename: String,
    pub location: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "matchlocations", alias = "match_locations")]
    pub match_locations: MatchLocations,
    #[serde(default)]
    pub bytes: usize,
    #[serde(default)]
    pub score: f64,
}

impl Document {
    pub fn new(
        location: impl Into<String>,
        content: impl Into<String>,
        match_locations: MatchLocations,
    ) -> Self {
        let mut doc = Self {
            filename: String::new(),
            location: location.into(),
            content: content.into(),
            match_locations,
            bytes: 0,
            score: 0.0,
        };
        doc.normalize();
        doc
    }

    /// Fill derived fields and sort every term's ranges by `(start, end)`.
    ///
    /// Called once when a document enters the pipeline; safe to repeat.
    pub fn normalize(&mut self) {
        if self.bytes == 0 {
            self.bytes = self.content.len();
        }

        if self.filename.is_empty() {
            self.filename = self
                .location
                .rsplit(|c: char| c == '/' || c == '\\')
                .next()
                .unwrap_or_default()
                .to_string();
        }

        for ranges in self.match_locations.values_mut() {
            ranges.sort_unstable();
        }
    }

    /// Total number of recorded ranges across all terms.
    pub fn match_count(&self) -> usize {
        self.match_locations.values().map(Vec::len).sum()
    }

    /// Reject ranges with `start > end`.
    pub fn validate(&self) -> crate::Result<()> {
        for (term, ranges) in &self.match_locations {
            if let Some(bad) = ranges.iter().find(|r| r.start > r.end) {
                return Err(crate::Error::InvalidMatchRange {
                    location: self.location.clone(),
                    term: term.clone(),
                    start: bad.start,
                    end: bad.end,
                });
            }
        }
        Ok(())
    }
}

/// An excerpt of a document chosen for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    /// Rendered text, indicators included.
    pub content: String,
    /// Absolute byte offset of the window start in the document.
    pub start_pos: usize,
    /// Absolute byte offset of the window end in the document.
    pub end_pos: usize,
    /// Byte length of the leading indicator inside `content`.
    pub lead: usize,
    pub score: f64,
    /// Window-local match ranges.
    pub highlights: Vec<MatchRange>,
}

impl Snippet {
    /// `start_pos == end_pos == 0` marks a snippet with nothing to highlight.
    pub fn is_sentinel(&self) -> bool {
        self.start_pos == 0 && self.end_pos == 0
    }
}

/// A ranked document with its selected snippets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub filename: String,
    pub location: String,
    pub score: f64,
    pub snippets: Vec<Snippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A full input batch as handed over by the matcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default)]
    pub total_files: usize,
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_range_json_pair() {
        let range = MatchRange::new(4, 7);
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "[4,7]");

        let back: MatchRange = serde_json::from_str("[19,22]").unwrap();
        assert_eq!(back, MatchRange::new(19, 22));
        assert!(back.within(19, 22));
        assert!(!back.within(20, 22));
    }

    #[test]
    fn test_document_normalize() {
        let mut ml = MatchLocations::new();
        ml.insert("b".to_string(), vec![MatchRange::new(9, 10), MatchRange::new(1, 2)]);
        ml.insert("a".to_string(), vec![MatchRange::new(5, 6)]);

        let doc = Document::new("src/lib/main.rs", "0123456789", ml);

        assert_eq!(doc.filename, "main.rs");
        assert_eq!(doc.bytes, 10);
        assert_eq!(doc.match_count(), 3);
        assert_eq!(doc.match_locations["b"][0], MatchRange::new(1, 2));
        assert_eq!(doc.match_locations.keys().next().unwrap(), "a");
    }

    #[test]
    fn test_document_validate() {
        let mut ml = MatchLocations::new();
        ml.insert("x".to_string(), vec![MatchRange::new(5, 2)]);
        let doc = Document::new("a.rs", "hello world", ml);

        match doc.validate() {
            Err(crate::Error::InvalidMatchRange { term, start, end, .. }) => {
                assert_eq!(term, "x");
                assert_eq!((start, end), (5, 2));
            }
            other => panic!("expected InvalidMatchRange, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_deserialize() {
        let json = r#"{
            "total_files": 3,
            "documents": [
                {
                    "location": "/src/a.rs",
                    "content": "fn main() {}",
                    "matchlocations": {"main": [[3, 7]]}
                }
            ]
        }"#;
        let batch: Batch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.total_files, 3);
        assert_eq!(batch.documents[0].match_locations["main"], vec![MatchRange::new(3, 7)]);
        assert_eq!(batch.documents[0].bytes, 0);
    }
}
