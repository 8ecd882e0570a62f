use crate::{Document, MatchRange};

/// Translate every match range fully inside `[start, end]` into window-local
/// coordinates. Ranges that straddle a boundary or lie outside are dropped.
pub fn remap_highlights(document: &Document, start: usize, end: usize) -> Vec<MatchRange> {
    let mut local: Vec<MatchRange> = document
        .match_locations
        .values()
        .flatten()
        .filter(|range| range.start <= range.end && range.within(start, end))
        .map(|range| MatchRange::new(range.start - start, range.end - start))
        .collect();

    local.sort_unstable();
    local.dedup();
    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchLocations;

    #[test]
    fn test_remap_keeps_only_contained_ranges() {
        let mut ml = MatchLocations::new();
        ml.insert("a".to_string(), vec![MatchRange::new(2, 5), MatchRange::new(8, 12)]);
        ml.insert("b".to_string(), vec![MatchRange::new(10, 20), MatchRange::new(16, 18)]);
        let doc = Document::new("f.txt", "0123456789abcdefghij", ml);

        let local = remap_highlights(&doc, 3, 15);

        assert_eq!(local, vec![MatchRange::new(5, 9)]);
    }

    #[test]
    fn test_remap_boundaries_are_inclusive() {
        let mut ml = MatchLocations::new();
        ml.insert("cat".to_string(), vec![MatchRange::new(4, 7)]);
        ml.insert("mat".to_string(), vec![MatchRange::new(19, 22)]);
        let doc = Document::new("f.txt", "the cat sat on the mat", ml);

        assert_eq!(remap_highlights(&doc, 4, 7), vec![MatchRange::new(0, 3)]);
        assert_eq!(
            remap_highlights(&doc, 0, 22),
            vec![MatchRange::new(4, 7), MatchRange::new(19, 22)]
        );
        assert!(remap_highlights(&doc, 5, 21).is_empty());
    }
}
