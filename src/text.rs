//! Byte offset helpers over UTF-8 text.
//!
//! Offsets everywhere else in the crate are plain byte offsets. These helpers
//! are the only place they are aligned to character boundaries, which happens
//! right before slicing.

/// Which side of a position to probe first when looking for whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    LeftFirst,
    RightFirst,
}

/// Largest char boundary `<= idx`, clamped to the string length.
pub fn floor_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary `>= idx`, clamped to the string length.
pub fn ceil_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Clamp and order a byte range, then widen it outward to char boundaries.
pub fn char_safe_range(s: &str, start: usize, end: usize) -> (usize, usize) {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    (floor_char_boundary(s, start), ceil_char_boundary(s, end))
}

/// Slice `s` by byte offsets without ever splitting a character.
pub fn char_safe_slice(s: &str, start: usize, end: usize) -> &str {
    let (start, end) = char_safe_range(s, start, end);
    &s[start..end]
}

/// Look up to `distance` bytes either side of `pos` for ASCII whitespace.
///
/// Returns the index of the whitespace byte, or `None` when there is none in
/// reach. ASCII whitespace is always a char boundary.
pub fn find_nearby_space(s: &str, pos: usize, distance: usize, probe: Probe) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let pos = pos.min(bytes.len());

    let left = || {
        let from = pos.min(bytes.len() - 1);
        let to = pos.saturating_sub(distance);
        (to..=from).rev().find(|&i| bytes[i].is_ascii_whitespace())
    };
    let right = || {
        let to = pos.saturating_add(distance).min(bytes.len());
        (pos..to).find(|&i| bytes[i].is_ascii_whitespace())
    };

    match probe {
        Probe::LeftFirst => left().or_else(right),
        Probe::RightFirst => right().or_else(left),
    }
}
