//! Codepoint offset helpers
//!
//! All span bounds in PII Fusion are codepoint (char) offsets into the original
//! text, never byte offsets. These helpers translate between the two.

/// Number of codepoints in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by codepoint range `[start, end)`
///
/// Returns `None` when the range is empty, reversed or out of bounds.
pub fn slice_chars(text: &str, start: usize, end: usize) -> Option<&str> {
    if start >= end {
        return None;
    }
    let offsets = CharOffsets::new(text);
    let byte_start = offsets.byte_offset(start)?;
    let byte_end = offsets.byte_offset(end)?;
    text.get(byte_start..byte_end)
}

/// First `n` codepoints of `text`
pub fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Last `n` codepoints of `text`
pub fn last_chars(text: &str, n: usize) -> &str {
    let len = char_len(text);
    if n >= len {
        return text;
    }
    match text.char_indices().nth(len - n) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Byte/char offset table for a single text
///
/// Regex engines report byte offsets; detectors use this table to convert them
/// into codepoint offsets before building candidates.
#[derive(Debug, Clone)]
pub struct CharOffsets {
    /// Byte offset of every char boundary, including the end of the text
    boundaries: Vec<usize>,
}

impl CharOffsets {
    /// Build the offset table for `text`
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of codepoints in the indexed text
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Codepoint offset of a byte offset lying on a char boundary
    pub fn char_offset(&self, byte_offset: usize) -> Option<usize> {
        self.boundaries.binary_search(&byte_offset).ok()
    }

    /// Byte offset of a codepoint offset
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.boundaries.get(char_offset).copied()
    }
}
