//! Text utilities for per-line queries over host documents.
//!
//! LSP positions are line/column pairs where the column counts UTF-16 code
//! units. This module pre-computes line start offsets so that line text and
//! end-of-line columns can be answered without rescanning the document.

/// Pre-computed line index over retained source text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
    /// Source text (needed for line slicing and UTF-16 length calculation).
    source: String,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];

        for (i, c) in source.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }

        Self {
            line_starts,
            source,
        }
    }

    /// Get the source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of lines in the document.
    ///
    /// Text ending in a newline has a final empty line, matching the line
    /// model editors use for cursor placement past the last newline.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the text of a line without its trailing newline.
    ///
    /// Returns None if the line index is out of bounds.
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.source.len());
        Some(&self.source[start..end])
    }

    /// Length of a line in UTF-16 code units, excluding the newline.
    ///
    /// This is the end-of-line column in LSP coordinates. Out-of-bounds
    /// lines report zero.
    pub fn line_len_utf16(&self, line: usize) -> u32 {
        self.line(line)
            .map(|text| text.chars().map(|c| c.len_utf16() as u32).sum())
            .unwrap_or(0)
    }
}
