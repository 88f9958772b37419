//! Re-indentation of formatting responses into host coordinates.
//!
//! The service formats the masked text as if it were a complete document, so
//! its response is expected to be a single edit spanning that whole document.
//! The transformer narrows the edit to the embedded block in host
//! coordinates and restores the block's indentation, which masking removed
//! from the service's view of the world.

use tower_lsp::lsp_types::{Position, Range, TextEdit};

use crate::document::DocumentEntry;

/// Rewrite a whole-masked-document formatting response into one host edit.
///
/// Returns None — no edit applied — when the response does not contain
/// exactly one edit, or when no region is cached. The former is a contract
/// edge case the service must satisfy; the latter should be unreachable
/// given the request gate and is logged as an invariant violation.
pub fn rewrite_formatting(mut edits: Vec<TextEdit>, entry: &DocumentEntry) -> Option<TextEdit> {
    if edits.len() != 1 {
        eprintln!(
            "[formatting] expected exactly one edit from the service, got {}",
            edits.len()
        );
        return None;
    }
    let edit = edits.pop()?;

    let Some(region) = entry.region.as_ref() else {
        eprintln!("[formatting] no embedded region cached at transform time, dropping edit");
        return None;
    };

    // The introducer line immediately precedes the block; its whitespace
    // prefix plus the two-column content increment is the block indentation.
    let introducer_line = region.start_line.checked_sub(1)?;
    let introducer = entry.line_index.line(introducer_line as usize).unwrap_or("");
    let base_indent: String = introducer
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();
    let block_indent = format!("{base_indent}  ");

    let new_text = edit
        .new_text
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{block_indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let range = Range::new(
        Position::new(region.start_line, 0),
        Position::new(
            region.end_line,
            entry.line_index.line_len_utf16(region.end_line as usize),
        ),
    );

    Some(TextEdit { range, new_text })
}
