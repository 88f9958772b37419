//! Embedded block detection for host documents.
//!
//! A host document may contain at most one embedded-language block: a YAML
//! block scalar introduced by a fixed key (for example `source: |`). This
//! module locates that block's line span using only indentation rules, so it
//! needs no YAML parser and tolerates otherwise malformed host documents.

use std::sync::LazyLock;

use regex::Regex;

/// The contiguous line span of an embedded-language block, excluding the
/// introducer line itself.
///
/// Lines are 0-based and the span is inclusive on both ends. A document has
/// zero or one region; regions are created fresh on every recomputation and
/// never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedRegion {
    /// First line of the block content.
    pub start_line: u32,
    /// Last line of the block content, `>= start_line`.
    pub end_line: u32,
}

impl EmbeddedRegion {
    /// Whether the given 0-based line falls within the block.
    pub fn contains_line(&self, line: u32) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Matches a block-scalar introducer line: optional indentation, a key, a
/// colon, a block-scalar indicator with optional modifier, and nothing else.
/// The key is captured so the caller can require the configured one.
static BLOCK_INTRODUCER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([A-Za-z0-9_.$-]+):[ \t]*[|>][0-9+-]*[ \t]*$").unwrap());

/// Width of a line's leading whitespace, counting spaces and tabs.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Whether a line contains only whitespace.
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Detect the embedded block introduced by `key` in the host text.
///
/// Only the first introducer line with a matching key is honored; later ones
/// are ignored, which keeps the at-most-one-region invariant. Block content
/// is every following line indented at least two columns past the introducer.
/// Blank lines are provisionally included: they stay in the block when more
/// content follows or when the document ends, and fall out when a
/// less-indented line terminates the block.
pub fn detect_region(text: &str, key: &str) -> Option<EmbeddedRegion> {
    let lines: Vec<&str> = text.split('\n').collect();

    let (introducer_line, introducer_indent) = lines.iter().enumerate().find_map(|(i, line)| {
        let caps = BLOCK_INTRODUCER.captures(line)?;
        if caps.get(2).map(|m| m.as_str()) != Some(key) {
            return None;
        }
        Some((i, caps.get(1).map(|m| m.as_str().len()).unwrap_or(0)))
    })?;

    let content_indent = introducer_indent + 2;
    let start = introducer_line + 1;
    if start >= lines.len() {
        return None;
    }

    let mut end = None;
    let mut trailing_blank = None;
    let mut terminated = false;

    for (i, line) in lines.iter().enumerate().skip(start) {
        if is_blank(line) {
            trailing_blank = Some(i);
            continue;
        }
        if indent_width(line) < content_indent {
            terminated = true;
            break;
        }
        end = Some(i);
        trailing_blank = None;
    }

    // Blank lines at the very end of the document belong to the block; blank
    // lines followed by a less-indented sibling do not.
    let mut end = end?;
    if !terminated {
        if let Some(blank) = trailing_blank {
            end = blank;
        }
    }

    Some(EmbeddedRegion {
        start_line: start as u32,
        end_line: end as u32,
    })
}
