//! Position-preserving masking of host documents.
//!
//! The embedded-language service must see only the block content, but every
//! coordinate it reports has to be valid in the host document without
//! translation. Masking blanks all lines outside the region while keeping
//! the line geometry intact, so a (line, column) position in the masked text
//! denotes the same construct at the same position in the host text.

use super::region::EmbeddedRegion;

/// Blank every line outside the region, keeping region lines verbatim.
///
/// The output always splits into the same number of lines as the input.
/// With no region, every line becomes empty.
pub fn mask_text(text: &str, region: Option<&EmbeddedRegion>) -> String {
    let masked: Vec<&str> = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| match region {
            Some(region) if region.contains_line(i as u32) => line,
            _ => "",
        })
        .collect();
    masked.join("\n")
}
