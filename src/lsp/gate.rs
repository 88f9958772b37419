//! Request gating for embedded-language features.
//!
//! Feature requests whose semantics are undefined outside the embedded block
//! (formatting, completion, hover) are suppressed rather than forwarded, so
//! that tooling responsible for the host format stays free to handle them.

use tower_lsp::lsp_types::Position;

use crate::document::DocumentEntry;

/// Decide whether a feature request should be forwarded to the service.
///
/// Documents that are purely in the embedded language (`is_host` false) are
/// always allowed. Host-format documents are allowed only when a region is
/// cached; position-carrying requests additionally require the position's
/// line to fall inside the region span.
pub fn request_allowed(
    is_host: bool,
    entry: Option<&DocumentEntry>,
    position: Option<Position>,
) -> bool {
    if !is_host {
        return true;
    }

    let Some(region) = entry.and_then(|entry| entry.region.as_ref()) else {
        return false;
    };

    match position {
        None => true,
        Some(position) => region.contains_line(position.line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentEntry;

    fn entry_with_region() -> DocumentEntry {
        DocumentEntry::compute("source: |\n  a\n  b\nother: y\n".to_string(), 1, "source")
    }

    fn entry_without_region() -> DocumentEntry {
        DocumentEntry::compute("name: x\n".to_string(), 1, "source")
    }

    #[test]
    fn non_host_documents_are_always_allowed() {
        assert!(request_allowed(false, None, None));
        assert!(request_allowed(false, None, Some(Position::new(99, 0))));
        let entry = entry_without_region();
        assert!(request_allowed(false, Some(&entry), Some(Position::new(0, 0))));
    }

    #[test]
    fn host_document_without_entry_is_denied() {
        assert!(!request_allowed(true, None, None));
    }

    #[test]
    fn host_document_without_region_is_denied() {
        let entry = entry_without_region();
        assert!(!request_allowed(true, Some(&entry), None));
        assert!(!request_allowed(true, Some(&entry), Some(Position::new(0, 0))));
    }

    #[test]
    fn document_scoped_request_needs_only_a_region() {
        let entry = entry_with_region();
        assert!(request_allowed(true, Some(&entry), None));
    }

    #[test]
    fn position_must_fall_inside_the_region() {
        let entry = entry_with_region();
        assert!(request_allowed(true, Some(&entry), Some(Position::new(1, 0))));
        assert!(request_allowed(true, Some(&entry), Some(Position::new(2, 4))));
        assert!(!request_allowed(true, Some(&entry), Some(Position::new(0, 0))));
        assert!(!request_allowed(true, Some(&entry), Some(Position::new(3, 0))));
    }
}
