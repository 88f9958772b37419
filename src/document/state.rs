//! Document state management for the embedding middleware.

use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use super::mask::mask_text;
use super::region::{detect_region, EmbeddedRegion};
use super::text::LineIndex;

/// Derived state for a single host document at a specific version.
///
/// Entries are immutable once built and replaced wholesale whenever the host
/// document's version advances.
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    /// Document version from the client.
    pub version: i32,
    /// The embedded block's line span, if the document has one.
    pub region: Option<EmbeddedRegion>,
    /// Host text with everything outside the region blanked out.
    pub masked_text: String,
    /// Pre-computed line index over the original host text.
    pub line_index: LineIndex,
}

impl DocumentEntry {
    /// Build an entry by running region detection and masking on host text.
    pub fn compute(text: String, version: i32, key: &str) -> Self {
        let region = detect_region(&text, key);
        let masked_text = mask_text(&text, region.as_ref());
        let line_index = LineIndex::new(text);

        Self {
            version,
            region,
            masked_text,
            line_index,
        }
    }
}

/// Thread-safe, version-keyed memoization of per-document derived state.
#[derive(Debug, Default)]
pub struct DocumentStore {
    entries: DashMap<Url, Arc<DocumentEntry>>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Return the memoized entry for `(uri, version)`, recomputing it from
    /// freshly fetched text when the version advanced or no entry exists.
    ///
    /// Replacement is atomic at entry granularity; readers holding an old
    /// `Arc` keep a consistent snapshot.
    pub fn update(
        &self,
        uri: Url,
        version: i32,
        key: &str,
        text: impl FnOnce() -> String,
    ) -> Arc<DocumentEntry> {
        if let Some(existing) = self.entries.get(&uri) {
            if existing.version == version {
                return Arc::clone(&existing);
            }
        }

        let entry = Arc::new(DocumentEntry::compute(text(), version, key));
        self.entries.insert(uri, Arc::clone(&entry));
        entry
    }

    /// Get a document's cached entry without recomputing.
    pub fn get(&self, uri: &Url) -> Option<Arc<DocumentEntry>> {
        self.entries.get(uri).map(|r| Arc::clone(&r))
    }

    /// Drop a document's entry. Entries are never evicted by capacity or
    /// time; this is the only removal path besides `clear`.
    pub fn remove(&self, uri: &Url) {
        self.entries.remove(uri);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
