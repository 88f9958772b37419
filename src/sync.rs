//! Lifecycle synchronization between host documents and the embedded service.
//!
//! The service is stateful: it only accepts changes for documents it was
//! told exist. A host document may open with no embedded block and acquire
//! one later (the user typing the introducer key), so opens toward the
//! service are lazy — they fire on the first event at which a region is
//! actually present. The synchronizer owns all tracking state; there is no
//! module-level state anywhere in the crate.
//!
//! Per document identity, events are handled in the order the host delivers
//! them; the host serializes its own event stream, so no internal locking
//! beyond the shared maps is needed.

use std::sync::Arc;

use dashmap::DashSet;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionResponse, FormattingOptions, Hover, Position, TextEdit, Url,
};

use crate::analyzer::EmbeddedAnalyzer;
use crate::document::DocumentStore;
use crate::lsp;
use crate::settings::EmbedSettings;

/// Synchronizes the embedded service's view of host documents and routes
/// feature requests through the region gate.
pub struct EmbeddedSync {
    analyzer: Arc<dyn EmbeddedAnalyzer>,
    documents: DocumentStore,
    /// Host documents for which a synthetic open has been sent and accepted.
    opened: DashSet<Url>,
}

impl EmbeddedSync {
    pub fn new(analyzer: Arc<dyn EmbeddedAnalyzer>) -> Self {
        Self {
            analyzer,
            documents: DocumentStore::new(),
            opened: DashSet::new(),
        }
    }

    /// The per-document derived state owned by this synchronizer.
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Whether a synthetic open is currently outstanding for this document.
    pub fn is_open_on_service(&self, uri: &Url) -> bool {
        self.opened.contains(uri)
    }

    /// Host opened a document.
    pub async fn host_opened(&self, uri: Url, version: i32, text: String, settings: &EmbedSettings) {
        let entry = self
            .documents
            .update(uri.clone(), version, &settings.key, || text);
        if entry.region.is_some() {
            self.open_on_service(uri, version, entry.masked_text.clone(), settings)
                .await;
        }
    }

    /// Host changed a document.
    ///
    /// While opened on the service this emits a synthetic change carrying the
    /// full new masked text (masking can move every region boundary, so
    /// incremental edits are never expressible). While unopened, a region
    /// appearing now triggers the deferred synthetic open instead — the
    /// service must never receive a change for a document it was never told
    /// exists.
    pub async fn host_changed(
        &self,
        uri: Url,
        version: i32,
        text: String,
        settings: &EmbedSettings,
    ) {
        let entry = self
            .documents
            .update(uri.clone(), version, &settings.key, || text);

        if self.opened.contains(&uri) {
            if let Err(err) = self
                .analyzer
                .did_change(uri.clone(), version, entry.masked_text.clone())
                .await
            {
                eprintln!("[sync] didChange for {uri} failed: {err}");
            }
        } else if entry.region.is_some() {
            self.open_on_service(uri, version, entry.masked_text.clone(), settings)
                .await;
        }
    }

    /// Host closed a document.
    ///
    /// Forwards the close to the service only when a synthetic open was
    /// sent, then drops cache and membership unconditionally — even when the
    /// forwarded close fails, the host no longer has the document.
    pub async fn host_closed(&self, uri: Url) {
        if self.opened.remove(&uri).is_some() {
            if let Err(err) = self.analyzer.did_close(uri.clone()).await {
                eprintln!("[sync] didClose for {uri} failed: {err}");
            }
        }
        self.documents.remove(&uri);
    }

    /// Clear all tracking state. Invoked on server shutdown.
    pub fn teardown(&self) {
        self.documents.clear();
        self.opened.clear();
    }

    /// Format the embedded block of a host document.
    ///
    /// The request is gated on a cached region, forwarded to the service,
    /// and the whole-masked-document response is rewritten into a single
    /// host edit. The store is consulted again after the round trip: a
    /// response arriving after the host closed the document finds no entry
    /// and produces no edit.
    pub async fn format_document(
        &self,
        uri: Url,
        options: FormattingOptions,
    ) -> Result<Option<Vec<TextEdit>>> {
        if !lsp::request_allowed(true, self.documents.get(&uri).as_deref(), None) {
            return Ok(None);
        }

        let Some(edits) = self.analyzer.formatting(uri.clone(), options).await? else {
            return Ok(None);
        };

        let Some(entry) = self.documents.get(&uri) else {
            return Ok(None);
        };
        Ok(lsp::rewrite_formatting(edits, &entry).map(|edit| vec![edit]))
    }

    /// Forward a completion request when the position lies in the block.
    ///
    /// Positions and response coordinates pass through unchanged: masking
    /// preserves line/column geometry, so service coordinates are host
    /// coordinates.
    pub async fn completion_in_region(
        &self,
        uri: Url,
        position: Position,
    ) -> Result<Option<CompletionResponse>> {
        if !lsp::request_allowed(true, self.documents.get(&uri).as_deref(), Some(position)) {
            return Ok(None);
        }
        self.analyzer.completion(uri, position).await
    }

    /// Forward a hover request when the position lies in the block.
    pub async fn hover_in_region(&self, uri: Url, position: Position) -> Result<Option<Hover>> {
        if !lsp::request_allowed(true, self.documents.get(&uri).as_deref(), Some(position)) {
            return Ok(None);
        }
        self.analyzer.hover(uri, position).await
    }

    async fn open_on_service(
        &self,
        uri: Url,
        version: i32,
        masked_text: String,
        settings: &EmbedSettings,
    ) {
        match self
            .analyzer
            .did_open(
                uri.clone(),
                settings.language_id.clone(),
                version,
                masked_text,
            )
            .await
        {
            Ok(()) => {
                self.opened.insert(uri);
            }
            Err(err) => {
                // Leave the document unopened so the next event retries.
                eprintln!("[sync] didOpen for {uri} failed: {err}");
            }
        }
    }
}
