//! The protocol boundary to the embedded-language analysis service.
//!
//! The service runs out of process and only understands the embedded
//! language; this crate never parses embedded content itself. Implementations
//! of [`EmbeddedAnalyzer`] own the transport (stdio, socket, in-process) and
//! its error reporting; the middleware only sequences what flows through it.
//!
//! Document sync is whole-content only: masked text may differ from the host
//! text on every line where a region boundary moved, so incremental diffs
//! are never sent.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionResponse, FormattingOptions, Hover, Position, TextEdit, Url,
};

/// Client interface of the external embedded-language service.
#[tower_lsp::async_trait]
pub trait EmbeddedAnalyzer: Send + Sync {
    /// Announce a document to the service with its full (masked) content.
    async fn did_open(&self, uri: Url, language_id: String, version: i32, text: String)
        -> Result<()>;

    /// Replace the service's view of a document with full new content.
    async fn did_change(&self, uri: Url, version: i32, text: String) -> Result<()>;

    /// Tell the service a document no longer exists.
    async fn did_close(&self, uri: Url) -> Result<()>;

    /// Request whole-document formatting edits in the service's coordinates.
    async fn formatting(
        &self,
        uri: Url,
        options: FormattingOptions,
    ) -> Result<Option<Vec<TextEdit>>>;

    /// Request completions at a position.
    async fn completion(&self, uri: Url, position: Position) -> Result<Option<CompletionResponse>>;

    /// Request hover information at a position.
    async fn hover(&self, uri: Url, position: Position) -> Result<Option<Hover>>;
}
