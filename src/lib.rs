//! LSP middleware for an embedded-language block in YAML host documents.
//!
//! The server sits between an editor and an external embedded-language
//! analysis service. Host documents are masked down to their embedded block
//! with line/column geometry preserved, so the service's coordinates are
//! host coordinates; documents purely in the embedded language pass through
//! untouched. The transport to the real service is supplied by the embedder
//! as an [`EmbeddedAnalyzer`] implementation.

use std::sync::{Arc, OnceLock};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};

mod analyzer;
mod document;
mod lsp;
mod settings;
mod sync;

pub use analyzer::EmbeddedAnalyzer;
pub use document::{
    detect_region, mask_text, DocumentEntry, DocumentStore, EmbeddedRegion, LineIndex,
};
pub use lsp::{request_allowed, rewrite_formatting};
pub use settings::{discover_settings, load_settings, EmbedSettings, Settings};
pub use sync::EmbeddedSync;

pub struct Backend {
    client: Client,
    analyzer: Arc<dyn EmbeddedAnalyzer>,
    sync: EmbeddedSync,
    embed: OnceLock<EmbedSettings>,
}

impl Backend {
    pub(crate) fn new(client: Client, analyzer: Arc<dyn EmbeddedAnalyzer>) -> Self {
        Self {
            client,
            sync: EmbeddedSync::new(Arc::clone(&analyzer)),
            analyzer,
            embed: OnceLock::new(),
        }
    }

    fn embed(&self) -> &EmbedSettings {
        self.embed.get_or_init(EmbedSettings::default)
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract workspace root from params
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        if let Some(root) = workspace_root {
            // Discover settings by walking up the directory tree
            let (settings, _settings_dir) = settings::discover_settings(&root);
            let _ = self.embed.set(settings.embed_or_default());
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                document_formatting_provider: Some(OneOf::Left(true)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string()]),
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "embedded-language middleware initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.sync.teardown();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let embed = self.embed();

        if embed.is_host_document(&doc.uri) {
            self.sync
                .host_opened(doc.uri, doc.version, doc.text, embed)
                .await;
        } else {
            let uri = doc.uri.clone();
            if let Err(err) = self
                .analyzer
                .did_open(doc.uri, doc.language_id, doc.version, doc.text)
                .await
            {
                eprintln!("[server] didOpen passthrough for {uri} failed: {err}");
            }
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        let Some(change) = params.content_changes.into_iter().next() else {
            return;
        };
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let embed = self.embed();

        if embed.is_host_document(&uri) {
            self.sync.host_changed(uri, version, change.text, embed).await;
        } else {
            let log_uri = uri.clone();
            if let Err(err) = self.analyzer.did_change(uri, version, change.text).await {
                eprintln!("[server] didChange passthrough for {log_uri} failed: {err}");
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        if self.embed().is_host_document(&uri) {
            self.sync.host_closed(uri).await;
        } else {
            let log_uri = uri.clone();
            if let Err(err) = self.analyzer.did_close(uri).await {
                eprintln!("[server] didClose passthrough for {log_uri} failed: {err}");
            }
        }
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let uri = params.text_document.uri;

        if self.embed().is_host_document(&uri) {
            self.sync.format_document(uri, params.options).await
        } else {
            self.analyzer.formatting(uri, params.options).await
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        if self.embed().is_host_document(&uri) {
            self.sync.completion_in_region(uri, position).await
        } else {
            self.analyzer.completion(uri, position).await
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        if self.embed().is_host_document(&uri) {
            self.sync.hover_in_region(uri, position).await
        } else {
            self.analyzer.hover(uri, position).await
        }
    }
}

/// Build the middleware service around a concrete analyzer transport.
pub fn create_service(
    analyzer: Arc<dyn EmbeddedAnalyzer>,
) -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(move |client| Backend::new(client, analyzer))
}
