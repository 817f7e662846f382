//! Arbor Language Server: diagnostics, completions, hover, symbols and formatting.
//!
//! A `tower-lsp` based LSP server that wraps `arbor-core` for real-time
//! editor feedback in any LSP-compatible editor (Zed, Neovim, Helix, etc.).

mod completion;
mod diagnostics;
mod hover;
mod symbols;
mod text;

use arbor_core::{FormatConfig, TreeModel, format_document, parse_document};
use ropey::Rope;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Mutex;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

/// Cached state for a single open document.
struct DocumentState {
    rope: Rope,
    /// Last model that parsed; kept while the text has errors so hover and
    /// completion keep working mid-edit.
    model: Option<TreeModel>,
}

/// The Arbor language server backend.
struct ArborLanguageServer {
    client: Client,
    /// Cached document state by URI.
    documents: Mutex<HashMap<Url, DocumentState>>,
}

impl ArborLanguageServer {
    fn new(client: Client) -> Self {
        Self {
            client,
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Reparse a document and publish diagnostics.
    async fn on_change(&self, uri: Url, text: String) {
        let parsed = parse_document(&text);
        let diags = diagnostics::compute_diagnostics(&text, &parsed);
        log::debug!("{uri}: {} diagnostics", diags.len());

        if let Ok(mut docs) = self.documents.lock() {
            let previous = docs.remove(&uri).and_then(|d| d.model);
            docs.insert(
                uri.clone(),
                DocumentState {
                    rope: Rope::from_str(&text),
                    model: parsed.ok().or(previous),
                },
            );
        }

        self.client.publish_diagnostics(uri, diags, None).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for ArborLanguageServer {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![" ".to_string(), ">".to_string()]),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                document_formatting_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "arbor-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "arbor-lsp initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        self.on_change(uri, text).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(change) = params.content_changes.into_iter().next_back() {
            self.on_change(uri, change.text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Ok(mut docs) = self.documents.lock() {
            docs.remove(&uri);
        }
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;

        let Ok(docs) = self.documents.lock() else {
            return Ok(None);
        };
        let items = docs
            .get(uri)
            .and_then(|doc| {
                let (line, col) = text::line_at(&doc.rope, pos)?;
                let before: String = line.chars().take(col).collect();
                Some(completion::compute_completions(&before, doc.model.as_ref()))
            })
            .unwrap_or_default();

        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;

        let Ok(docs) = self.documents.lock() else {
            return Ok(None);
        };
        Ok(docs
            .get(uri)
            .and_then(|doc| hover::compute_hover(&doc.rope, pos, doc.model.as_ref())))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = &params.text_document.uri;

        let Ok(docs) = self.documents.lock() else {
            return Ok(None);
        };
        let symbols = docs
            .get(uri)
            .and_then(|doc| {
                let model = doc.model.as_ref()?;
                Some(symbols::compute_symbols(&doc.rope.to_string(), model))
            })
            .unwrap_or_default();
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let uri = &params.text_document.uri;

        let Ok(docs) = self.documents.lock() else {
            return Ok(None);
        };
        let Some(doc) = docs.get(uri) else {
            return Ok(None);
        };
        let source = doc.rope.to_string();
        // Documents with errors are left alone; diagnostics already say why.
        let Ok(formatted) = format_document(&source, &FormatConfig::default()) else {
            return Ok(None);
        };
        if formatted == source {
            return Ok(Some(Vec::new()));
        }
        let end_line = doc.rope.len_lines() as u32;
        Ok(Some(vec![TextEdit {
            range: Range {
                start: Position::new(0, 0),
                end: Position::new(end_line, 0),
            },
            new_text: formatted,
        }]))
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    // ── `arbor-lsp --format` mode ────────────────────────────────────────
    // Reads Arbor source from stdin, writes formatted output on stdout,
    // then exits. `--tree-order` also reorders node declarations.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("--format") {
        let mut text = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut text) {
            eprintln!("arbor-lsp --format error: failed to read stdin: {e}");
            std::process::exit(1);
        }

        let config = FormatConfig {
            tree_order: args.iter().any(|a| a == "--tree-order"),
            ..FormatConfig::default()
        };
        match format_document(&text, &config) {
            Ok(formatted) => print!("{formatted}"),
            Err(e) => {
                eprintln!("arbor-lsp --format error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    // ── Standard LSP server mode ─────────────────────────────────────────
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(ArborLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
