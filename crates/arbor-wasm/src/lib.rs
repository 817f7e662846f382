//! WASM bridge for Arbor: exposes the tree editor engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the text
//! area and the `<canvas>`; every input event calls `set_text` followed by
//! `render`, and canvas clicks go through `toggle_at`.

mod render2d;
mod storage;
mod svg;

use arbor_core::{FormatConfig, LayoutConfig, NodeId, ToggleOutcome, format_document};
use arbor_editor::{STARTER_DOCUMENT, SyncEngine, persist_text, restore_text};
use render2d::{CanvasTheme, MARGIN};
use storage::LocalStorage;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing canvas controller.
///
/// Holds the sync engine and the source store. All interaction from the
/// page goes through this struct.
#[wasm_bindgen]
pub struct ArborCanvas {
    engine: SyncEngine,
    store: Option<LocalStorage>,
    width: f64,
    height: f64,
    /// Dark mode flag: `false` is light (default), `true` is dark.
    dark_mode: bool,
}

#[wasm_bindgen]
impl ArborCanvas {
    /// Create a controller for a canvas of the given size, restoring the
    /// last saved source (or the starter document).
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        console_log_setup();

        let store = LocalStorage::open();
        if store.is_none() {
            log::warn!("localStorage unavailable; edits will not be saved");
        }
        let text = store
            .as_ref()
            .map_or_else(|| STARTER_DOCUMENT.to_string(), restore_text);

        Self {
            engine: SyncEngine::from_text(&text, LayoutConfig::default()),
            store,
            width,
            height,
            dark_mode: false,
        }
    }

    /// Replace the source text, re-parse, and save it.
    /// Returns `true` on success, `false` on parse error.
    pub fn set_text(&mut self, text: &str) -> bool {
        let ok = self.engine.set_text(text).is_ok();
        if let Some(store) = self.store.as_mut() {
            persist_text(store, text);
        }
        ok
    }

    pub fn get_text(&self) -> String {
        self.engine.text().to_string()
    }

    /// The current parse error, if any.
    pub fn error_message(&self) -> Option<String> {
        self.engine.error().map(ToString::to_string)
    }

    /// Clear the canvas and draw the diagram, or the error message.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        render2d::render_draw_list(
            ctx,
            self.engine.draw_list(),
            self.width,
            self.height,
            &CanvasTheme::for_mode(self.dark_mode),
        );
    }

    /// Toggle a node by id. Returns `true` if the diagram changed.
    pub fn toggle(&mut self, node_id: &str) -> bool {
        let Some(id) = NodeId::lookup(node_id) else {
            return false;
        };
        self.engine.toggle_collapse(id).changed()
    }

    /// Toggle the node under the canvas point (x, y).
    /// Returns the toggled id, or an empty string when nothing changed.
    pub fn toggle_at(&mut self, x: f64, y: f64) -> String {
        match self.engine.toggle_at(x - MARGIN, y - MARGIN) {
            Some((id, outcome)) if outcome.changed() => id.as_str().to_string(),
            Some((id, ToggleOutcome::NoChildren)) => {
                log::debug!("#{id} has no children to collapse");
                String::new()
            }
            _ => String::new(),
        }
    }

    /// Ids currently collapsed, as a sorted JSON array.
    pub fn collapsed_json(&self) -> String {
        serde_json::to_string(&self.engine.collapsed().sorted()).unwrap_or_else(|_| "[]".into())
    }

    /// Export the current frame as an SVG document.
    pub fn export_svg(&self) -> String {
        svg::render_svg(
            self.engine.draw_list(),
            &CanvasTheme::for_mode(self.dark_mode),
        )
    }

    /// The current draw list as JSON, for custom renderers.
    pub fn draw_list_json(&self) -> String {
        serde_json::to_string(self.engine.draw_list()).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("Serialization error: {e}") }).to_string()
        })
    }

    /// Set the canvas theme.
    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    /// Resize the canvas.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

// ─── Console plumbing ────────────────────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Arbor WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from(format!("[arbor] {}", record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

fn console_log_setup() {
    if log::set_logger(&CONSOLE_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Validate Arbor source text. Returns JSON: `{"ok":true}` or
/// `{"ok":false,"line":N,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(source: &str) -> String {
    match arbor_core::parse_document(source) {
        Ok(_) => serde_json::json!({ "ok": true }).to_string(),
        Err(e) => serde_json::json!({
            "ok": false,
            "line": e.line(),
            "error": e.to_string(),
        })
        .to_string(),
    }
}

/// Format Arbor source text. Returns the input unchanged when it does not
/// parse.
#[wasm_bindgen]
pub fn format_source(source: &str) -> String {
    format_document(source, &FormatConfig::default()).unwrap_or_else(|_| source.to_string())
}
