//! Source persistence.
//!
//! The editor saves its raw text under one fixed key in a string store
//! (`localStorage` in the browser, `MemoryStore` in tests and native
//! hosts). Saving is best effort: a failed save is logged and the editor
//! carries on.

use std::collections::HashMap;
use thiserror::Error;

/// Key the source text is stored under.
pub const SOURCE_KEY: &str = "arbor.source";

/// Shown when nothing has been saved yet.
pub const STARTER_DOCUMENT: &str = r#"node root "Company"
node eng "Engineering"
node ops "Operations"
node web "Web"
node api "API"

edge root -> eng
edge root -> ops
edge eng -> web
edge eng -> api
"#;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage quota exceeded writing `{key}` ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable string store.
pub trait TextStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory `TextStore` with an optional byte capacity across all values.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once its values would exceed `bytes`.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: Some(bytes),
        }
    }

    fn used_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl TextStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(capacity) = self.capacity {
            let available = capacity.saturating_sub(self.used_excluding(key));
            if value.len() > available {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    available,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Save `text` under `SOURCE_KEY`. Failures are logged, never returned;
/// the result only says whether the write landed.
pub fn persist_text<S: TextStore + ?Sized>(store: &mut S, text: &str) -> bool {
    match store.save(SOURCE_KEY, text) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("could not save source: {err}");
            false
        }
    }
}

/// Load the saved source, or the starter document when there is none or the
/// store cannot be read.
pub fn restore_text<S: TextStore + ?Sized>(store: &S) -> String {
    match store.load(SOURCE_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => STARTER_DOCUMENT.to_string(),
        Err(err) => {
            log::warn!("could not load source: {err}");
            STARTER_DOCUMENT.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn restore_falls_back_to_starter() {
        let store = MemoryStore::new();
        assert_eq!(restore_text(&store), STARTER_DOCUMENT);
    }

    #[test]
    fn persist_then_restore() {
        let mut store = MemoryStore::new();
        assert!(persist_text(&mut store, "node a"));
        assert_eq!(restore_text(&store), "node a");
        assert_eq!(store.load(SOURCE_KEY).unwrap().as_deref(), Some("node a"));
    }

    #[test]
    fn quota_errors_are_swallowed() {
        let mut store = MemoryStore::with_capacity(8);
        assert!(persist_text(&mut store, "node a"));
        assert!(!persist_text(&mut store, "node a\nnode b"));
        // The earlier save is still there.
        assert_eq!(restore_text(&store), "node a");
    }

    #[test]
    fn quota_counts_other_keys() {
        let mut store = MemoryStore::with_capacity(10);
        store.save("other", "123456").unwrap();
        let err = store.save(SOURCE_KEY, "node a").unwrap_err();
        assert_eq!(
            err,
            StoreError::QuotaExceeded {
                key: SOURCE_KEY.to_string(),
                needed: 6,
                available: 4,
            }
        );
    }

    #[test]
    fn starter_document_parses() {
        let model = arbor_core::parse_document(STARTER_DOCUMENT).unwrap();
        assert_eq!(model.root_id().as_str(), "root");
    }

    struct Broken;

    impl TextStore for Broken {
        fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }
    }

    #[test]
    fn broken_store_never_interrupts() {
        let mut store = Broken;
        assert!(!persist_text(&mut store, "node a"));
        assert_eq!(restore_text(&store), STARTER_DOCUMENT);
    }
}
