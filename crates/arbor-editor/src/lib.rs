pub mod store;
pub mod sync;

pub use store::{MemoryStore, SOURCE_KEY, STARTER_DOCUMENT, StoreError, TextStore, persist_text, restore_text};
pub use sync::SyncEngine;
