//! Persistence of the contact/interaction document.
//!
//! # Responsibility
//! - Define the key-value backend contract and its implementations.
//! - Hold the authoritative in-process copy of contacts and interactions.
//!
//! # Invariants
//! - The whole document lives under one namespace key and is rewritten on
//!   every mutation.
//! - No interaction outlives the contact it references.

mod history;
pub mod kv;
pub mod record_store;

pub use kv::{KeyValueStore, KvError, KvResult, MemoryKeyValueStore, SqliteKeyValueStore};
pub use record_store::{
    RecordStore, StoreDocument, StoreError, StoreResult, DEFAULT_NAMESPACE, DOCUMENT_VERSION,
};
