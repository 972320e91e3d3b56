//! Document storage.
//!
//! Documents are `serde_json::Value`s keyed by `(collection, id)`. Typed access lives in
//! [`crate::repository`]; this layer only moves JSON in and out of a backend.

mod file;
mod memory;

pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;

use crate::config::{CoreConfig, StorageBackend};
use crate::CoreResult;
use serde_json::Value;
use std::sync::Arc;

/// A keyed JSON document backend.
pub trait DocumentStore: Send + Sync {
    /// Stores a new document.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::AlreadyExists` if `(collection, id)` is already present.
    fn insert(&self, collection: &str, id: &str, doc: &Value) -> CoreResult<()>;

    /// Replaces an existing document wholesale.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if `(collection, id)` is absent.
    fn replace(&self, collection: &str, id: &str, doc: &Value) -> CoreResult<()>;

    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Value>>;

    /// Removes a document, returning whether anything was removed.
    fn delete(&self, collection: &str, id: &str) -> CoreResult<bool>;

    /// Returns every document in a collection, in no particular order.
    fn list(&self, collection: &str) -> CoreResult<Vec<Value>>;
}

/// Opens the backend selected by `cfg`.
pub fn open_store(cfg: &CoreConfig) -> CoreResult<Arc<dyn DocumentStore>> {
    match cfg.storage() {
        StorageBackend::Memory => Ok(Arc::new(MemoryDocumentStore::new())),
        StorageBackend::File => Ok(Arc::new(FileDocumentStore::open(cfg.data_dir())?)),
    }
}

fn not_found(collection: &str, id: &str) -> crate::CoreError {
    crate::CoreError::NotFound(format!("{collection} {id} not found"))
}

fn already_exists(collection: &str, id: &str) -> crate::CoreError {
    crate::CoreError::AlreadyExists(format!("{collection} {id} already exists"))
}
