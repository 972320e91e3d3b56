use super::{already_exists, not_found, DocumentStore};
use crate::CoreResult;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// In-process document store.
///
/// Used for tests and for `CDX_STORAGE=memory` deployments.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert(&self, collection: &str, id: &str, doc: &Value) -> CoreResult<()> {
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Err(already_exists(collection, id));
        }
        docs.insert(id.to_string(), doc.clone());
        Ok(())
    }

    fn replace(&self, collection: &str, id: &str, doc: &Value) -> CoreResult<()> {
        let mut collections = self.collections.write();
        match collections.get_mut(collection).and_then(|docs| docs.get_mut(id)) {
            Some(existing) => {
                *existing = doc.clone();
                Ok(())
            }
            None => Err(not_found(collection, id)),
        }
    }

    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Value>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn delete(&self, collection: &str, id: &str) -> CoreResult<bool> {
        Ok(self
            .collections
            .write()
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    fn list(&self, collection: &str) -> CoreResult<Vec<Value>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }
}
