//! File-backed document store.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//!   <collection>/
//!     <s1>/
//!       <s2>/
//!         <id>/
//!           document.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the record id.

use super::{already_exists, not_found, DocumentStore};
use crate::constants::DOCUMENT_FILENAME;
use crate::validation::validate_collection_name;
use crate::{CoreError, CoreResult};
use cdx_uuid::RecordId;
use parking_lot::Mutex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each document as pretty-printed JSON in a sharded directory tree.
#[derive(Debug)]
pub struct FileDocumentStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Storage` if the root directory cannot be created.
    pub fn open(root: &Path) -> CoreResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> CoreResult<PathBuf> {
        validate_collection_name(collection)?;
        Ok(self.root.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> CoreResult<PathBuf> {
        let record_id = RecordId::parse(id)?;
        Ok(record_id
            .sharded_dir(&self.collection_dir(collection)?)
            .join(DOCUMENT_FILENAME))
    }

    fn write_document(path: &Path, doc: &Value) -> CoreResult<()> {
        let dir = path
            .parent()
            .ok_or_else(|| CoreError::Internal("document path has no parent".into()))?;
        fs::create_dir_all(dir)?;

        let tmp = dir.join(format!(".{DOCUMENT_FILENAME}.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl DocumentStore for FileDocumentStore {
    fn insert(&self, collection: &str, id: &str, doc: &Value) -> CoreResult<()> {
        let path = self.document_path(collection, id)?;
        let _guard = self.write_lock.lock();
        if path.exists() {
            return Err(already_exists(collection, id));
        }
        Self::write_document(&path, doc)
    }

    fn replace(&self, collection: &str, id: &str, doc: &Value) -> CoreResult<()> {
        let path = self.document_path(collection, id)?;
        let _guard = self.write_lock.lock();
        if !path.is_file() {
            return Err(not_found(collection, id));
        }
        Self::write_document(&path, doc)
    }

    fn get(&self, collection: &str, id: &str) -> CoreResult<Option<Value>> {
        // Ids that can't exist on disk simply aren't found.
        if !RecordId::is_canonical(id) {
            return Ok(None);
        }
        let path = self.document_path(collection, id)?;
        if !path.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn delete(&self, collection: &str, id: &str) -> CoreResult<bool> {
        if !RecordId::is_canonical(id) {
            return Ok(false);
        }
        let path = self.document_path(collection, id)?;
        let _guard = self.write_lock.lock();
        let Some(dir) = path.parent().filter(|_| path.is_file()) else {
            return Ok(false);
        };
        fs::remove_dir_all(dir)?;
        Ok(true)
    }

    fn list(&self, collection: &str) -> CoreResult<Vec<Value>> {
        let base = self.collection_dir(collection)?;
        let mut docs = Vec::new();

        let s1_iter = match fs::read_dir(&base) {
            Ok(it) => it,
            Err(_) => return Ok(docs),
        };

        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for id_ent in id_iter.flatten() {
                    let doc_path = id_ent.path().join(DOCUMENT_FILENAME);
                    if !doc_path.is_file() {
                        continue;
                    }

                    match fs::read_to_string(&doc_path)
                        .map_err(CoreError::from)
                        .and_then(|raw| serde_json::from_str(&raw).map_err(CoreError::from))
                    {
                        Ok(doc) => docs.push(doc),
                        Err(e) => {
                            tracing::warn!(
                                "failed to read document: {} - {}",
                                doc_path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const ID: &str = "550e8400e29b41d4a716446655440000";

    fn test_store() -> (TempDir, FileDocumentStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileDocumentStore::open(temp_dir.path()).expect("store should open");
        (temp_dir, store)
    }

    #[test]
    fn test_insert_writes_sharded_document() {
        let (temp_dir, store) = test_store();
        store
            .insert("allergies", ID, &json!({"id": ID, "allergen": "peanut"}))
            .expect("insert should succeed");

        let expected = temp_dir
            .path()
            .join("allergies/55/0e")
            .join(ID)
            .join(DOCUMENT_FILENAME);
        assert!(expected.is_file(), "document.json should exist");

        let doc = store.get("allergies", ID).unwrap().expect("document present");
        assert_eq!(doc["allergen"], "peanut");
    }

    #[test]
    fn test_insert_rejects_non_canonical_id() {
        let (_temp_dir, store) = test_store();
        let err = store.insert("allergies", "../../etc", &json!({})).unwrap_err();
        assert!(matches!(err, CoreError::NotAcceptable(_)));
    }

    #[test]
    fn test_insert_rejects_unsafe_collection_name() {
        let (_temp_dir, store) = test_store();
        let err = store.insert("../escape", ID, &json!({})).unwrap_err();
        assert!(matches!(err, CoreError::NotAcceptable(_)));
    }

    #[test]
    fn test_insert_twice_is_rejected() {
        let (_temp_dir, store) = test_store();
        store.insert("c", ID, &json!({})).unwrap();
        let err = store.insert("c", ID, &json!({})).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists(_)));
    }

    #[test]
    fn test_replace_and_delete() {
        let (_temp_dir, store) = test_store();
        assert!(matches!(
            store.replace("c", ID, &json!({})).unwrap_err(),
            CoreError::NotFound(_)
        ));

        store.insert("c", ID, &json!({"v": 1})).unwrap();
        store.replace("c", ID, &json!({"v": 2})).unwrap();
        assert_eq!(store.get("c", ID).unwrap(), Some(json!({"v": 2})));

        assert!(store.delete("c", ID).unwrap());
        assert!(!store.delete("c", ID).unwrap());
        assert_eq!(store.get("c", ID).unwrap(), None);
    }

    #[test]
    fn test_get_with_foreign_id_is_none() {
        let (_temp_dir, store) = test_store();
        assert_eq!(store.get("c", "not-an-id").unwrap(), None);
    }

    #[test]
    fn test_list_returns_empty_for_missing_collection() {
        let (_temp_dir, store) = test_store();
        assert!(store.list("nothing_here").unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_invalid_documents() {
        let (temp_dir, store) = test_store();
        store.insert("c", ID, &json!({"ok": true})).unwrap();

        let broken = RecordId::new().sharded_dir(&temp_dir.path().join("c"));
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(DOCUMENT_FILENAME), "{ not json").unwrap();

        let docs = store.list("c").unwrap();
        assert_eq!(docs.len(), 1, "invalid document should be skipped");
        assert_eq!(docs[0]["ok"], true);
    }
}
