//! Shared in-process document collection.

use crate::filter::{Doc, DocumentFilter};
use mirrordb_core::{CoreError, CoreResult, EntityId};
use parking_lot::RwLock;
use serde_json::Value as Json;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Key holding a document's identifier.
pub const ID_KEY: &str = "_id";

#[derive(Debug)]
struct CollectionState {
    name: String,
    exists: bool,
    documents: Vec<Doc>,
}

/// A named collection of JSON documents.
///
/// Clones share the same documents, the way several clients of one
/// database see the same collection. A collection comes into existence on
/// its first insert or on [`DocumentCollection::ensure_exists`].
#[derive(Clone)]
pub struct DocumentCollection {
    state: Arc<RwLock<CollectionState>>,
}

impl DocumentCollection {
    /// Creates a handle to a collection that does not exist yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(CollectionState {
                name: name.into(),
                exists: false,
                documents: Vec::new(),
            })),
        }
    }

    /// Creates an existing collection holding `documents`.
    ///
    /// # Errors
    ///
    /// Fails like [`DocumentCollection::insert_one`] on the first bad
    /// document.
    pub fn with_documents(name: impl Into<String>, documents: Vec<Doc>) -> CoreResult<Self> {
        let collection = Self::new(name);
        collection.ensure_exists();
        for doc in documents {
            collection.insert_one(doc)?;
        }
        Ok(collection)
    }

    /// Returns the collection name.
    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    /// Returns true once the collection has been created.
    pub fn exists(&self) -> bool {
        self.state.read().exists
    }

    /// Creates the collection if needed. Returns true if it was created.
    pub fn ensure_exists(&self) -> bool {
        let mut state = self.state.write();
        !std::mem::replace(&mut state.exists, true)
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    /// Returns true if the collection holds no documents.
    pub fn is_empty(&self) -> bool {
        self.state.read().documents.is_empty()
    }

    /// Returns a snapshot of every document, in insertion order.
    pub fn documents(&self) -> Vec<Doc> {
        self.state.read().documents.clone()
    }

    /// Inserts a document and returns its ID.
    ///
    /// A missing or empty `_id` is assigned a fresh one.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EntityAlreadyExists`] if the `_id` is taken
    /// - [`CoreError::Backend`] if `_id` is not a string
    pub fn insert_one(&self, mut doc: Doc) -> CoreResult<EntityId> {
        let id = match doc.get(ID_KEY) {
            None | Some(Json::Null) => None,
            Some(Json::String(s)) if s.is_empty() => None,
            Some(Json::String(s)) => Some(EntityId::new(s.as_str())),
            Some(other) => {
                return Err(CoreError::backend(format!(
                    "document {ID_KEY} must be a string, got {other}"
                )))
            }
        };

        let mut state = self.state.write();
        let id = match id {
            Some(id) => {
                if state.documents.iter().any(|d| doc_id(d) == Some(id.as_str())) {
                    return Err(CoreError::already_exists(id));
                }
                id
            }
            None => {
                let id = EntityId::new(Uuid::new_v4().simple().to_string());
                doc.insert(ID_KEY.to_string(), Json::String(id.to_string()));
                id
            }
        };

        state.exists = true;
        state.documents.push(doc);
        Ok(id)
    }

    /// Returns every document matching `filter`, in insertion order.
    pub fn find(&self, filter: &DocumentFilter) -> Vec<Doc> {
        self.state
            .read()
            .documents
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect()
    }

    /// Returns the first document matching `filter`.
    pub fn find_one(&self, filter: &DocumentFilter) -> Option<Doc> {
        self.state
            .read()
            .documents
            .iter()
            .find(|d| filter.matches(d))
            .cloned()
    }

    /// Sets the fields of `changes` on the first document matching
    /// `filter`; other fields are kept. Returns false if nothing matched.
    pub fn update_one(&self, filter: &DocumentFilter, changes: Doc) -> bool {
        let mut state = self.state.write();
        match state.documents.iter_mut().find(|d| filter.matches(d)) {
            Some(doc) => {
                doc.extend(changes);
                true
            }
            None => false,
        }
    }

    /// Removes the first document matching `filter`. Returns false if
    /// nothing matched.
    pub fn delete_one(&self, filter: &DocumentFilter) -> bool {
        let mut state = self.state.write();
        match state.documents.iter().position(|d| filter.matches(d)) {
            Some(pos) => {
                state.documents.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for DocumentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("DocumentCollection")
            .field("name", &state.name)
            .field("exists", &state.exists)
            .field("len", &state.documents.len())
            .finish()
    }
}

fn doc_id(doc: &Doc) -> Option<&str> {
    doc.get(ID_KEY).and_then(Json::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Json) -> Doc {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn insert_assigns_missing_id() {
        let c = DocumentCollection::new("things");
        assert!(!c.exists());

        let id = c.insert_one(doc(json!({"name": "a"}))).unwrap();
        assert!(!id.is_empty());
        assert!(c.exists());
        assert_eq!(
            c.find_one(&DocumentFilter::eq("_id", id.as_str()))
                .unwrap()["name"],
            "a"
        );
    }

    #[test]
    fn insert_keeps_given_id_and_rejects_duplicates() {
        let c = DocumentCollection::new("things");
        let id = c.insert_one(doc(json!({"_id": "k1"}))).unwrap();
        assert_eq!(id.as_str(), "k1");

        let err = c.insert_one(doc(json!({"_id": "k1"}))).unwrap_err();
        assert!(err.is_already_exists());
        assert!(c.insert_one(doc(json!({"_id": 5}))).is_err());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn clones_share_documents() {
        let a = DocumentCollection::new("things");
        let b = a.clone();
        a.insert_one(doc(json!({"n": 1}))).unwrap();
        assert_eq!(b.len(), 1);
        assert!(b.exists());
    }

    #[test]
    fn ensure_exists_reports_creation() {
        let c = DocumentCollection::new("things");
        assert!(c.ensure_exists());
        assert!(!c.ensure_exists());
        assert!(c.is_empty());
    }

    #[test]
    fn update_merges_fields() {
        let c = DocumentCollection::with_documents(
            "things",
            vec![doc(json!({"_id": "1", "a": 1, "b": 2}))],
        )
        .unwrap();

        assert!(c.update_one(&DocumentFilter::eq("_id", "1"), doc(json!({"b": 3, "c": 4}))));
        assert_eq!(c.documents()[0], doc(json!({"_id": "1", "a": 1, "b": 3, "c": 4})));
        assert!(!c.update_one(&DocumentFilter::eq("_id", "9"), doc(json!({"b": 0}))));
    }

    #[test]
    fn delete_removes_first_match() {
        let c = DocumentCollection::with_documents(
            "things",
            vec![
                doc(json!({"_id": "1", "k": "x"})),
                doc(json!({"_id": "2", "k": "x"})),
            ],
        )
        .unwrap();

        assert!(c.delete_one(&DocumentFilter::eq("k", "x")));
        assert_eq!(c.find(&DocumentFilter::all()).len(), 1);
        assert_eq!(c.documents()[0]["_id"], "2");
        assert!(!c.delete_one(&DocumentFilter::eq("k", "y")));
    }
}
