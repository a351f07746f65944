//! Schemaless document entity.

use crate::collection::ID_KEY;
use crate::filter::{to_value, Doc};
use mirrordb_core::{CoreResult, Entity, EntityId, FieldDescriptor, FieldMapping, Record, Value};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// An entity backed by an arbitrary JSON object.
///
/// Attribute names map to keys by lowercasing their first letter:
/// `Name` reads `name`, `CreatedAt` reads `createdAt`. `Id` is the
/// identifier, stored under `_id` even while empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Doc", into = "Doc")]
pub struct Document {
    id: EntityId,
    fields: Doc,
}

impl Document {
    /// Creates a document without an ID.
    pub fn new(fields: Doc) -> Self {
        Self::from(fields)
    }

    /// Returns the fields, `_id` excluded.
    pub fn fields(&self) -> &Doc {
        &self.fields
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.fields.get(key)
    }

    /// Sets `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Json>) {
        let key = key.into();
        if key == ID_KEY {
            return;
        }
        self.fields.insert(key, value.into());
    }
}

/// Returns the document key for an attribute name.
pub fn key_for(attribute: &str) -> String {
    if attribute == "Id" {
        return ID_KEY.to_string();
    }
    let mut chars = attribute.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<Doc> for Document {
    fn from(mut fields: Doc) -> Self {
        let id = match fields.remove(ID_KEY) {
            Some(Json::String(s)) => EntityId::new(s),
            _ => EntityId::empty(),
        };
        Self { id, fields }
    }
}

impl From<Document> for Doc {
    fn from(document: Document) -> Self {
        let mut doc = Doc::new();
        doc.insert(ID_KEY.to_string(), Json::String(document.id.into_string()));
        doc.extend(document.fields);
        doc
    }
}

impl Record for Document {
    fn field(&self, name: &str) -> Option<Value> {
        if name == "Id" {
            return Some(self.id.as_str().into());
        }
        self.fields.get(&key_for(name)).and_then(to_value)
    }
}

impl FieldMapping for Document {
    fn describe_field(name: &str) -> Option<FieldDescriptor> {
        if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
            return None;
        }
        Some(FieldDescriptor::tagged(name, key_for(name)))
    }
}

impl Entity for Document {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn set_id(&mut self, id: EntityId) -> CoreResult<()> {
        self.id = id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrordb_core::Criteria;
    use serde_json::json;

    fn document(value: Json) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn id_is_split_out() {
        let d = document(json!({"_id": "d1", "name": "ann"}));
        assert_eq!(d.id().as_str(), "d1");
        assert!(d.get("_id").is_none());
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({"_id": "d1", "name": "ann"})
        );

        let d = document(json!({"name": "ann"}));
        assert!(d.id().is_empty());
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({"_id": "", "name": "ann"})
        );
    }

    #[test]
    fn attribute_names_map_to_keys() {
        assert_eq!(key_for("Name"), "name");
        assert_eq!(key_for("CreatedAt"), "createdAt");
        assert_eq!(key_for("Id"), "_id");
        assert_eq!(
            Document::describe_field("Age").and_then(|d| d.backend_name().map(str::to_string)),
            Some("age".to_string())
        );
        assert!(Document::describe_field("age").is_none());
    }

    #[test]
    fn evaluates_criteria() {
        let d = document(json!({"_id": "d1", "name": "ann", "age": 30, "tags": ["x"]}));
        assert!(Criteria::eq("Name", "ann").is_satisfied_by(&d));
        assert!(Criteria::gt("Age", 18).is_satisfied_by(&d));
        assert!(Criteria::eq("Id", "d1").is_satisfied_by(&d));
        assert!(!Criteria::eq("Tags", "x").is_satisfied_by(&d));
        assert!(!Criteria::eq("Missing", 1).is_satisfied_by(&d));
    }

    #[test]
    fn insert_ignores_id_key() {
        let mut d = Document::default();
        d.insert("_id", "nope");
        d.insert("name", "ann");
        assert!(d.id().is_empty());
        assert_eq!(d.get("name"), Some(&json!("ann")));
    }
}
