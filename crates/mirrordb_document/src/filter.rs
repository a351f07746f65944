//! Native filter expressions of the document store.

use mirrordb_core::{Comparator, EntityId, Value};
use serde_json::{json, Map, Value as Json};

/// A document type: a JSON object keyed by field name.
pub type Doc = Map<String, Json>;

/// A filter over documents.
///
/// This is what criteria compile to. It renders to the familiar
/// operator syntax with [`DocumentFilter::to_json`]:
///
/// ```text
/// {"$and": [{"count": {"$gte": 3}}, {"$not": {"attr": {"$eq": "x"}}}]}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentFilter {
    /// Compares the value at `path` with `value`.
    Field {
        /// Top-level document key.
        path: String,
        /// Comparison operator.
        operator: Comparator,
        /// Operand.
        value: Json,
    },
    /// All operands match.
    And(Vec<DocumentFilter>),
    /// Any operand matches; an empty list matches everything.
    Or(Vec<DocumentFilter>),
    /// The operand does not match.
    Not(Box<DocumentFilter>),
}

impl DocumentFilter {
    /// Creates a field comparison.
    pub fn field(path: impl Into<String>, operator: Comparator, value: impl Into<Json>) -> Self {
        DocumentFilter::Field {
            path: path.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates an equality comparison.
    pub fn eq(path: impl Into<String>, value: impl Into<Json>) -> Self {
        Self::field(path, Comparator::Eq, value)
    }

    /// Matches every document.
    pub fn all() -> Self {
        DocumentFilter::And(Vec::new())
    }

    /// Builds the lookup for an entity ID.
    ///
    /// A compound ID matches each component against the field it names;
    /// a plain ID matches `_id`.
    pub fn id_selector(id: &EntityId) -> Self {
        match id.compound_ids() {
            Some(components) => DocumentFilter::And(
                components
                    .into_iter()
                    .map(|(key, component)| Self::eq(key, component.into_string()))
                    .collect(),
            ),
            None => Self::eq("_id", id.as_str()),
        }
    }

    /// Returns true if `doc` satisfies the filter.
    ///
    /// A missing field, or one holding an array or object, never matches.
    /// Numbers keep their kind: `1` and `1.0` are different values.
    pub fn matches(&self, doc: &Doc) -> bool {
        match self {
            DocumentFilter::Field {
                path,
                operator,
                value,
            } => match (doc.get(path).and_then(to_value), to_value(value)) {
                (Some(field), Some(operand)) => operator.apply(&field, &operand),
                _ => false,
            },
            DocumentFilter::And(operands) => operands.iter().all(|f| f.matches(doc)),
            DocumentFilter::Or(operands) => {
                operands.is_empty() || operands.iter().any(|f| f.matches(doc))
            }
            DocumentFilter::Not(operand) => !operand.matches(doc),
        }
    }

    /// Renders the filter in operator syntax.
    pub fn to_json(&self) -> Json {
        match self {
            DocumentFilter::Field {
                path,
                operator,
                value,
            } => {
                let mut condition = Map::new();
                condition.insert(format!("${}", operator.as_str()), value.clone());
                let mut field = Map::new();
                field.insert(path.clone(), Json::Object(condition));
                Json::Object(field)
            }
            DocumentFilter::And(operands) => {
                json!({ "$and": operands.iter().map(Self::to_json).collect::<Vec<_>>() })
            }
            DocumentFilter::Or(operands) => {
                json!({ "$or": operands.iter().map(Self::to_json).collect::<Vec<_>>() })
            }
            DocumentFilter::Not(operand) => json!({ "$not": operand.to_json() }),
        }
    }
}

/// Converts a stored JSON scalar to a criteria value.
pub(crate) fn to_value(json: &Json) -> Option<Value> {
    match json {
        Json::Null => Some(Value::Null),
        Json::Bool(b) => Some(Value::Bool(*b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) if !n.is_f64() => Some(Value::Integer(i)),
            _ => n.as_f64().map(Value::Float),
        },
        Json::String(s) => Some(Value::Text(s.clone())),
        Json::Array(_) | Json::Object(_) => None,
    }
}

/// Converts a criteria value to a JSON operand.
pub(crate) fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Integer(i) => Json::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s.clone()),
    }
}
