//! Field access capabilities.

use crate::value::Value;
use std::sync::Arc;

/// Named field access used by the in-memory evaluator.
///
/// Attribute names are exported-style identifiers: they start with an
/// ASCII capital letter (`Name`, `CreatedAt`). Implementors return `None`
/// for names they do not expose.
///
/// # Example
///
/// ```rust
/// use mirrordb_criteria::{Record, Value};
///
/// struct User {
///     name: String,
///     age: i64,
/// }
///
/// impl Record for User {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "Name" => Some(self.name.clone().into()),
///             "Age" => Some(self.age.into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the current value of the named field.
    fn field(&self, name: &str) -> Option<Value>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Arc<R> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

/// Declaration of one field and its backend-facing name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    tag: Option<String>,
}

impl FieldDescriptor {
    /// Declares a field carrying a backend tag.
    ///
    /// Tags may carry options after a comma (`"_id,omitempty"`); only the
    /// part before the first comma is the backend name.
    pub fn tagged(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: Some(tag.into()),
        }
    }

    /// Declares a field with no backend tag.
    pub fn untagged(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
        }
    }

    /// Returns the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw tag, options included.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Returns the backend field name, if the tag names one.
    pub fn backend_name(&self) -> Option<&str> {
        self.tag
            .as_deref()
            .and_then(|tag| tag.split(',').next())
            .filter(|name| !name.is_empty())
    }
}

/// Per-type declaration of how attribute names map onto backend fields.
///
/// Used by [`crate::compile`]; the in-memory evaluator does not need it.
pub trait FieldMapping {
    /// Describes the named attribute, or `None` if the type has no such
    /// field.
    fn describe_field(name: &str) -> Option<FieldDescriptor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_name_strips_options() {
        let field = FieldDescriptor::tagged("Id", "_id,omitempty");
        assert_eq!(field.backend_name(), Some("_id"));
        assert_eq!(field.tag(), Some("_id,omitempty"));
    }

    #[test]
    fn empty_tag_is_unmapped() {
        assert_eq!(FieldDescriptor::tagged("Note", "").backend_name(), None);
        assert_eq!(
            FieldDescriptor::tagged("Note", ",omitempty").backend_name(),
            None
        );
        assert_eq!(FieldDescriptor::untagged("Note").backend_name(), None);
    }

    struct Pair(i64);

    impl Record for Pair {
        fn field(&self, name: &str) -> Option<Value> {
            (name == "Left").then(|| Value::Integer(self.0))
        }
    }

    #[test]
    fn smart_pointers_forward() {
        let boxed: Box<dyn Record> = Box::new(Pair(7));
        assert_eq!(boxed.field("Left"), Some(Value::Integer(7)));

        let shared = Arc::new(Pair(8));
        assert_eq!(shared.field("Left"), Some(Value::Integer(8)));
        assert_eq!(shared.field("Right"), None);
    }
}
