//! Error types for criteria compilation.

use thiserror::Error;

/// Result type for criteria operations.
pub type CriteriaResult<T> = Result<T, CriteriaError>;

/// Errors raised while compiling a criteria tree for a backend.
///
/// In-memory evaluation never fails with these; a missing field simply
/// does not satisfy the predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    /// The criteria references a field the subject type does not declare.
    #[error("field not found: {field}")]
    FieldNotFound {
        /// The attribute name as written in the criteria.
        field: String,
    },

    /// The field exists but declares no backend field name.
    #[error("field {field} has no backend mapping")]
    UnmappedField {
        /// The attribute name as written in the criteria.
        field: String,
    },

    /// The backend cannot express this kind of criteria node.
    #[error("unsupported criteria type: {kind}")]
    UnsupportedCriteriaType {
        /// The node kind (`attr`, `and`, `or`, `not`).
        kind: String,
    },
}

impl CriteriaError {
    /// Creates a field not found error.
    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
        }
    }

    /// Creates an unmapped field error.
    pub fn unmapped_field(field: impl Into<String>) -> Self {
        Self::UnmappedField {
            field: field.into(),
        }
    }

    /// Creates an unsupported criteria type error.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedCriteriaType { kind: kind.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            CriteriaError::field_not_found("Age").to_string(),
            "field not found: Age"
        );
        assert_eq!(
            CriteriaError::unmapped_field("Note").to_string(),
            "field Note has no backend mapping"
        );
        assert!(CriteriaError::unsupported("or").to_string().contains("or"));
    }
}
