//! Error types for MirrorDB core.

use crate::entity::EntityId;
use mirrordb_criteria::CriteriaError;
use std::fmt;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Lifecycle hook that ran before a persistence event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// [`crate::Entity::pre_create`].
    PreCreate,
    /// [`crate::Entity::pre_update`].
    PreUpdate,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::PreCreate => f.write_str("pre-create"),
            Hook::PreUpdate => f.write_str("pre-update"),
        }
    }
}

/// Errors that can occur in MirrorDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity not found.
    #[error("entity not found: {id}")]
    EntityNotFound {
        /// The ID that was looked up.
        id: EntityId,
    },

    /// An entity with the same ID is already stored.
    #[error("entity already exists: {id}")]
    EntityAlreadyExists {
        /// The conflicting ID.
        id: EntityId,
    },

    /// Criteria could not be compiled for the backend.
    #[error("criteria error: {0}")]
    Criteria(#[from] CriteriaError),

    /// A lifecycle hook rejected the entity.
    #[error("{hook} hook failed: {source}")]
    PreHookFailed {
        /// The hook that failed.
        hook: Hook,
        /// The hook's error.
        source: Box<CoreError>,
    },

    /// The admission policy refused the operation.
    #[error("policy rejected entity: {reason}")]
    PolicyRejected {
        /// Why the policy refused.
        reason: String,
    },

    /// A generated or backend-assigned ID could not be set on the entity.
    #[error("could not assign identifier {id}: {source}")]
    IdentifierAssignmentFailed {
        /// The ID that was being assigned.
        id: EntityId,
        /// The entity's error.
        source: Box<CoreError>,
    },

    /// The entity rejected an identifier value.
    #[error("invalid identifier: {message}")]
    InvalidIdentifier {
        /// Description of the problem.
        message: String,
    },

    /// The entity type has no resource identifier.
    #[error("resource id is not supported")]
    ResourceIdNotSupported,

    /// The store has no remote repository yet.
    #[error("store not loaded")]
    StoreNotLoaded,

    /// The store was already loaded; loading is one-time.
    #[error("entities already loaded")]
    StoreAlreadyLoaded,

    /// A create was attempted with an entity that already has an ID.
    #[error("entity already has an identifier: {id}")]
    EntityAlreadyHasIdentifier {
        /// The entity's existing ID.
        id: EntityId,
    },

    /// An observer returned an error.
    #[error("observer failed{}: {source}", topic_suffix(.topic))]
    ObserverFailed {
        /// The topic being delivered, if any.
        topic: Option<String>,
        /// The observer's error.
        source: Box<CoreError>,
    },

    /// Attach to a topic the notifier was not built with.
    #[error("topic {topic} not found")]
    UnknownTopic {
        /// The requested topic.
        topic: String,
    },

    /// The operation's context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The operation's context deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Backend adapter error.
    #[error("backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },

    /// Entity (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An error annotated with the operation and entity it happened on.
    #[error("could not {operation}{}: {source}", id_suffix(.id))]
    Context {
        /// The operation that failed.
        operation: &'static str,
        /// The entity ID involved, if known.
        id: Option<EntityId>,
        /// The underlying error.
        source: Box<CoreError>,
    },
}

fn topic_suffix(topic: &Option<String>) -> String {
    topic
        .as_ref()
        .map(|t| format!(" on topic {t}"))
        .unwrap_or_default()
}

fn id_suffix(id: &Option<EntityId>) -> String {
    match id {
        Some(id) if !id.is_empty() => format!(" entity {id}"),
        _ => String::new(),
    }
}

impl CoreError {
    /// Creates an entity not found error.
    pub fn not_found(id: impl Into<EntityId>) -> Self {
        Self::EntityNotFound { id: id.into() }
    }

    /// Creates an entity already exists error.
    pub fn already_exists(id: impl Into<EntityId>) -> Self {
        Self::EntityAlreadyExists { id: id.into() }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Creates a policy rejection error.
    pub fn policy_rejected(reason: impl Into<String>) -> Self {
        Self::PolicyRejected {
            reason: reason.into(),
        }
    }

    /// Creates an invalid identifier error.
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    /// Wraps a hook failure.
    pub fn pre_hook(hook: Hook, source: CoreError) -> Self {
        Self::PreHookFailed {
            hook,
            source: Box::new(source),
        }
    }

    /// Wraps a failure to set an identifier.
    pub fn identifier_assignment(id: EntityId, source: CoreError) -> Self {
        Self::IdentifierAssignmentFailed {
            id,
            source: Box::new(source),
        }
    }

    /// Wraps an observer failure.
    pub fn observer_failed(topic: Option<&str>, source: CoreError) -> Self {
        Self::ObserverFailed {
            topic: topic.map(str::to_string),
            source: Box::new(source),
        }
    }

    /// Annotates this error with the operation and entity it happened on.
    ///
    /// The kind is preserved: [`CoreError::kind`] and the `is_*` checks look
    /// through the annotation.
    #[must_use]
    pub fn context(self, operation: &'static str, id: Option<&EntityId>) -> Self {
        Self::Context {
            operation,
            id: id.cloned(),
            source: Box::new(self),
        }
    }

    /// Returns the underlying error with all context annotations removed.
    pub fn kind(&self) -> &CoreError {
        let mut current = self;
        while let CoreError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns true if this is (or wraps) an entity not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), CoreError::EntityNotFound { .. })
    }

    /// Returns true if this is (or wraps) an entity already exists error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self.kind(), CoreError::EntityAlreadyExists { .. })
    }

    /// Returns true if this is (or wraps) a store not loaded error.
    pub fn is_not_loaded(&self) -> bool {
        matches!(self.kind(), CoreError::StoreNotLoaded)
    }
}
