//! The entity contract.

use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};
use mirrordb_criteria::Record;

/// A storable record.
///
/// Implementors provide:
/// - `id()` / `set_id()`: the identifier, empty while unassigned
/// - [`Record`]: named field access for criteria evaluation
///
/// and may override:
/// - `resource_id()` / `set_resource_id()`: a human-facing identifier
/// - `pre_create()` / `pre_update()`: hooks run before the entity is
///   persisted; an error aborts the operation
///
/// Repositories hand out clones, so `Clone` should be cheap relative to a
/// backend round-trip.
///
/// # Example
///
/// ```rust
/// use mirrordb_core::{CoreResult, Entity, EntityId, Record, Value};
///
/// #[derive(Debug, Clone, Default)]
/// struct Note {
///     id: EntityId,
///     title: String,
/// }
///
/// impl Record for Note {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "Id" => Some(self.id.as_str().into()),
///             "Title" => Some(self.title.clone().into()),
///             _ => None,
///         }
///     }
/// }
///
/// impl Entity for Note {
///     fn id(&self) -> &EntityId {
///         &self.id
///     }
///
///     fn set_id(&mut self, id: EntityId) -> CoreResult<()> {
///         self.id = id;
///         Ok(())
///     }
/// }
/// ```
pub trait Entity: Record + Clone + Send + Sync + 'static {
    /// Returns the entity's identifier.
    fn id(&self) -> &EntityId;

    /// Assigns the entity's identifier.
    ///
    /// # Errors
    ///
    /// Implementors may reject identifiers they cannot hold.
    fn set_id(&mut self, id: EntityId) -> CoreResult<()>;

    /// Returns the human-facing resource identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceIdNotSupported`] unless overridden.
    fn resource_id(&self) -> CoreResult<String> {
        Err(CoreError::ResourceIdNotSupported)
    }

    /// Assigns the human-facing resource identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceIdNotSupported`] unless overridden.
    fn set_resource_id(&mut self, resource_id: String) -> CoreResult<()> {
        let _ = resource_id;
        Err(CoreError::ResourceIdNotSupported)
    }

    /// Runs before the entity is created.
    fn pre_create(&mut self) -> CoreResult<()> {
        Ok(())
    }

    /// Runs before the entity is updated.
    fn pre_update(&mut self) -> CoreResult<()> {
        Ok(())
    }
}

/// Returns true if `entities` holds an entity with the same ID as `entity`.
///
/// Empty IDs never match: an entity without an ID is never contained.
pub fn contains<E: Entity>(entities: &[E], entity: &E) -> bool {
    let id = entity.id();
    if id.is_empty() {
        return false;
    }

    entities.iter().any(|e| !e.id().is_empty() && e.id() == id)
}
