//! Identifier generation.

use crate::entity::{Entity, EntityId};

/// Generates the ID assigned to an entity on create.
///
/// Closures `Fn(&E) -> EntityId` are strategies too.
pub trait IdStrategy<E: Entity>: Send + Sync {
    /// Returns the ID for `entity`.
    fn generate(&self, entity: &E) -> EntityId;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidStrategy;

impl<E: Entity> IdStrategy<E> for UuidStrategy {
    fn generate(&self, _entity: &E) -> EntityId {
        EntityId::generate()
    }
}

impl<E, F> IdStrategy<E> for F
where
    E: Entity,
    F: Fn(&E) -> EntityId + Send + Sync,
{
    fn generate(&self, entity: &E) -> EntityId {
        self(entity)
    }
}
