//! Admission policies.

use crate::context::Context;
use crate::entity::Entity;
use crate::error::CoreResult;
use tracing::trace;

/// Capacity rule consulted when an entity is created.
///
/// A policy owns no entities. It receives the new entity and the locked
/// collection and decides what survives.
pub trait Policy<E: Entity>: Send + Sync {
    /// Admits `entity` into `collection`, evicting or rejecting as needed.
    fn apply_create(&self, ctx: &Context, entity: E, collection: &mut Vec<E>) -> CoreResult<()>;
}

/// Keeps the most recently inserted `capacity` entities.
///
/// When the collection is at or above capacity, the oldest entity is
/// evicted before the new one is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MruPolicy {
    capacity: usize,
}

impl MruPolicy {
    /// Creates a policy bounded at `capacity` entities.
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Returns the capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<E: Entity> Policy<E> for MruPolicy {
    fn apply_create(&self, _ctx: &Context, entity: E, collection: &mut Vec<E>) -> CoreResult<()> {
        if collection.len() >= self.capacity && !collection.is_empty() {
            let evicted = collection.remove(0);
            trace!(id = %evicted.id(), "mru evicted oldest entity");
        }
        // a zero-capacity collection holds nothing
        if self.capacity > 0 {
            collection.push(entity);
        }
        Ok(())
    }
}

/// Keeps the first `capacity` entities ever inserted.
///
/// When the collection is at or above capacity, the new entity is dropped
/// without an error. Callers cannot tell from the result whether it was
/// admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruPolicy {
    capacity: usize,
}

impl LruPolicy {
    /// Creates a policy bounded at `capacity` entities.
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Returns the capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<E: Entity> Policy<E> for LruPolicy {
    fn apply_create(&self, _ctx: &Context, entity: E, collection: &mut Vec<E>) -> CoreResult<()> {
        if collection.len() >= self.capacity {
            trace!(id = %entity.id(), "lru at capacity, entity not admitted");
            return Ok(());
        }
        collection.push(entity);
        Ok(())
    }
}
