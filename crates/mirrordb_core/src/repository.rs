//! The repository contract.

use crate::context::Context;
use crate::entity::{Entity, EntityId};
use crate::error::CoreResult;
use mirrordb_criteria::Criteria;
use std::sync::Arc;

/// Callback invoked by [`Repository::start`] when the backend needs seeding.
pub type Bootstrap<'a> = &'a mut dyn FnMut(&Context) -> CoreResult<()>;

/// Uniform data access for one entity type.
///
/// Every backend adapter implements this, as does [`crate::ProxyStore`].
/// Identity is by [`Entity::id`]; operations on absent entities are
/// tolerated where noted instead of failing.
pub trait Repository<E: Entity>: Send + Sync {
    /// Prepares the backend. `on_bootstrap` runs when the backend decides
    /// it needs seeding.
    fn start(&self, ctx: &Context, on_bootstrap: Bootstrap<'_>) -> CoreResult<()>;

    /// Persists a new entity and returns it as stored, ID assigned.
    fn create(&self, ctx: &Context, entity: E) -> CoreResult<E>;

    /// Returns the entity with the given ID.
    ///
    /// Fails with [`crate::CoreError::EntityNotFound`] if absent.
    fn read(&self, ctx: &Context, id: &EntityId) -> CoreResult<E>;

    /// Returns every entity.
    fn read_all(&self, ctx: &Context) -> CoreResult<Vec<E>>;

    /// Replaces the stored entity with the same ID. Absent entities are
    /// ignored.
    fn update(&self, ctx: &Context, entity: &E) -> CoreResult<()>;

    /// Removes the stored entity with the same ID. Absent entities are
    /// ignored.
    fn delete(&self, ctx: &Context, entity: &E) -> CoreResult<()>;

    /// Returns every entity satisfying `criteria`.
    fn match_all(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<Vec<E>>;

    /// Returns the first entity satisfying `criteria`.
    ///
    /// Fails with [`crate::CoreError::EntityNotFound`] if none does.
    fn match_one(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<E>;
}

impl<E: Entity, R: Repository<E> + ?Sized> Repository<E> for Arc<R> {
    fn start(&self, ctx: &Context, on_bootstrap: Bootstrap<'_>) -> CoreResult<()> {
        (**self).start(ctx, on_bootstrap)
    }

    fn create(&self, ctx: &Context, entity: E) -> CoreResult<E> {
        (**self).create(ctx, entity)
    }

    fn read(&self, ctx: &Context, id: &EntityId) -> CoreResult<E> {
        (**self).read(ctx, id)
    }

    fn read_all(&self, ctx: &Context) -> CoreResult<Vec<E>> {
        (**self).read_all(ctx)
    }

    fn update(&self, ctx: &Context, entity: &E) -> CoreResult<()> {
        (**self).update(ctx, entity)
    }

    fn delete(&self, ctx: &Context, entity: &E) -> CoreResult<()> {
        (**self).delete(ctx, entity)
    }

    fn match_all(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<Vec<E>> {
        (**self).match_all(ctx, criteria)
    }

    fn match_one(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<E> {
        (**self).match_one(ctx, criteria)
    }
}
