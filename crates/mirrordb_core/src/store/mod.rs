//! Caching stores.

mod event;
mod proxy;

pub use event::StoreEvent;
pub use proxy::{HydrateFn, ProxyStore, RefreshReport};

use crate::context::Context;
use crate::entity::Entity;
use crate::error::CoreResult;
use crate::notifier::ObserverHandle;
use crate::repository::Repository;
use std::sync::Arc;

/// A repository that mirrors a remote repository.
pub trait Store<E: Entity>: Repository<E> {
    /// Binds the remote repository and warms the mirror from its snapshot.
    ///
    /// Loading is one-time.
    fn load(&mut self, ctx: &Context, remote: Arc<dyn Repository<E>>) -> CoreResult<()>;

    /// Reconciles the mirror with a fresh remote snapshot.
    fn refresh(&self, ctx: &Context) -> CoreResult<RefreshReport>;

    /// Sets the enrichment applied to entities fetched from the remote.
    fn set_hydrate(&mut self, hydrate: HydrateFn<E>);

    /// Attaches an observer to a lifecycle event.
    fn attach(&self, event: StoreEvent, observer: ObserverHandle<E>) -> CoreResult<()>;
}
