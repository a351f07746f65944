//! Observer contract.

use crate::context::Context;
use crate::error::CoreResult;
use std::fmt;
use std::sync::Arc;

/// Receives events from a notifier.
pub trait Observer<E>: Send + Sync {
    /// Handles one event. An error is reported to the notifier's caller
    /// but does not stop delivery to other observers.
    fn handle(&self, ctx: &Context, event: &E) -> CoreResult<()>;
}

/// Shared observer registration; pass it back to `detach` to unregister.
pub type ObserverHandle<E> = Arc<dyn Observer<E>>;

/// Adapts a closure into an [`Observer`].
pub struct ObserverFn<F>(F);

impl<F> ObserverFn<F> {
    /// Wraps `callback`.
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> fmt::Debug for ObserverFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObserverFn")
    }
}

impl<E, F> Observer<E> for ObserverFn<F>
where
    F: Fn(&Context, &E) -> CoreResult<()> + Send + Sync,
{
    fn handle(&self, ctx: &Context, event: &E) -> CoreResult<()> {
        (self.0)(ctx, event)
    }
}
