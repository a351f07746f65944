//! Observer notification.
//!
//! [`Notifier`] broadcasts to every attached observer; [`TopicNotifier`]
//! routes by topic name over a set of topics fixed at construction.
//!
//! Delivery is synchronous and in attachment order. A failing observer
//! does not stop delivery: every observer is invoked and the last error
//! is returned.

mod observer;
mod topic;

pub use observer::{Observer, ObserverFn, ObserverHandle};
pub use topic::TopicNotifier;

use crate::context::Context;
use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// Broadcasts events to every attached observer.
pub struct Notifier<E> {
    observers: RwLock<Vec<ObserverHandle<E>>>,
}

impl<E> Notifier<E> {
    /// Creates a notifier with no observers.
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Attaches an observer.
    pub fn attach(&self, observer: ObserverHandle<E>) {
        self.observers.write().push(observer);
    }

    /// Detaches the first registration of `observer`. Returns false if it
    /// was not attached.
    pub fn detach(&self, observer: &ObserverHandle<E>) -> bool {
        let mut observers = self.observers.write();
        match observers.iter().position(|o| same_observer(o, observer)) {
            Some(pos) => {
                observers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns the number of attached observers.
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Returns true if no observer is attached.
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Delivers `event` to every observer.
    ///
    /// # Errors
    ///
    /// Returns the last observer error, wrapped in
    /// [`CoreError::ObserverFailed`].
    pub fn notify(&self, ctx: &Context, event: &E) -> CoreResult<()> {
        // observers may attach or detach from inside a callback
        let observers = self.observers.read().clone();
        deliver(ctx, None, observers.iter(), event)
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn same_observer<E>(a: &ObserverHandle<E>, b: &ObserverHandle<E>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn deliver<'a, E: 'a>(
    ctx: &Context,
    topic: Option<&str>,
    observers: impl Iterator<Item = &'a ObserverHandle<E>>,
    event: &E,
) -> CoreResult<()> {
    let mut last_error = None;
    for observer in observers {
        if let Err(e) = observer.handle(ctx, event) {
            last_error = Some(e);
        }
    }
    match last_error {
        Some(e) => Err(CoreError::observer_failed(topic, e)),
        None => Ok(()),
    }
}
