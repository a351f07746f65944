//! Topic-keyed notifier.

use super::observer::{ObserverFn, ObserverHandle};
use super::{deliver, same_observer};
use crate::context::Context;
use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// Routes events to observers by topic name.
///
/// Topics are fixed at construction; attaching to any other topic fails.
/// Observers of a topic are invoked in attachment order.
pub struct TopicNotifier<E> {
    topics: Vec<String>,
    observers: RwLock<Vec<(String, ObserverHandle<E>)>>,
}

impl<E> TopicNotifier<E> {
    /// Creates a notifier accepting the given topics.
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Returns the accepted topics, in construction order.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Returns true if `topic` was registered at construction.
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// Attaches `observer` to `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownTopic`] if `topic` was not registered.
    pub fn attach(&self, topic: &str, observer: ObserverHandle<E>) -> CoreResult<()> {
        if !self.has_topic(topic) {
            return Err(CoreError::UnknownTopic {
                topic: topic.to_string(),
            });
        }
        self.observers.write().push((topic.to_string(), observer));
        Ok(())
    }

    /// Attaches a callback to `topic` and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownTopic`] if `topic` was not registered.
    pub fn attach_fn<F>(&self, topic: &str, callback: F) -> CoreResult<ObserverHandle<E>>
    where
        E: 'static,
        F: Fn(&Context, &E) -> CoreResult<()> + Send + Sync + 'static,
    {
        let handle: ObserverHandle<E> = Arc::new(ObserverFn::new(callback));
        self.attach(topic, Arc::clone(&handle))?;
        Ok(handle)
    }

    /// Detaches the first registration of `observer`, whatever its topic.
    /// Returns false if it was not attached.
    pub fn detach(&self, observer: &ObserverHandle<E>) -> bool {
        let mut observers = self.observers.write();
        match observers
            .iter()
            .position(|(_, o)| same_observer(o, observer))
        {
            Some(pos) => {
                observers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns the number of observers attached to `topic`.
    pub fn observer_count(&self, topic: &str) -> usize {
        self.observers
            .read()
            .iter()
            .filter(|(t, _)| t == topic)
            .count()
    }

    /// Delivers `event` to every observer of `topic`.
    ///
    /// All observers run even if some fail.
    ///
    /// # Errors
    ///
    /// Returns the last observer error, wrapped in
    /// [`CoreError::ObserverFailed`].
    pub fn notify(&self, ctx: &Context, topic: &str, event: &E) -> CoreResult<()> {
        let observers: Vec<ObserverHandle<E>> = self
            .observers
            .read()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, o)| Arc::clone(o))
            .collect();
        deliver(ctx, Some(topic), observers.iter(), event)
    }
}
