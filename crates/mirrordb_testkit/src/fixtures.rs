//! Test fixtures.
//!
//! Provides a test entity, an instrumented repository and an event
//! recorder for proxy store scenarios.

use mirrordb_core::{
    Bootstrap, Context, CoreError, CoreResult, Criteria, Entity, EntityId, FieldDescriptor,
    FieldMapping, MemoryRepository, ProxyStore, Record, Repository, StoreEvent, Value,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A test entity.
///
/// `attr` is required by the create hook; every update bumps `revision`.
/// `note` has no backend field name, so criteria on `Note` evaluate in
/// memory but do not compile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    /// Identifier. Always serialized; an empty `_id` is unassigned.
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    /// Required attribute.
    pub attr: String,
    /// Integer field.
    #[serde(default)]
    pub count: i64,
    /// Float field.
    #[serde(default)]
    pub score: f64,
    /// Unmapped field.
    #[serde(default)]
    pub note: String,
    /// Number of updates applied.
    #[serde(default)]
    pub revision: i64,
}

impl Item {
    /// Creates an item without an ID.
    pub fn new(attr: &str) -> Self {
        Self {
            attr: attr.to_string(),
            ..Self::default()
        }
    }

    /// Creates an item with an ID.
    pub fn with_id(id: &str, attr: &str) -> Self {
        Self {
            id: EntityId::new(id),
            ..Self::new(attr)
        }
    }

    /// Sets the integer field.
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }

    /// Sets the float field.
    #[must_use]
    pub fn score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Sets the unmapped field.
    #[must_use]
    pub fn note(mut self, note: &str) -> Self {
        self.note = note.to_string();
        self
    }
}

impl Record for Item {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "Id" => Some(self.id.as_str().into()),
            "Attr" => Some(self.attr.clone().into()),
            "Count" => Some(self.count.into()),
            "Score" => Some(self.score.into()),
            "Note" => Some(self.note.clone().into()),
            "Revision" => Some(self.revision.into()),
            _ => None,
        }
    }
}

impl FieldMapping for Item {
    fn describe_field(name: &str) -> Option<FieldDescriptor> {
        match name {
            "Id" => Some(FieldDescriptor::tagged("Id", "_id")),
            "Attr" => Some(FieldDescriptor::tagged("Attr", "attr")),
            "Count" => Some(FieldDescriptor::tagged("Count", "count")),
            "Score" => Some(FieldDescriptor::tagged("Score", "score")),
            "Note" => Some(FieldDescriptor::untagged("Note")),
            "Revision" => Some(FieldDescriptor::tagged("Revision", "revision")),
            _ => None,
        }
    }
}

impl Entity for Item {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn set_id(&mut self, id: EntityId) -> CoreResult<()> {
        self.id = id;
        Ok(())
    }

    fn resource_id(&self) -> CoreResult<String> {
        Ok(self.attr.clone())
    }

    fn set_resource_id(&mut self, resource_id: String) -> CoreResult<()> {
        self.attr = resource_id;
        Ok(())
    }

    fn pre_create(&mut self) -> CoreResult<()> {
        if self.attr.is_empty() {
            return Err(CoreError::backend("attr is required"));
        }
        Ok(())
    }

    fn pre_update(&mut self) -> CoreResult<()> {
        self.revision += 1;
        Ok(())
    }
}

/// Repository operation names recorded by [`SpyRepository`].
pub const OPERATIONS: [&str; 8] = [
    "start",
    "create",
    "read",
    "read_all",
    "update",
    "delete",
    "match_all",
    "match_one",
];

/// An in-memory repository that records every call and can be told to fail.
///
/// Call names are those in [`OPERATIONS`]. A failing operation is recorded
/// and then returns a backend error without touching the data.
pub struct SpyRepository<E: Entity> {
    inner: MemoryRepository<E>,
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<Vec<&'static str>>,
}

impl<E: Entity> SpyRepository<E> {
    /// Creates a spy holding `initial`.
    pub fn new(initial: Vec<E>) -> Self {
        Self {
            inner: MemoryRepository::new(initial),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
        }
    }

    /// Creates a shared spy holding `initial`.
    pub fn shared(initial: Vec<E>) -> Arc<Self> {
        Arc::new(Self::new(initial))
    }

    /// Makes `operation` fail from now on.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().push(operation);
    }

    /// Makes `operation` succeed again.
    pub fn heal(&self, operation: &'static str) {
        self.failing.lock().retain(|op| *op != operation);
    }

    /// Returns the recorded calls, oldest first.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// Returns how many times `operation` was called.
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().iter().filter(|op| **op == operation).count()
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Returns the stored entities without recording a call.
    pub fn entities(&self) -> Vec<E> {
        self.inner.read_all(&Context::new()).unwrap_or_default()
    }

    /// Returns the stored IDs in order, without recording a call.
    pub fn ids(&self) -> Vec<String> {
        self.entities()
            .into_iter()
            .map(|e| e.id().to_string())
            .collect()
    }

    fn record(&self, operation: &'static str) -> CoreResult<()> {
        self.calls.lock().push(operation);
        if self.failing.lock().contains(&operation) {
            return Err(CoreError::backend(format!("injected {operation} failure")));
        }
        Ok(())
    }
}

impl<E: Entity> Repository<E> for SpyRepository<E> {
    fn start(&self, ctx: &Context, on_bootstrap: Bootstrap<'_>) -> CoreResult<()> {
        self.record("start")?;
        self.inner.start(ctx, on_bootstrap)
    }

    fn create(&self, ctx: &Context, entity: E) -> CoreResult<E> {
        self.record("create")?;
        self.inner.create(ctx, entity)
    }

    fn read(&self, ctx: &Context, id: &EntityId) -> CoreResult<E> {
        self.record("read")?;
        self.inner.read(ctx, id)
    }

    fn read_all(&self, ctx: &Context) -> CoreResult<Vec<E>> {
        self.record("read_all")?;
        self.inner.read_all(ctx)
    }

    fn update(&self, ctx: &Context, entity: &E) -> CoreResult<()> {
        self.record("update")?;
        self.inner.update(ctx, entity)
    }

    fn delete(&self, ctx: &Context, entity: &E) -> CoreResult<()> {
        self.record("delete")?;
        self.inner.delete(ctx, entity)
    }

    fn match_all(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<Vec<E>> {
        self.record("match_all")?;
        self.inner.match_all(ctx, criteria)
    }

    fn match_one(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<E> {
        self.record("match_one")?;
        self.inner.match_one(ctx, criteria)
    }
}

/// Records the lifecycle events a proxy store publishes.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<(StoreEvent, EntityId)>>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log subscribed to every event of `store`.
    pub fn attached<E: Entity>(store: &ProxyStore<E>) -> CoreResult<Self> {
        let log = Self::new();
        for event in StoreEvent::ALL {
            let sink = log.clone();
            store.on(event, move |_, entity: &E| {
                sink.record(event, entity.id().clone());
                Ok(())
            })?;
        }
        Ok(log)
    }

    /// Appends an event.
    pub fn record(&self, event: StoreEvent, id: EntityId) {
        self.events.lock().push((event, id));
    }

    /// Returns every recorded event, oldest first.
    pub fn events(&self) -> Vec<(StoreEvent, EntityId)> {
        self.events.lock().clone()
    }

    /// Returns the IDs recorded for `event`, oldest first.
    pub fn ids(&self, event: StoreEvent) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, id)| id.to_string())
            .collect()
    }

    /// Returns how many times `event` was recorded.
    pub fn count(&self, event: StoreEvent) -> usize {
        self.events.lock().iter().filter(|(e, _)| *e == event).count()
    }

    /// Forgets the recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes_with_backend_names() {
        let item = Item::with_id("1", "a").count(2).score(0.5);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["_id"], "1");
        assert_eq!(json["attr"], "a");
        assert_eq!(json["count"], 2);

        // unassigned ids are kept so `_id` filters see them
        let json = serde_json::to_value(Item::new("a")).unwrap();
        assert_eq!(json["_id"], "");
    }

    #[test]
    fn item_hooks() {
        assert!(Item::new("").pre_create().is_err());
        let mut item = Item::new("a");
        item.pre_update().unwrap();
        assert_eq!(item.revision, 1);
        assert_eq!(item.resource_id().unwrap(), "a");
    }

    #[test]
    fn spy_records_and_fails() {
        let ctx = Context::new();
        let spy = SpyRepository::new(vec![Item::with_id("1", "a")]);

        spy.read(&ctx, &EntityId::new("1")).unwrap();
        spy.fail("read");
        assert!(spy.read(&ctx, &EntityId::new("1")).is_err());
        spy.heal("read");
        assert!(spy.read(&ctx, &EntityId::new("1")).is_ok());

        assert_eq!(spy.calls(), ["read", "read", "read"]);
        assert_eq!(spy.call_count("read"), 3);
        assert_eq!(spy.ids(), ["1"]);
    }
}
