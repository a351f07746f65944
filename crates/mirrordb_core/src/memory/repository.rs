//! Mutex-guarded ordered collection.

use super::id_strategy::IdStrategy;
use super::policy::Policy;
use crate::context::Context;
use crate::entity::{contains, Entity, EntityId};
use crate::error::{CoreError, CoreResult, Hook};
use crate::repository::{Bootstrap, Repository};
use mirrordb_criteria::Criteria;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// In-memory [`Repository`] over an ordered collection.
///
/// The collection lock is held for the whole of each call, so concurrent
/// creates cannot both pass the duplicate check. Insertion order is kept
/// and is what the admission policies act on. The [`Context`] passed to
/// each call is not consulted.
pub struct MemoryRepository<E: Entity> {
    collection: Mutex<Vec<E>>,
    policy: Option<Box<dyn Policy<E>>>,
    id_strategy: Option<Box<dyn IdStrategy<E>>>,
    bootstrapped: AtomicBool,
}

impl<E: Entity> MemoryRepository<E> {
    /// Creates a repository holding `initial`, in order.
    pub fn new(initial: Vec<E>) -> Self {
        Self {
            collection: Mutex::new(initial),
            policy: None,
            id_strategy: None,
            bootstrapped: AtomicBool::new(false),
        }
    }

    /// Sets the admission policy consulted on create.
    #[must_use]
    pub fn with_policy(mut self, policy: impl Policy<E> + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Sets the identifier strategy. A configured strategy assigns the ID
    /// on every create, replacing any ID the entity already carries.
    #[must_use]
    pub fn with_id_strategy(mut self, strategy: impl IdStrategy<E> + 'static) -> Self {
        self.id_strategy = Some(Box::new(strategy));
        self
    }

    /// Returns the number of stored entities.
    pub fn len(&self) -> usize {
        self.collection.lock().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.collection.lock().is_empty()
    }

    /// Inserts an already-identified entity through the admission policy,
    /// skipping hooks and identifier assignment.
    pub(crate) fn admit(&self, ctx: &Context, entity: E) -> CoreResult<()> {
        let mut collection = self.collection.lock();
        self.place(ctx, entity, &mut collection)
    }

    fn place(&self, ctx: &Context, entity: E, collection: &mut Vec<E>) -> CoreResult<()> {
        match &self.policy {
            Some(policy) => policy.apply_create(ctx, entity, collection),
            None => {
                collection.push(entity);
                Ok(())
            }
        }
    }

    fn assign_id(&self, entity: &mut E) -> CoreResult<()> {
        let id = match &self.id_strategy {
            Some(strategy) => strategy.generate(entity),
            None if entity.id().is_empty() => EntityId::generate(),
            None => return Ok(()),
        };
        entity
            .set_id(id.clone())
            .map_err(|e| CoreError::identifier_assignment(id, e))
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<E: Entity> fmt::Debug for MemoryRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("len", &self.len())
            .field("has_policy", &self.policy.is_some())
            .field("has_id_strategy", &self.id_strategy.is_some())
            .finish_non_exhaustive()
    }
}

impl<E: Entity> Repository<E> for MemoryRepository<E> {
    /// Runs `on_bootstrap` on the first start only.
    fn start(&self, ctx: &Context, on_bootstrap: Bootstrap<'_>) -> CoreResult<()> {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("bootstrapping in-memory repository");
        on_bootstrap(ctx)
    }

    fn create(&self, ctx: &Context, mut entity: E) -> CoreResult<E> {
        let mut collection = self.collection.lock();

        if contains(&collection, &entity) {
            return Err(CoreError::already_exists(entity.id()));
        }

        entity
            .pre_create()
            .map_err(|e| CoreError::pre_hook(Hook::PreCreate, e))?;
        self.assign_id(&mut entity)?;

        trace!(id = %entity.id(), "memory create");
        self.place(ctx, entity.clone(), &mut collection)?;
        Ok(entity)
    }

    fn read(&self, _ctx: &Context, id: &EntityId) -> CoreResult<E> {
        self.collection
            .lock()
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(id))
    }

    fn read_all(&self, _ctx: &Context) -> CoreResult<Vec<E>> {
        Ok(self.collection.lock().clone())
    }

    fn update(&self, _ctx: &Context, entity: &E) -> CoreResult<()> {
        let mut collection = self.collection.lock();
        if let Some(slot) = collection.iter_mut().find(|e| e.id() == entity.id()) {
            trace!(id = %entity.id(), "memory update");
            *slot = entity.clone();
        }
        Ok(())
    }

    fn delete(&self, _ctx: &Context, entity: &E) -> CoreResult<()> {
        let mut collection = self.collection.lock();
        if let Some(pos) = collection.iter().position(|e| e.id() == entity.id()) {
            trace!(id = %entity.id(), "memory delete");
            collection.remove(pos);
        }
        Ok(())
    }

    fn match_all(&self, _ctx: &Context, criteria: &Criteria) -> CoreResult<Vec<E>> {
        Ok(self
            .collection
            .lock()
            .iter()
            .filter(|e| criteria.is_satisfied_by(*e))
            .cloned()
            .collect())
    }

    fn match_one(&self, _ctx: &Context, criteria: &Criteria) -> CoreResult<E> {
        self.collection
            .lock()
            .iter()
            .find(|e| criteria.is_satisfied_by(*e))
            .cloned()
            .ok_or_else(|| CoreError::not_found(EntityId::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{LruPolicy, MruPolicy};
    use mirrordb_criteria::{Record, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: EntityId,
        label: String,
        hooked: bool,
    }

    impl Row {
        fn new(id: &str, label: &str) -> Self {
            Self {
                id: EntityId::new(id),
                label: label.to_string(),
                hooked: false,
            }
        }
    }

    impl Record for Row {
        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "Id" => Some(self.id.as_str().into()),
                "Label" => Some(self.label.clone().into()),
                _ => None,
            }
        }
    }

    impl Entity for Row {
        fn id(&self) -> &EntityId {
            &self.id
        }

        fn set_id(&mut self, id: EntityId) -> CoreResult<()> {
            if id.as_str() == "reject" {
                return Err(CoreError::invalid_identifier("reserved"));
            }
            self.id = id;
            Ok(())
        }

        fn pre_create(&mut self) -> CoreResult<()> {
            if self.label.is_empty() {
                return Err(CoreError::backend("label required"));
            }
            self.hooked = true;
            Ok(())
        }
    }

    fn ids(repo: &MemoryRepository<Row>) -> Vec<String> {
        repo.read_all(&Context::new())
            .unwrap()
            .into_iter()
            .map(|r| r.id.into_string())
            .collect()
    }

    #[test]
    fn create_assigns_random_id_when_empty() {
        let repo = MemoryRepository::default();
        let ctx = Context::new();

        let created = repo.create(&ctx, Row::new("", "a")).unwrap();
        assert!(!created.id.is_empty());
        assert!(created.hooked);
        assert_eq!(repo.read(&ctx, &created.id).unwrap(), created);
    }

    #[test]
    fn create_keeps_existing_id_without_strategy() {
        let repo = MemoryRepository::default();
        let created = repo.create(&Context::new(), Row::new("7", "a")).unwrap();
        assert_eq!(created.id.as_str(), "7");
    }

    #[test]
    fn create_duplicate_fails() {
        let repo = MemoryRepository::new(vec![Row::new("1", "a")]);
        let err = repo.create(&Context::new(), Row::new("1", "b")).unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn failing_hook_aborts_create() {
        let repo = MemoryRepository::default();
        let err = repo.create(&Context::new(), Row::new("", "")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::PreHookFailed {
                hook: Hook::PreCreate,
                ..
            }
        ));
        assert!(repo.is_empty());
    }

    #[test]
    fn strategy_always_assigns() {
        let repo = MemoryRepository::default()
            .with_id_strategy(|row: &Row| EntityId::new(format!("row-{}", row.label)));
        let created = repo.create(&Context::new(), Row::new("9", "x")).unwrap();
        assert_eq!(created.id.as_str(), "row-x");
    }

    #[test]
    fn rejected_identifier_is_reported() {
        let repo =
            MemoryRepository::default().with_id_strategy(|_: &Row| EntityId::new("reject"));
        let err = repo.create(&Context::new(), Row::new("", "x")).unwrap_err();
        assert!(matches!(err, CoreError::IdentifierAssignmentFailed { .. }));
        assert!(repo.is_empty());
    }

    #[test]
    fn read_missing_is_not_found() {
        let repo: MemoryRepository<Row> = MemoryRepository::default();
        assert!(repo
            .read(&Context::new(), &EntityId::new("x"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn update_replaces_in_place() {
        let ctx = Context::new();
        let repo = MemoryRepository::new(vec![Row::new("1", "a"), Row::new("2", "b")]);
        repo.update(&ctx, &Row::new("1", "z")).unwrap();
        assert_eq!(repo.read(&ctx, &EntityId::new("1")).unwrap().label, "z");
        assert_eq!(ids(&repo), ["1", "2"]);

        // absent entity is ignored
        repo.update(&ctx, &Row::new("3", "c")).unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn delete_removes_first_match() {
        let ctx = Context::new();
        let repo = MemoryRepository::new(vec![
            Row::new("1", "a"),
            Row::new("2", "b"),
            Row::new("1", "c"),
        ]);
        repo.delete(&ctx, &Row::new("1", "")).unwrap();
        assert_eq!(ids(&repo), ["2", "1"]);
        repo.delete(&ctx, &Row::new("9", "")).unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn match_preserves_order() {
        let ctx = Context::new();
        let repo = MemoryRepository::new(vec![
            Row::new("1", "b"),
            Row::new("2", "a"),
            Row::new("3", "b"),
        ]);
        let found = repo.match_all(&ctx, &Criteria::eq("Label", "b")).unwrap();
        assert_eq!(
            found.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            ["1", "3"]
        );

        let first = repo.match_one(&ctx, &Criteria::eq("Label", "b")).unwrap();
        assert_eq!(first.id.as_str(), "1");

        assert!(repo
            .match_one(&ctx, &Criteria::eq("Label", "q"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn mru_keeps_last_inserted() {
        let ctx = Context::new();
        let repo = MemoryRepository::default().with_policy(MruPolicy::new(3));
        for i in 0..5 {
            repo.create(&ctx, Row::new(&i.to_string(), "x")).unwrap();
        }
        assert_eq!(ids(&repo), ["2", "3", "4"]);
    }

    #[test]
    fn lru_keeps_first_inserted_silently() {
        let ctx = Context::new();
        let repo = MemoryRepository::default().with_policy(LruPolicy::new(3));
        for i in 0..5 {
            let created = repo.create(&ctx, Row::new(&i.to_string(), "x"));
            assert!(created.is_ok());
        }
        assert_eq!(ids(&repo), ["0", "1", "2"]);
    }

    #[test]
    fn zero_capacity_admits_nothing() {
        let ctx = Context::new();
        let mru = MemoryRepository::default().with_policy(MruPolicy::new(0));
        let lru = MemoryRepository::default().with_policy(LruPolicy::new(0));
        mru.create(&ctx, Row::new("1", "x")).unwrap();
        lru.create(&ctx, Row::new("1", "x")).unwrap();
        assert!(mru.is_empty());
        assert!(lru.is_empty());
    }

    #[test]
    fn start_bootstraps_once() {
        let ctx = Context::new();
        let repo: MemoryRepository<Row> = MemoryRepository::default();
        let mut calls = 0;
        let mut seed = |_: &Context| -> CoreResult<()> {
            calls += 1;
            Ok(())
        };
        repo.start(&ctx, &mut seed).unwrap();
        repo.start(&ctx, &mut seed).unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn bootstrap_error_propagates() {
        let repo: MemoryRepository<Row> = MemoryRepository::default();
        let err = repo
            .start(&Context::new(), &mut |_| Err(CoreError::backend("seed")))
            .unwrap_err();
        assert!(matches!(err, CoreError::Backend { .. }));
    }

    /// Refuses every entity whose label is `blocked`.
    struct Blocklist;

    impl Policy<Row> for Blocklist {
        fn apply_create(
            &self,
            _ctx: &Context,
            entity: Row,
            collection: &mut Vec<Row>,
        ) -> CoreResult<()> {
            if entity.label == "blocked" {
                return Err(CoreError::policy_rejected(format!("{} is blocked", entity.id)));
            }
            collection.push(entity);
            Ok(())
        }
    }

    #[test]
    fn policy_rejection_fails_create() {
        let ctx = Context::new();
        let repo = MemoryRepository::default().with_policy(Blocklist);
        repo.create(&ctx, Row::new("1", "open")).unwrap();

        let err = repo.create(&ctx, Row::new("2", "blocked")).unwrap_err();
        assert!(matches!(err, CoreError::PolicyRejected { .. }));
        assert_eq!(err.to_string(), "policy rejected entity: 2 is blocked");
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn concurrent_creates_of_one_id_admit_exactly_one() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        const THREADS: usize = 8;
        let repo = Arc::new(MemoryRepository::default());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|n| {
                let repo = Arc::clone(&repo);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    repo.create(&Context::new(), Row::new("same", &format!("t{n}")))
                })
            })
            .collect();
        let results: Vec<CoreResult<Row>> = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(e) if e.is_already_exists()))
                .count(),
            THREADS - 1
        );
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        use std::sync::Arc;
        use std::thread;

        let repo = Arc::new(MemoryRepository::default());
        let ctx = Context::new();
        for n in 0..4 {
            repo.create(&ctx, Row::new(&n.to_string(), "fresh")).unwrap();
        }

        let handles: Vec<_> = (0..4)
            .map(|n| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    let ctx = Context::new();
                    for _ in 0..50 {
                        repo.update(&ctx, &Row::new(&n.to_string(), "updated")).unwrap();
                        repo.create(&ctx, Row::new("", "extra")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }

        assert_eq!(repo.len(), 4 + 4 * 50);
        for n in 0..4 {
            let row = repo.read(&ctx, &EntityId::new(n.to_string())).unwrap();
            assert_eq!(row.label, "updated");
        }
    }
}
