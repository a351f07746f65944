//! Read-through/write-through proxy over a remote repository.

use super::event::StoreEvent;
use super::Store;
use crate::config::{RefreshPolicy, StoreConfig};
use crate::context::Context;
use crate::entity::{contains, Entity, EntityId};
use crate::error::{CoreError, CoreResult};
use crate::memory::MemoryRepository;
use crate::notifier::{ObserverHandle, TopicNotifier};
use crate::repository::{Bootstrap, Repository};
use mirrordb_criteria::Criteria;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Enrichment applied to an entity fetched from the remote before it enters
/// the local mirror.
pub type HydrateFn<E> = Box<dyn Fn(&Context, E) -> CoreResult<E> + Send + Sync>;

/// Outcome of a [`ProxyStore::refresh`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Remote entities copied into the mirror.
    pub loaded: Vec<EntityId>,
    /// Mirror entities created in the remote.
    pub written_back: Vec<EntityId>,
    /// Mirror entities dropped because the remote no longer has them.
    pub unloaded: Vec<EntityId>,
}

impl RefreshReport {
    /// Returns true if the refresh changed nothing.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.written_back.is_empty() && self.unloaded.is_empty()
    }
}

/// Cache-aside store pairing a remote repository with a local mirror.
///
/// The store starts unloaded; every operation except [`ProxyStore::load`]
/// (and [`Repository::start`], which only needs the remote) fails with
/// [`CoreError::StoreNotLoaded`] until it is loaded.
///
/// - Writes go to the remote first, then the mirror, then observers. A
///   failure after the remote step leaves the remote ahead of the mirror;
///   nothing is rolled back.
/// - `read` is served from the mirror and falls back to the remote on a
///   miss, promoting the entity into the mirror.
/// - `read_all` and the match queries are served from the mirror only.
///
/// The store takes no locks of its own. Concurrent writers may interleave
/// their remote and mirror steps.
pub struct ProxyStore<E: Entity> {
    config: StoreConfig,
    remote: Option<Arc<dyn Repository<E>>>,
    local: Option<MemoryRepository<E>>,
    notifier: TopicNotifier<E>,
    hydrate: Option<HydrateFn<E>>,
}

impl<E: Entity> ProxyStore<E> {
    /// Creates an unloaded store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an unloaded store with `config`.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            remote: None,
            local: None,
            notifier: TopicNotifier::new(StoreEvent::ALL.iter().map(|e| e.as_str())),
            hydrate: None,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Changes the refresh policy.
    pub fn set_refresh_policy(&mut self, policy: RefreshPolicy) {
        self.config.refresh_policy = policy;
    }

    /// Returns true once the mirror exists.
    pub fn is_loaded(&self) -> bool {
        self.local.is_some()
    }

    /// Returns the local mirror, if loaded.
    pub fn local(&self) -> Option<&MemoryRepository<E>> {
        self.local.as_ref()
    }

    /// Sets the enrichment applied to fetched entities.
    pub fn on_hydrate<F>(&mut self, hydrate: F)
    where
        F: Fn(&Context, E) -> CoreResult<E> + Send + Sync + 'static,
    {
        self.hydrate = Some(Box::new(hydrate));
    }

    /// Attaches a callback to `event` and returns its handle.
    pub fn on<F>(&self, event: StoreEvent, callback: F) -> CoreResult<ObserverHandle<E>>
    where
        F: Fn(&Context, &E) -> CoreResult<()> + Send + Sync + 'static,
    {
        self.notifier.attach_fn(event.as_str(), callback)
    }

    /// Detaches an observer. Returns false if it was not attached.
    pub fn detach(&self, observer: &ObserverHandle<E>) -> bool {
        self.notifier.detach(observer)
    }

    /// Binds `remote` and warms the mirror from its full snapshot.
    ///
    /// Each entity is hydrated, admitted into the mirror under the
    /// configured eviction policy, and announced as [`StoreEvent::Loaded`].
    /// Observer errors are logged and ignored.
    ///
    /// # Errors
    ///
    /// - [`CoreError::StoreAlreadyLoaded`] on a second call
    /// - the remote's error if the snapshot cannot be read
    /// - the hydrate error for the first entity that fails; entities before
    ///   it stay in the mirror and their events are not retracted
    pub fn load(&mut self, ctx: &Context, remote: Arc<dyn Repository<E>>) -> CoreResult<()> {
        self.remote = Some(Arc::clone(&remote));

        if self.local.is_some() {
            return Err(CoreError::StoreAlreadyLoaded);
        }

        let entities = remote
            .read_all(ctx)
            .map_err(|e| e.context("load entities", None))?;

        let local = self.local.insert(self.config.cache_eviction.build());
        let total = entities.len();
        for entity in entities {
            let id = entity.id().clone();
            let entity = match &self.hydrate {
                Some(hydrate) => hydrate(ctx, entity).map_err(|e| e.context("hydrate", Some(&id)))?,
                None => entity,
            };
            local.admit(ctx, entity.clone())?;

            if let Err(e) = self.notifier.notify(ctx, StoreEvent::Loaded.as_str(), &entity) {
                warn!(id = %id, error = %e, "observer failed during load");
            }
        }

        info!(entities = total, "proxy store loaded");
        Ok(())
    }

    /// Reconciles the mirror with a fresh remote snapshot according to
    /// the refresh policy.
    ///
    /// - reading policies hydrate remote-only entities, copy them into the
    ///   mirror and announce them as [`StoreEvent::Loaded`]
    /// - writing policies create mirror-only entities in the remote
    /// - policies that do not write instead drop mirror-only entities and
    ///   announce them as [`StoreEvent::Unloaded`]
    ///
    /// Write-back and unloading never both happen in one refresh, so
    /// [`RefreshPolicy::ReadWriteAll`] never drops anything from the mirror.
    ///
    /// # Errors
    ///
    /// The first failing step aborts the refresh; earlier steps stand.
    pub fn refresh(&self, ctx: &Context) -> CoreResult<RefreshReport> {
        let (remote, local) = self.parts()?;
        let policy = self.config.refresh_policy;
        let mut report = RefreshReport::default();

        if policy == RefreshPolicy::None {
            return Ok(report);
        }

        let remote_entities = remote
            .read_all(ctx)
            .map_err(|e| e.context("read remote entities", None))?;
        let local_entities = local
            .read_all(ctx)
            .map_err(|e| e.context("read local entities", None))?;

        if policy.reads() {
            for entity in &remote_entities {
                if contains(&local_entities, entity) {
                    continue;
                }
                let hydrated = self.hydrate(ctx, entity.clone())?;
                let stored = local
                    .create(ctx, hydrated)
                    .map_err(|e| e.context("cache", Some(entity.id())))?;
                self.notify(ctx, StoreEvent::Loaded, &stored)?;
                report.loaded.push(entity.id().clone());
            }
        }

        if policy.writes() {
            for entity in &local_entities {
                if contains(&remote_entities, entity) {
                    continue;
                }
                remote
                    .create(ctx, entity.clone())
                    .map_err(|e| e.context("write back", Some(entity.id())))?;
                report.written_back.push(entity.id().clone());
            }
        } else {
            for entity in &local_entities {
                if contains(&remote_entities, entity) {
                    continue;
                }
                local
                    .delete(ctx, entity)
                    .map_err(|e| e.context("unload", Some(entity.id())))?;
                self.notify(ctx, StoreEvent::Unloaded, entity)?;
                report.unloaded.push(entity.id().clone());
            }
        }

        debug!(
            policy = %policy,
            loaded = report.loaded.len(),
            written_back = report.written_back.len(),
            unloaded = report.unloaded.len(),
            "proxy store refreshed"
        );
        Ok(report)
    }

    fn parts(&self) -> CoreResult<(&Arc<dyn Repository<E>>, &MemoryRepository<E>)> {
        match (&self.remote, &self.local) {
            (Some(remote), Some(local)) => Ok((remote, local)),
            _ => Err(CoreError::StoreNotLoaded),
        }
    }

    fn hydrate(&self, ctx: &Context, entity: E) -> CoreResult<E> {
        match &self.hydrate {
            Some(hydrate) => {
                let id = entity.id().clone();
                hydrate(ctx, entity).map_err(|e| e.context("hydrate", Some(&id)))
            }
            None => Ok(entity),
        }
    }

    fn notify(&self, ctx: &Context, event: StoreEvent, entity: &E) -> CoreResult<()> {
        self.notifier
            .notify(ctx, event.as_str(), entity)
            .map_err(|e| e.context("notify", Some(entity.id())))
    }
}

impl<E: Entity> Default for ProxyStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> fmt::Debug for ProxyStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyStore")
            .field("config", &self.config)
            .field("loaded", &self.is_loaded())
            .field("local", &self.local)
            .field("has_hydrate", &self.hydrate.is_some())
            .finish_non_exhaustive()
    }
}

impl<E: Entity> Repository<E> for ProxyStore<E> {
    fn start(&self, ctx: &Context, on_bootstrap: Bootstrap<'_>) -> CoreResult<()> {
        let remote = self.remote.as_ref().ok_or(CoreError::StoreNotLoaded)?;
        remote.start(ctx, on_bootstrap)
    }

    /// Creates `entity` in the remote, then mirrors it.
    ///
    /// The entity must not carry an ID yet; the remote assigns it.
    fn create(&self, ctx: &Context, entity: E) -> CoreResult<E> {
        let (remote, local) = self.parts()?;

        if !entity.id().is_empty() {
            return Err(CoreError::EntityAlreadyHasIdentifier {
                id: entity.id().clone(),
            });
        }

        let created = remote
            .create(ctx, entity)
            .map_err(|e| e.context("create", None))?;
        let created = self.hydrate(ctx, created)?;
        let id = created.id().clone();
        let stored = local
            .create(ctx, created)
            .map_err(|e| e.context("cache", Some(&id)))?;
        self.notify(ctx, StoreEvent::Added, &stored)?;

        debug!(id = %id, "proxy create");
        Ok(stored)
    }

    /// Reads from the mirror, falling back to the remote on a miss.
    ///
    /// A remote hit is hydrated, promoted into the mirror and announced as
    /// [`StoreEvent::Loaded`]. A failed promotion is logged, not returned.
    fn read(&self, ctx: &Context, id: &EntityId) -> CoreResult<E> {
        let (remote, local) = self.parts()?;

        match local.read(ctx, id) {
            Ok(entity) => return Ok(entity),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.context("read", Some(id))),
        }

        let fetched = match remote.read(ctx, id) {
            Ok(entity) => entity,
            Err(e) if e.is_not_found() => return Err(e),
            Err(e) => return Err(e.context("read", Some(id))),
        };
        let fetched = self.hydrate(ctx, fetched)?;

        if let Err(e) = local.create(ctx, fetched.clone()) {
            warn!(id = %id, error = %e, "could not promote entity into local mirror");
        }
        self.notify(ctx, StoreEvent::Loaded, &fetched)?;

        debug!(id = %id, "proxy read promoted from remote");
        Ok(fetched)
    }

    fn read_all(&self, ctx: &Context) -> CoreResult<Vec<E>> {
        let (_, local) = self.parts()?;
        local.read_all(ctx)
    }

    fn update(&self, ctx: &Context, entity: &E) -> CoreResult<()> {
        let (remote, local) = self.parts()?;

        remote
            .update(ctx, entity)
            .map_err(|e| e.context("update", Some(entity.id())))?;
        local
            .update(ctx, entity)
            .map_err(|e| e.context("update cached", Some(entity.id())))?;
        self.notify(ctx, StoreEvent::Updated, entity)
    }

    fn delete(&self, ctx: &Context, entity: &E) -> CoreResult<()> {
        let (remote, local) = self.parts()?;

        remote
            .delete(ctx, entity)
            .map_err(|e| e.context("delete", Some(entity.id())))?;
        local
            .delete(ctx, entity)
            .map_err(|e| e.context("delete cached", Some(entity.id())))?;
        self.notify(ctx, StoreEvent::Deleted, entity)
    }

    fn match_all(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<Vec<E>> {
        let (_, local) = self.parts()?;
        local.match_all(ctx, criteria)
    }

    fn match_one(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<E> {
        let (_, local) = self.parts()?;
        local.match_one(ctx, criteria)
    }
}

impl<E: Entity> Store<E> for ProxyStore<E> {
    fn load(&mut self, ctx: &Context, remote: Arc<dyn Repository<E>>) -> CoreResult<()> {
        ProxyStore::load(self, ctx, remote)
    }

    fn refresh(&self, ctx: &Context) -> CoreResult<RefreshReport> {
        ProxyStore::refresh(self, ctx)
    }

    fn set_hydrate(&mut self, hydrate: HydrateFn<E>) {
        self.hydrate = Some(hydrate);
    }

    fn attach(&self, event: StoreEvent, observer: ObserverHandle<E>) -> CoreResult<()> {
        self.notifier.attach(event.as_str(), observer)
    }
}
