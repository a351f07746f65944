//! Repository adapter over a document collection.

use crate::collection::{DocumentCollection, ID_KEY};
use crate::compiler::DocumentCompiler;
use crate::filter::{Doc, DocumentFilter};
use mirrordb_core::{
    Bootstrap, Context, CoreError, CoreResult, Criteria, Entity, EntityId, FieldMapping, Hook,
    Repository,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as Json;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, info, trace};

/// A [`Repository`] storing entities as JSON documents.
///
/// Entities are serialized with serde; their ID lives under `_id`. A
/// compound ID is looked up by matching each of its components against the
/// field it names. Criteria are compiled to [`DocumentFilter`]s through the
/// entity's [`FieldMapping`].
///
/// Every operation checks the [`Context`] first and fails with
/// [`CoreError::Cancelled`] or [`CoreError::DeadlineExceeded`].
pub struct DocumentRepository<E> {
    collection: DocumentCollection,
    compiler: DocumentCompiler,
    _entity: PhantomData<fn() -> E>,
}

impl<E> DocumentRepository<E>
where
    E: Entity + FieldMapping + Serialize + DeserializeOwned,
{
    /// Creates a repository over `collection`.
    pub fn new(collection: DocumentCollection) -> Self {
        Self {
            collection,
            compiler: DocumentCompiler,
            _entity: PhantomData,
        }
    }

    /// Returns the underlying collection.
    pub fn collection(&self) -> &DocumentCollection {
        &self.collection
    }

    fn encode(entity: &E) -> CoreResult<Doc> {
        match serde_json::to_value(entity)? {
            Json::Object(doc) => Ok(doc),
            other => Err(CoreError::backend(format!(
                "entity must serialize to an object, got {other}"
            ))),
        }
    }

    fn decode(doc: Doc) -> CoreResult<E> {
        let id = doc
            .get(ID_KEY)
            .and_then(Json::as_str)
            .map(EntityId::new)
            .unwrap_or_default();
        let mut entity: E = serde_json::from_value(Json::Object(doc))?;
        entity
            .set_id(id.clone())
            .map_err(|e| CoreError::identifier_assignment(id, e))?;
        Ok(entity)
    }

    fn compile(&self, criteria: &Criteria) -> CoreResult<DocumentFilter> {
        Ok(self.compiler.compile::<E>(criteria)?)
    }
}

impl<E> fmt::Debug for DocumentRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentRepository")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl<E> Repository<E> for DocumentRepository<E>
where
    E: Entity + FieldMapping + Serialize + DeserializeOwned,
{
    /// Runs `on_bootstrap` if the collection does not exist yet, then
    /// creates it.
    fn start(&self, ctx: &Context, on_bootstrap: Bootstrap<'_>) -> CoreResult<()> {
        ctx.check()?;
        if !self.collection.exists() {
            info!(collection = %self.collection.name(), "bootstrapping document collection");
            on_bootstrap(ctx)?;
        }
        self.collection.ensure_exists();
        Ok(())
    }

    fn create(&self, ctx: &Context, mut entity: E) -> CoreResult<E> {
        ctx.check()?;
        entity
            .pre_create()
            .map_err(|e| CoreError::pre_hook(Hook::PreCreate, e))?;

        let id = self.collection.insert_one(Self::encode(&entity)?)?;
        entity
            .set_id(id.clone())
            .map_err(|e| CoreError::identifier_assignment(id.clone(), e))?;

        debug!(collection = %self.collection.name(), id = %id, "document created");
        Ok(entity)
    }

    fn read(&self, ctx: &Context, id: &EntityId) -> CoreResult<E> {
        ctx.check()?;
        trace!(id = %id, "reading document");
        match self.collection.find_one(&DocumentFilter::id_selector(id)) {
            Some(doc) => Self::decode(doc),
            None => Err(CoreError::not_found(id)),
        }
    }

    fn read_all(&self, ctx: &Context) -> CoreResult<Vec<E>> {
        ctx.check()?;
        self.collection
            .find(&DocumentFilter::all())
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Runs the update hook on a copy of `entity` and sets its fields on
    /// the stored document. The caller's entity is not modified.
    fn update(&self, ctx: &Context, entity: &E) -> CoreResult<()> {
        ctx.check()?;
        let mut entity = entity.clone();
        entity
            .pre_update()
            .map_err(|e| CoreError::pre_hook(Hook::PreUpdate, e))?;

        let mut changes = Self::encode(&entity)?;
        changes.remove(ID_KEY);
        let matched = self
            .collection
            .update_one(&DocumentFilter::id_selector(entity.id()), changes);
        debug!(id = %entity.id(), matched, "document updated");
        Ok(())
    }

    fn delete(&self, ctx: &Context, entity: &E) -> CoreResult<()> {
        ctx.check()?;
        let matched = self
            .collection
            .delete_one(&DocumentFilter::id_selector(entity.id()));
        debug!(id = %entity.id(), matched, "document deleted");
        Ok(())
    }

    fn match_all(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<Vec<E>> {
        ctx.check()?;
        let filter = self.compile(criteria)?;
        trace!(kind = criteria.kind(), filter = %filter.to_json(), "matching documents");
        self.collection
            .find(&filter)
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    fn match_one(&self, ctx: &Context, criteria: &Criteria) -> CoreResult<E> {
        ctx.check()?;
        let filter = self.compile(criteria)?;
        match self.collection.find_one(&filter) {
            Some(doc) => Self::decode(doc),
            None => Err(CoreError::not_found(EntityId::empty())),
        }
    }
}
