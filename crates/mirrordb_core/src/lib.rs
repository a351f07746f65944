//! # MirrorDB Core
//!
//! Generic data access for arbitrary entity types.
//!
//! This crate provides:
//! - The [`Entity`] contract and [`EntityId`] (plain or compound)
//! - The [`Repository`] contract every backend adapter implements
//! - [`MemoryRepository`], a lock-guarded ordered collection with pluggable
//!   admission [`Policy`] and [`IdStrategy`]
//! - Observer-based notifiers ([`Notifier`], [`TopicNotifier`])
//! - [`ProxyStore`], a read-through/write-through cache pairing a remote
//!   repository with a local in-memory mirror
//!
//! ## Architecture
//!
//! ```text
//! caller ──► ProxyStore ──► remote Repository (source of truth)
//!                 │
//!                 ├──► MemoryRepository (local mirror, serves queries)
//!                 └──► TopicNotifier (added, updated, deleted, loaded, unloaded)
//! ```
//!
//! Writes go to the remote first, then the local mirror, then observers.
//! Reads are served locally and fall back to the remote on a miss.
//! [`ProxyStore::refresh`] reconciles the two according to the configured
//! [`RefreshPolicy`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
pub mod entity;
mod error;
pub mod memory;
pub mod notifier;
mod repository;
pub mod store;

pub use config::{EvictionConfig, RefreshPolicy, StoreConfig};
pub use context::Context;
pub use entity::{Entity, EntityId};
pub use error::{CoreError, CoreResult, Hook};
pub use memory::{IdStrategy, LruPolicy, MemoryRepository, MruPolicy, Policy, UuidStrategy};
pub use notifier::{Notifier, Observer, ObserverFn, ObserverHandle, TopicNotifier};
pub use repository::{Bootstrap, Repository};
pub use store::{HydrateFn, ProxyStore, RefreshReport, Store, StoreEvent};

pub use mirrordb_criteria::{
    Attr, Comparator, Criteria, CriteriaError, FieldDescriptor, FieldMapping, Record, Value,
};

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
