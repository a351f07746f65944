//! In-memory repository.
//!
//! [`MemoryRepository`] keeps entities in insertion order behind a mutex.
//! Admission on create goes through an optional [`Policy`]: [`MruPolicy`]
//! keeps the most recently inserted entities, [`LruPolicy`] keeps the first
//! ones and silently drops the rest. IDs come from an optional
//! [`IdStrategy`], or a random UUID when the entity has none.

mod id_strategy;
mod policy;
mod repository;

pub use id_strategy::{IdStrategy, UuidStrategy};
pub use policy::{LruPolicy, MruPolicy, Policy};
pub use repository::MemoryRepository;
