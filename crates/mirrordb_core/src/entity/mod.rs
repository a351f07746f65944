//! Entity contract and identifiers.

mod contract;
mod id;

pub use contract::{contains, Entity};
pub use id::EntityId;
