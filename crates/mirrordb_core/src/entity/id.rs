//! Entity identifier.

use crate::error::CoreResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Opaque string identifier of an entity.
///
/// An empty ID means "unassigned". An ID may be **compound**: a JSON object
/// of sub-key to sub-ID (`{"tenant":"t1","code":"c9"}`) for backends that
/// address records by several key components. Equality is by string value.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the unassigned (empty) ID.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a new random ID (hyphenated UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Builds a compound ID from its components.
    ///
    /// Components are serialized in key order, so equal maps produce equal
    /// IDs.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the map cannot be encoded.
    pub fn from_compound(components: &BTreeMap<String, EntityId>) -> CoreResult<Self> {
        Ok(Self(serde_json::to_string(components)?))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ID is unassigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the ID is a brace-delimited JSON object of strings.
    pub fn is_compound(&self) -> bool {
        self.compound_ids().is_some()
    }

    /// Decomposes a compound ID into its components.
    ///
    /// Returns `None` for plain IDs.
    pub fn compound_ids(&self) -> Option<BTreeMap<String, EntityId>> {
        if !(self.0.starts_with('{') && self.0.ends_with('}')) {
            return None;
        }

        let components: BTreeMap<String, String> = serde_json::from_str(&self.0).ok()?;
        Some(
            components
                .into_iter()
                .map(|(key, id)| (key, EntityId(id)))
                .collect(),
        )
    }

    /// Consumes the ID, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({:?})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&EntityId> for EntityId {
    fn from(id: &EntityId) -> Self {
        id.clone()
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
