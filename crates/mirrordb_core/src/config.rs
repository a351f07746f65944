//! Proxy store configuration.

use crate::entity::Entity;
use crate::memory::{LruPolicy, MemoryRepository, MruPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How [`crate::ProxyStore::refresh`] reconciles the local mirror with the
/// remote repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Refresh does nothing.
    #[default]
    None,
    /// Copy remote-only entities into the mirror; unload mirror-only ones.
    ReadAll,
    /// Write mirror-only entities back to the remote.
    WriteAll,
    /// Copy remote-only entities into the mirror and write mirror-only ones
    /// back to the remote.
    ReadWriteAll,
}

impl RefreshPolicy {
    /// All policies, in declaration order.
    pub const ALL: [RefreshPolicy; 4] = [
        RefreshPolicy::None,
        RefreshPolicy::ReadAll,
        RefreshPolicy::WriteAll,
        RefreshPolicy::ReadWriteAll,
    ];

    /// Returns the kebab-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            RefreshPolicy::None => "none",
            RefreshPolicy::ReadAll => "read-all",
            RefreshPolicy::WriteAll => "write-all",
            RefreshPolicy::ReadWriteAll => "read-write-all",
        }
    }

    /// Returns true if refresh copies remote entities into the mirror.
    pub const fn reads(self) -> bool {
        matches!(self, RefreshPolicy::ReadAll | RefreshPolicy::ReadWriteAll)
    }

    /// Returns true if refresh writes mirror entities back to the remote.
    pub const fn writes(self) -> bool {
        matches!(self, RefreshPolicy::WriteAll | RefreshPolicy::ReadWriteAll)
    }
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RefreshPolicy::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown refresh policy: {s}"))
    }
}

/// Admission policy of the local mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionConfig {
    /// No bound.
    #[default]
    Unbounded,
    /// Keep the most recently inserted `n` entities.
    Mru(usize),
    /// Keep the first `n` entities inserted; drop the rest.
    Lru(usize),
}

impl EvictionConfig {
    /// Builds an empty repository with this policy.
    pub(crate) fn build<E: Entity>(self) -> MemoryRepository<E> {
        let repo = MemoryRepository::default();
        match self {
            EvictionConfig::Unbounded => repo,
            EvictionConfig::Mru(capacity) => repo.with_policy(MruPolicy::new(capacity)),
            EvictionConfig::Lru(capacity) => repo.with_policy(LruPolicy::new(capacity)),
        }
    }
}

/// Configuration for a [`crate::ProxyStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Reconciliation performed by refresh.
    pub refresh_policy: RefreshPolicy,

    /// Admission policy of the local mirror created by load.
    pub cache_eviction: EvictionConfig,
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the refresh policy.
    #[must_use]
    pub const fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    /// Sets the local mirror's admission policy.
    #[must_use]
    pub const fn cache_eviction(mut self, eviction: EvictionConfig) -> Self {
        self.cache_eviction = eviction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.refresh_policy, RefreshPolicy::None);
        assert_eq!(config.cache_eviction, EvictionConfig::Unbounded);
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new()
            .refresh_policy(RefreshPolicy::ReadWriteAll)
            .cache_eviction(EvictionConfig::Mru(64));
        assert_eq!(config.refresh_policy, RefreshPolicy::ReadWriteAll);
        assert_eq!(config.cache_eviction, EvictionConfig::Mru(64));
    }

    #[test]
    fn policy_names() {
        for policy in RefreshPolicy::ALL {
            assert_eq!(policy.as_str().parse::<RefreshPolicy>(), Ok(policy));
            assert_eq!(
                serde_json::to_string(&policy).unwrap(),
                format!("\"{policy}\"")
            );
        }
        assert!("sometimes".parse::<RefreshPolicy>().is_err());
    }

    #[test]
    fn policy_capabilities() {
        assert!(!RefreshPolicy::None.reads() && !RefreshPolicy::None.writes());
        assert!(RefreshPolicy::ReadAll.reads() && !RefreshPolicy::ReadAll.writes());
        assert!(!RefreshPolicy::WriteAll.reads() && RefreshPolicy::WriteAll.writes());
        assert!(RefreshPolicy::ReadWriteAll.reads() && RefreshPolicy::ReadWriteAll.writes());
    }

    #[test]
    fn config_from_json() {
        let config: StoreConfig = serde_json::from_str(
            r#"{"refresh_policy": "read-all", "cache_eviction": {"lru": 10}}"#,
        )
        .unwrap();
        assert_eq!(config.refresh_policy, RefreshPolicy::ReadAll);
        assert_eq!(config.cache_eviction, EvictionConfig::Lru(10));

        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
    }
}
