//! Store lifecycle events.

use std::fmt;
use std::str::FromStr;

/// Lifecycle topics a [`crate::ProxyStore`] publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    /// An entity was created through the store.
    Added,
    /// An entity was updated through the store.
    Updated,
    /// An entity was deleted through the store.
    Deleted,
    /// An entity entered the local mirror from the remote.
    Loaded,
    /// An entity left the local mirror because the remote no longer has it.
    Unloaded,
}

impl StoreEvent {
    /// All events, in topic registration order.
    pub const ALL: [StoreEvent; 5] = [
        StoreEvent::Added,
        StoreEvent::Updated,
        StoreEvent::Deleted,
        StoreEvent::Loaded,
        StoreEvent::Unloaded,
    ];

    /// Returns the topic name.
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreEvent::Added => "added",
            StoreEvent::Updated => "updated",
            StoreEvent::Deleted => "deleted",
            StoreEvent::Loaded => "loaded",
            StoreEvent::Unloaded => "unloaded",
        }
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreEvent::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown store event: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_names() {
        let names: Vec<_> = StoreEvent::ALL.iter().map(|e| e.as_str()).collect();
        assert_eq!(names, ["added", "updated", "deleted", "loaded", "unloaded"]);
        for event in StoreEvent::ALL {
            assert_eq!(event.to_string().parse::<StoreEvent>(), Ok(event));
        }
        assert!("moved".parse::<StoreEvent>().is_err());
    }
}
