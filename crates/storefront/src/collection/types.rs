use serde::Serialize;
use uuid::Uuid;

/// How a collection was populated when it was opened or reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum LoadStatus {
    /// No snapshot existed.
    Fresh,
    /// A snapshot was read. `dropped` counts entries discarded as malformed,
    /// invalid, or duplicated.
    Restored { dropped: usize },
    /// The store could not be read; the collection starts empty.
    Unavailable,
    /// The snapshot was not a JSON array; the collection starts empty and the
    /// next write replaces it.
    Corrupt,
}

/// Identifies one state of one collection instance.
///
/// A freshly opened container gets a new `instance`; each mutation bumps
/// `revision`. Derived views recompute when this value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionVersion {
    pub instance: Uuid,
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A record with the same id is already present; nothing changed.
    Duplicate,
    /// The record failed validation; nothing changed.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The patch left the record invalid, so it was removed instead.
    Removed,
    NotFound,
    /// The patch tried to change the record id; nothing changed.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
    Rejected,
}
