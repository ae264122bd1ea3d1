//! Local persisted collection container.
//!
//! A [`PersistedCollection`] owns one ordered collection of [`Record`]s,
//! loads it from a [`StorageAdapter`](crate::storage::StorageAdapter) snapshot
//! when opened, and writes the whole collection back after every mutation.

pub mod container;
pub mod record;
pub mod types;

#[cfg(test)]
mod tests;

pub use container::PersistedCollection;
pub use record::Record;
pub use types::{AddOutcome, CollectionVersion, LoadStatus, Toggled, UpdateOutcome};
