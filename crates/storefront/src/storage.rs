//! Durable key-value storage used to mirror in-memory collections.
//!
//! Backends implement [`KvBackend`] and may fail. The [`StorageAdapter`]
//! wraps one backend, gates every call on an availability probe, and turns
//! every failure into an explicit outcome value instead of an error.

pub mod adapter;
pub mod file;
pub mod keys;
pub mod memory;
pub mod slot;
pub mod traits;
pub mod types;
pub mod unavailable;

use std::sync::Arc;

pub use adapter::StorageAdapter;
pub use file::FileBackend;
pub use keys::SnapshotKeys;
pub use memory::MemoryBackend;
pub use slot::PersistedSlot;
pub use traits::KvBackend;
pub use types::{Lookup, WriteOutcome};
pub use unavailable::UnavailableBackend;

/// Storage adapter shared by every container of one storefront.
pub type SharedStorage = Arc<StorageAdapter>;
