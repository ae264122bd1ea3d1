//! Single-object persisted slot (overwrite semantics).

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{Lookup, WriteOutcome};
use super::SharedStorage;

/// One persisted value under a fixed key, e.g. the signed-in user.
///
/// The in-memory copy is authoritative once loaded; storage failures only
/// cost durability.
#[derive(Debug)]
pub struct PersistedSlot<T> {
    storage: SharedStorage,
    key: String,
    value: Option<T>,
}

impl<T> PersistedSlot<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn open(storage: SharedStorage, key: impl Into<String>) -> Self {
        let key = key.into();
        let value = match storage.get::<T>(&key) {
            Lookup::Found(value) => Some(value),
            Lookup::Corrupt => {
                tracing::warn!("slot {key:?} held an unreadable value, starting empty");
                None
            }
            Lookup::Missing | Lookup::Unavailable => None,
        };
        Self {
            storage,
            key,
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Replace the stored value.
    pub fn set(&mut self, value: T) -> WriteOutcome {
        let outcome = self.storage.set(&self.key, &value);
        self.value = Some(value);
        outcome
    }

    /// Drop the value and its snapshot. Returns the previous value.
    pub fn clear(&mut self) -> Option<T> {
        self.storage.remove(&self.key);
        self.value.take()
    }
}
