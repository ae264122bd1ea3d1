//! Never-failing facade over a [`KvBackend`].

use std::fmt;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::memory::MemoryBackend;
use super::traits::KvBackend;
use super::types::{Lookup, WriteOutcome};

/// Reserved key used by the availability probe.
pub const PROBE_KEY: &str = "__storage_probe__";

/// Storage adapter with the `get / set / remove / clear / is_available`
/// contract.
///
/// Every operation runs the availability probe first. No operation returns an
/// error or panics: failures are logged and reported as [`Lookup`] or
/// [`WriteOutcome`] values.
pub struct StorageAdapter {
    backend: Mutex<Box<dyn KvBackend>>,
    name: &'static str,
}

impl fmt::Debug for StorageAdapter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StorageAdapter")
            .field("backend", &self.name)
            .finish()
    }
}

impl StorageAdapter {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn KvBackend>) -> Self {
        let name = backend.name();
        Self {
            backend: Mutex::new(backend),
            name,
        }
    }

    /// Adapter over an empty [`MemoryBackend`].
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn backend_name(&self) -> &'static str {
        self.name
    }

    /// Write/delete probe. Any failure means the store is unusable.
    pub fn is_available(&self) -> bool {
        let mut backend = self.backend.lock();
        Self::probe(backend.as_mut())
    }

    fn probe(backend: &mut dyn KvBackend) -> bool {
        if let Err(error) = backend.write(PROBE_KEY, "1") {
            tracing::debug!("{} storage probe write failed: {error}", backend.name());
            return false;
        }
        if let Err(error) = backend.remove(PROBE_KEY) {
            tracing::debug!("{} storage probe remove failed: {error}", backend.name());
            return false;
        }
        true
    }

    /// Read and deserialize the value under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        match self.get_raw(key) {
            Lookup::Found(text) => match serde_json::from_str(&text) {
                Ok(value) => Lookup::Found(value),
                Err(error) => {
                    tracing::warn!("discarding unreadable snapshot {key:?}: {error}");
                    Lookup::Corrupt
                }
            },
            Lookup::Missing => Lookup::Missing,
            Lookup::Unavailable => Lookup::Unavailable,
            Lookup::Corrupt => Lookup::Corrupt,
        }
    }

    /// Read the raw text under `key`.
    pub fn get_raw(&self, key: &str) -> Lookup<String> {
        let mut backend = self.backend.lock();
        if !Self::probe(backend.as_mut()) {
            return Lookup::Unavailable;
        }
        match backend.read(key) {
            Ok(Some(text)) => Lookup::Found(text),
            Ok(None) => Lookup::Missing,
            Err(error) => {
                tracing::warn!("{} storage read of {key:?} failed: {error}", self.name);
                Lookup::Unavailable
            }
        }
    }

    /// Serialize `value` as JSON and store it under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> WriteOutcome {
        match serde_json::to_string(value) {
            Ok(text) => self.set_raw(key, &text),
            Err(error) => {
                tracing::warn!("failed to serialize snapshot {key:?}: {error}");
                WriteOutcome::Failed
            }
        }
    }

    pub fn set_raw(&self, key: &str, text: &str) -> WriteOutcome {
        let mut backend = self.backend.lock();
        if !Self::probe(backend.as_mut()) {
            return WriteOutcome::Unavailable;
        }
        match backend.write(key, text) {
            Ok(()) => WriteOutcome::Written,
            Err(error) => {
                tracing::warn!("{} storage write of {key:?} failed: {error}", self.name);
                WriteOutcome::Failed
            }
        }
    }

    pub fn remove(&self, key: &str) -> WriteOutcome {
        let mut backend = self.backend.lock();
        if !Self::probe(backend.as_mut()) {
            return WriteOutcome::Unavailable;
        }
        match backend.remove(key) {
            Ok(()) => WriteOutcome::Written,
            Err(error) => {
                tracing::warn!("{} storage remove of {key:?} failed: {error}", self.name);
                WriteOutcome::Failed
            }
        }
    }

    pub fn clear(&self) -> WriteOutcome {
        let mut backend = self.backend.lock();
        if !Self::probe(backend.as_mut()) {
            return WriteOutcome::Unavailable;
        }
        match backend.clear() {
            Ok(()) => WriteOutcome::Written,
            Err(error) => {
                tracing::warn!("{} storage clear failed: {error}", self.name);
                WriteOutcome::Failed
            }
        }
    }

    /// Stored keys, sorted. Empty when the store is unavailable.
    pub fn keys(&self) -> Vec<String> {
        let mut backend = self.backend.lock();
        if !Self::probe(backend.as_mut()) {
            return Vec::new();
        }
        match backend.keys() {
            Ok(mut keys) => {
                keys.retain(|key| key != PROBE_KEY);
                keys.sort();
                keys
            }
            Err(error) => {
                tracing::warn!("{} storage key listing failed: {error}", self.name);
                Vec::new()
            }
        }
    }
}
