//! Backend capability trait.

use crate::error::StorageResult;

/// A durable key-value store of UTF-8 text values.
///
/// Implementations report failures honestly; callers that must never fail go
/// through [`StorageAdapter`](super::StorageAdapter).
pub trait KvBackend: Send {
    /// Read the value stored under `key`. A missing key is `Ok(None)`.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Delete `key`. Deleting a missing key succeeds.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
    /// Delete every key.
    fn clear(&mut self) -> StorageResult<()>;
    /// All stored keys, in no particular order.
    fn keys(&self) -> StorageResult<Vec<String>>;
    /// Short backend name for log lines.
    fn name(&self) -> &'static str;
}
