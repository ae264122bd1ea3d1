use crate::error::{StorageError, StorageResult};

use super::traits::KvBackend;

/// Backend for environments with no durable store at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl KvBackend for UnavailableBackend {
    fn read(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable)
    }

    fn write(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }

    fn remove(&mut self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }

    fn clear(&mut self) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Err(StorageError::Unavailable)
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
