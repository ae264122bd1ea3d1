//! In-memory backend.

use std::collections::HashMap;

use crate::error::{StorageError, StorageResult};

use super::traits::KvBackend;

/// `HashMap` backed store.
///
/// An optional byte quota (sum of key and value lengths) makes writes fail
/// the way a full browser store does, and `set_disabled` makes every call
/// fail the way an absent store does.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: HashMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.data
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }

    fn check_enabled(&self) -> StorageResult<()> {
        if self.disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(())
    }
}

impl KvBackend for MemoryBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.check_enabled()?;
        Ok(self.data.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.check_enabled()?;
        if let Some(limit) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.check_enabled()?;
        self.data.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.check_enabled()?;
        self.data.clear();
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.check_enabled()?;
        Ok(self.data.keys().cloned().collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
