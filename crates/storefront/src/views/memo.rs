use parking_lot::Mutex;

use crate::collection::CollectionVersion;

/// One cached value, valid for exactly one [`CollectionVersion`].
#[derive(Debug)]
pub struct Memo<T> {
    slot: Mutex<Option<(CollectionVersion, T)>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `version`, computing it on a miss.
    pub fn get_or_compute(&self, version: CollectionVersion, compute: impl FnOnce() -> T) -> T {
        let mut slot = self.slot.lock();
        if let Some((cached_version, value)) = slot.as_ref() {
            if *cached_version == version {
                return value.clone();
            }
        }
        let value = compute();
        *slot = Some((version, value.clone()));
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use uuid::Uuid;

    fn version(instance: Uuid, revision: u64) -> CollectionVersion {
        CollectionVersion { instance, revision }
    }

    #[test]
    fn recomputes_only_when_version_changes() {
        let memo = Memo::new();
        let calls = Cell::new(0);
        let instance = Uuid::new_v4();
        let compute = || {
            calls.set(calls.get() + 1);
            calls.get() * 10
        };

        assert_eq!(memo.get_or_compute(version(instance, 1), compute), 10);
        assert_eq!(memo.get_or_compute(version(instance, 1), compute), 10);
        assert_eq!(calls.get(), 1);

        assert_eq!(memo.get_or_compute(version(instance, 2), compute), 20);
        assert_eq!(memo.get_or_compute(version(Uuid::new_v4(), 2), compute), 30);
        assert_eq!(calls.get(), 3);
    }
}
