use std::collections::HashSet;

use uuid::Uuid;

use crate::bus::Bus;
use crate::event::{CollectionChangedPayload, StoreEvent, Toast};
use crate::storage::{Lookup, SharedStorage, WriteOutcome};

use super::record::Record;
use super::types::{AddOutcome, CollectionVersion, LoadStatus, Toggled, UpdateOutcome};

/// An ordered collection of records mirrored to one storage key.
///
/// Mutations take `&mut self` and are applied in call order. Each one updates
/// memory first, then writes the full collection. A failed write is logged
/// and remembered in [`last_write`](Self::last_write) but never surfaced as an
/// error; memory stays authoritative for the rest of the process.
///
/// Two processes sharing a key overwrite each other (last write wins);
/// [`reload`](Self::reload) picks up whatever was written last.
#[derive(Debug)]
pub struct PersistedCollection<R> {
    storage: SharedStorage,
    bus: Option<Bus>,
    key: String,
    items: Vec<R>,
    instance: Uuid,
    revision: u64,
    load_status: LoadStatus,
    last_write: Option<WriteOutcome>,
}

impl<R: Record> PersistedCollection<R> {
    /// Open the collection stored under `key`, starting empty when there is
    /// no readable snapshot.
    pub fn open(storage: SharedStorage, key: impl Into<String>, bus: Option<Bus>) -> Self {
        let key = key.into();
        let (items, load_status) = load_snapshot(&storage, &key);
        tracing::debug!(
            "opened collection {key:?} with {} records ({load_status:?})",
            items.len()
        );
        Self {
            storage,
            bus,
            key,
            items,
            instance: Uuid::new_v4(),
            revision: 0,
            load_status,
            last_write: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> CollectionVersion {
        CollectionVersion {
            instance: self.instance,
            revision: self.revision,
        }
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    /// Outcome of the most recent write, `None` before the first mutation.
    pub fn last_write(&self) -> Option<WriteOutcome> {
        self.last_write
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Append a record. Ids are unique: a duplicate is refused.
    pub fn add(&mut self, record: R) -> AddOutcome {
        if !record.is_valid() {
            tracing::debug!("refusing invalid record {:?} in {:?}", record.id(), self.key);
            return AddOutcome::Rejected;
        }
        if self.contains(record.id()) {
            return AddOutcome::Duplicate;
        }
        self.items.push(record);
        self.commit();
        AddOutcome::Added
    }

    /// Remove the record with `id`. A missing id changes nothing and writes
    /// nothing.
    pub fn remove(&mut self, id: &str) -> Option<R> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        self.commit();
        Some(removed)
    }

    /// Patch the record with `id`.
    ///
    /// The patch runs on a copy. A copy that is no longer valid is never
    /// stored; the original is removed instead.
    pub fn update(&mut self, id: &str, patch: impl FnOnce(&mut R)) -> UpdateOutcome {
        let Some(index) = self.position(id) else {
            return UpdateOutcome::NotFound;
        };
        let mut patched = self.items[index].clone();
        patch(&mut patched);
        if patched.id() != id {
            return UpdateOutcome::Rejected;
        }
        if !patched.is_valid() {
            self.remove(id);
            return UpdateOutcome::Removed;
        }
        self.items[index] = patched;
        self.commit();
        UpdateOutcome::Updated
    }

    /// Remove `record` if an entry with its id is present, otherwise add it.
    pub fn toggle(&mut self, record: R) -> Toggled {
        if self.remove(record.id()).is_some() {
            return Toggled::Removed;
        }
        match self.add(record) {
            AddOutcome::Added => Toggled::Added,
            AddOutcome::Duplicate | AddOutcome::Rejected => Toggled::Rejected,
        }
    }

    /// Empty the collection and write an empty snapshot. Returns how many
    /// records were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        self.commit();
        dropped
    }

    /// Replace the whole collection. Invalid and duplicate records are
    /// dropped; returns how many.
    pub fn replace_all(&mut self, items: Vec<R>) -> usize {
        let (items, dropped) = sanitize(&self.key, items);
        self.items = items;
        self.commit();
        dropped
    }

    /// Keep only records matching `keep`. Returns how many were removed; no
    /// write happens when nothing matched.
    pub fn retain(&mut self, keep: impl FnMut(&R) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(keep);
        let removed = before - self.items.len();
        if removed > 0 {
            self.commit();
        }
        removed
    }

    /// Re-read the snapshot, discarding in-memory state.
    ///
    /// Only a readable snapshot replaces memory; when the store is
    /// unavailable or corrupt the current records are kept.
    pub fn reload(&mut self) -> LoadStatus {
        let (items, status) = load_snapshot(&self.storage, &self.key);
        match status {
            LoadStatus::Fresh | LoadStatus::Restored { .. } => {
                self.items = items;
                self.revision += 1;
                self.publish_changed(WriteOutcome::Written);
            }
            LoadStatus::Unavailable | LoadStatus::Corrupt => {}
        }
        self.load_status = status;
        status
    }

    /// Write the current collection without mutating it.
    pub fn persist(&mut self) -> WriteOutcome {
        let outcome = self.storage.set(&self.key, &self.items);
        self.last_write = Some(outcome);
        outcome
    }

    /// Whether the last write did not reach the store.
    pub fn is_dirty(&self) -> bool {
        self.last_write.is_some_and(|outcome| !outcome.is_written())
    }

    /// Retry the write if the last one failed.
    pub fn flush(&mut self) -> Option<WriteOutcome> {
        if self.is_dirty() {
            Some(self.persist())
        } else {
            None
        }
    }

    /// Publish a user-facing notification, if a bus is attached.
    pub fn notify(&self, toast: Toast) {
        if let Some(bus) = &self.bus {
            bus.toast(toast);
        }
    }

    fn commit(&mut self) {
        self.revision += 1;
        let outcome = self.persist();
        if !outcome.is_written() {
            tracing::debug!(
                "collection {:?} revision {} kept in memory only ({outcome:?})",
                self.key,
                self.revision
            );
        }
        self.publish_changed(outcome);
    }

    fn publish_changed(&self, outcome: WriteOutcome) {
        if let Some(bus) = &self.bus {
            bus.publish(StoreEvent::CollectionChanged(CollectionChangedPayload::new(
                &self.key,
                self.revision,
                self.items.len(),
                outcome,
            )));
        }
    }
}

fn load_snapshot<R: Record>(storage: &SharedStorage, key: &str) -> (Vec<R>, LoadStatus) {
    let entries = match storage.get::<Vec<serde_json::Value>>(key) {
        Lookup::Found(entries) => entries,
        Lookup::Missing => return (Vec::new(), LoadStatus::Fresh),
        Lookup::Unavailable => return (Vec::new(), LoadStatus::Unavailable),
        Lookup::Corrupt => return (Vec::new(), LoadStatus::Corrupt),
    };

    let total = entries.len();
    let mut decoded = Vec::with_capacity(total);
    for entry in entries {
        match serde_json::from_value::<R>(entry) {
            Ok(record) => decoded.push(record),
            Err(error) => tracing::warn!("skipping malformed record in {key:?}: {error}"),
        }
    }
    let (items, _) = sanitize(key, decoded);
    let dropped = total - items.len();
    (items, LoadStatus::Restored { dropped })
}

fn sanitize<R: Record>(key: &str, items: Vec<R>) -> (Vec<R>, usize) {
    let before = items.len();
    let mut seen = HashSet::new();
    let kept: Vec<R> = items
        .into_iter()
        .filter(|item| {
            if !item.is_valid() {
                tracing::warn!("dropping invalid record {:?} in {key:?}", item.id());
                return false;
            }
            if !seen.insert(item.id().to_string()) {
                tracing::warn!("dropping duplicate record {:?} in {key:?}", item.id());
                return false;
            }
            true
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
