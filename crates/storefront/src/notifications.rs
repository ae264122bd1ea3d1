//! Persisted notification inbox.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bus::Bus;
use crate::collection::{LoadStatus, PersistedCollection, Record, UpdateOutcome};
use crate::storage::{SharedStorage, WriteOutcome};
use crate::utils::time::now_rfc3339;

pub const DEFAULT_MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: String,
}

impl Record for Notification {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }
}

/// Bounded inbox; the oldest entries are dropped once `max_entries` is
/// reached.
#[derive(Debug)]
pub struct NotificationCenter {
    entries: PersistedCollection<Notification>,
    max_entries: usize,
}

impl NotificationCenter {
    pub fn open(
        storage: SharedStorage,
        key: impl Into<String>,
        bus: Option<Bus>,
        max_entries: usize,
    ) -> Self {
        let mut center = Self {
            entries: PersistedCollection::open(storage, key, bus),
            max_entries: max_entries.max(1),
        };
        center.enforce_bound();
        center
    }

    /// Drop the oldest entries beyond `max_entries`. Returns how many.
    fn enforce_bound(&mut self) -> usize {
        if self.entries.len() <= self.max_entries {
            return 0;
        }
        let overflow = self.entries.len() - self.max_entries;
        let kept = self.entries.items()[overflow..].to_vec();
        self.entries.replace_all(kept);
        overflow
    }

    pub fn collection(&self) -> &PersistedCollection<Notification> {
        &self.entries
    }

    pub fn flush(&mut self) -> Option<WriteOutcome> {
        self.entries.flush()
    }

    /// Re-read the inbox; a snapshot from a writer with a larger bound is
    /// trimmed to this one.
    pub fn reload(&mut self) -> LoadStatus {
        let status = self.entries.reload();
        let trimmed = self.enforce_bound();
        if trimmed > 0 {
            tracing::debug!("trimmed {trimmed} notifications beyond the bound of {}", self.max_entries);
        }
        status
    }

    pub fn entries(&self) -> &[Notification] {
        self.entries.items()
    }

    pub fn push(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: now_rfc3339(),
        };

        if self.entries.len() >= self.max_entries {
            let overflow = self.entries.len() + 1 - self.max_entries;
            let mut kept = self.entries.items()[overflow..].to_vec();
            kept.push(notification.clone());
            self.entries.replace_all(kept);
        } else {
            self.entries.add(notification.clone());
        }
        notification
    }

    pub fn mark_read(&mut self, id: &str) -> UpdateOutcome {
        self.entries.update(id, |entry| entry.read = true)
    }

    /// Returns how many entries changed.
    pub fn mark_all_read(&mut self) -> usize {
        let unread = self.unread_count();
        if unread == 0 {
            return 0;
        }
        let entries = self
            .entries
            .iter()
            .cloned()
            .map(|mut entry| {
                entry.read = true;
                entry
            })
            .collect();
        self.entries.replace_all(entries);
        unread
    }

    pub fn dismiss(&mut self, id: &str) -> Option<Notification> {
        self.entries.remove(id)
    }

    pub fn clear(&mut self) -> usize {
        self.entries.clear()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.read).count()
    }

    pub fn unread(&self) -> Vec<&Notification> {
        self.entries.iter().filter(|entry| !entry.read).collect()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.items().last()
    }
}
