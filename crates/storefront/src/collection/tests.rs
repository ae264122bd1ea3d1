use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::tempdir;

use crate::bus::{drain, Bus};
use crate::event::StoreEvent;
use crate::storage::{
    FileBackend, MemoryBackend, StorageAdapter, UnavailableBackend, WriteOutcome,
};

use super::{AddOutcome, LoadStatus, PersistedCollection, Record, Toggled, UpdateOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    id: String,
    count: i32,
}

impl Record for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_valid(&self) -> bool {
        self.count >= 1
    }
}

fn item(id: &str) -> Item {
    Item {
        id: id.to_string(),
        count: 1,
    }
}

fn ids(collection: &PersistedCollection<Item>) -> Vec<&str> {
    collection.iter().map(|item| item.id.as_str()).collect()
}

fn memory() -> Arc<StorageAdapter> {
    Arc::new(StorageAdapter::memory())
}

#[test]
fn opens_fresh_when_nothing_is_stored() {
    let collection: PersistedCollection<Item> = PersistedCollection::open(memory(), "items", None);
    assert!(collection.is_empty());
    assert_eq!(collection.load_status(), LoadStatus::Fresh);
    assert_eq!(collection.last_write(), None);
}

#[test]
fn add_appends_in_insertion_order_and_refuses_duplicates() {
    let mut collection = PersistedCollection::open(memory(), "items", None);
    assert_eq!(collection.add(item("b")), AddOutcome::Added);
    assert_eq!(collection.add(item("a")), AddOutcome::Added);
    assert_eq!(collection.add(item("b")), AddOutcome::Duplicate);
    assert_eq!(ids(&collection), vec!["b", "a"]);
}

#[test]
fn add_refuses_invalid_records() {
    let mut collection = PersistedCollection::open(memory(), "items", None);
    let invalid = Item {
        id: "zero".to_string(),
        count: 0,
    };
    assert_eq!(collection.add(invalid), AddOutcome::Rejected);
    assert!(collection.is_empty());
    assert_eq!(collection.last_write(), None);
}

#[test]
fn size_tracks_adds_minus_matching_removes() {
    let mut collection = PersistedCollection::open(memory(), "items", None);
    let script = [
        ("add", "a"),
        ("add", "b"),
        ("remove", "zz"),
        ("add", "c"),
        ("remove", "a"),
        ("remove", "a"),
        ("add", "d"),
        ("remove", "b"),
    ];

    let mut adds = 0usize;
    let mut matched_removes = 0usize;
    for (op, id) in script {
        match op {
            "add" => {
                if collection.add(item(id)) == AddOutcome::Added {
                    adds += 1;
                }
            }
            _ => {
                if collection.remove(id).is_some() {
                    matched_removes += 1;
                }
            }
        }
        assert_eq!(collection.len(), adds - matched_removes);
    }
    assert_eq!(ids(&collection), vec!["c", "d"]);
}

#[test]
fn remove_missing_is_a_no_op_without_write() {
    let storage = memory();
    let mut collection: PersistedCollection<Item> =
        PersistedCollection::open(storage.clone(), "items", None);
    let before = collection.version();
    assert!(collection.remove("ghost").is_none());
    assert_eq!(collection.version(), before);
    assert!(storage.keys().is_empty());
}

#[test]
fn toggle_is_an_involution_on_membership() {
    let mut collection = PersistedCollection::open(memory(), "items", None);
    collection.add(item("a"));
    collection.add(item("b"));

    assert_eq!(collection.toggle(item("c")), Toggled::Added);
    assert_eq!(collection.toggle(item("c")), Toggled::Removed);
    assert_eq!(ids(&collection), vec!["a", "b"]);

    assert_eq!(collection.toggle(item("a")), Toggled::Removed);
    assert_eq!(ids(&collection), vec!["b"]);
    assert_eq!(collection.toggle(item("a")), Toggled::Added);
    // Membership restored, position is now the end.
    assert_eq!(ids(&collection), vec!["b", "a"]);
}

#[test]
fn update_replaces_or_removes_invalid() {
    let mut collection = PersistedCollection::open(memory(), "items", None);
    collection.add(item("a"));

    assert_eq!(collection.update("a", |it| it.count = 5), UpdateOutcome::Updated);
    assert_eq!(collection.find("a").map(|it| it.count), Some(5));

    assert_eq!(collection.update("a", |it| it.count = 0), UpdateOutcome::Removed);
    assert!(!collection.contains("a"));
    assert!(collection.iter().all(|it| it.count >= 1));

    assert_eq!(collection.update("a", |it| it.count = 2), UpdateOutcome::NotFound);
}

#[test]
fn update_cannot_change_identity() {
    let mut collection = PersistedCollection::open(memory(), "items", None);
    collection.add(item("a"));
    let outcome = collection.update("a", |it| it.id = "b".to_string());
    assert_eq!(outcome, UpdateOutcome::Rejected);
    assert_eq!(ids(&collection), vec!["a"]);
}

#[test]
fn persist_then_load_round_trips_in_order() {
    let storage = memory();
    let mut original = PersistedCollection::open(storage.clone(), "items", None);
    for (index, id) in ["x", "a", "m"].iter().enumerate() {
        original.add(Item {
            id: id.to_string(),
            count: index as i32 + 1,
        });
    }

    let reopened: PersistedCollection<Item> = PersistedCollection::open(storage, "items", None);
    assert_eq!(reopened.items(), original.items());
    assert_eq!(reopened.load_status(), LoadStatus::Restored { dropped: 0 });
}

#[test]
fn empty_collection_round_trips() {
    let storage = memory();
    let mut original: PersistedCollection<Item> =
        PersistedCollection::open(storage.clone(), "items", None);
    original.add(item("a"));
    original.clear();

    let reopened: PersistedCollection<Item> = PersistedCollection::open(storage, "items", None);
    assert!(reopened.is_empty());
    assert_eq!(reopened.load_status(), LoadStatus::Restored { dropped: 0 });
}

#[test]
fn corrupt_snapshot_opens_empty_and_is_replaced_on_write() {
    let storage = memory();
    storage.set_raw("items", "{\"oops\": true");
    let mut collection: PersistedCollection<Item> =
        PersistedCollection::open(storage.clone(), "items", None);
    assert!(collection.is_empty());
    assert_eq!(collection.load_status(), LoadStatus::Corrupt);

    collection.add(item("a"));
    let reopened: PersistedCollection<Item> = PersistedCollection::open(storage, "items", None);
    assert_eq!(ids(&reopened), vec!["a"]);
}

#[test]
fn load_drops_malformed_invalid_and_duplicate_entries() {
    let storage = memory();
    storage.set(
        "items",
        &json!([
            {"id": "a", "count": 1},
            {"id": "bad"},
            {"id": "zero", "count": 0},
            {"id": "a", "count": 9},
            {"id": "b", "count": 2}
        ]),
    );
    let collection: PersistedCollection<Item> = PersistedCollection::open(storage, "items", None);
    assert_eq!(ids(&collection), vec!["a", "b"]);
    assert_eq!(collection.find("a").map(|it| it.count), Some(1));
    assert_eq!(collection.load_status(), LoadStatus::Restored { dropped: 3 });
}

#[test]
fn unavailable_store_keeps_memory_authoritative() {
    let storage = Arc::new(StorageAdapter::new(UnavailableBackend));
    let mut collection = PersistedCollection::open(storage, "items", None);
    assert_eq!(collection.load_status(), LoadStatus::Unavailable);

    collection.add(item("a"));
    collection.add(item("b"));
    collection.remove("a");
    assert_eq!(ids(&collection), vec!["b"]);
    assert_eq!(collection.last_write(), Some(WriteOutcome::Unavailable));
}

#[test]
fn quota_failure_is_absorbed() {
    let storage = Arc::new(StorageAdapter::new(MemoryBackend::with_quota(120)));
    let mut collection = PersistedCollection::open(storage.clone(), "items", None);
    collection.add(item("a"));
    assert_eq!(collection.last_write(), Some(WriteOutcome::Written));

    for index in 0..10 {
        collection.add(item(&format!("long-identifier-{index}")));
    }
    assert_eq!(collection.len(), 11);
    assert_eq!(collection.last_write(), Some(WriteOutcome::Failed));

    // The last snapshot that fit is still what a fresh open sees.
    let reopened: PersistedCollection<Item> = PersistedCollection::open(storage, "items", None);
    assert!(reopened.len() < collection.len());
    assert_eq!(reopened.items()[0].id, "a");
}

#[test]
fn every_mutation_publishes_a_change_event() {
    let bus = Bus::new(16);
    let mut rx = bus.subscribe();
    let mut collection = PersistedCollection::open(memory(), "items", Some(bus));
    collection.add(item("a"));
    collection.update("a", |it| it.count = 3);
    collection.remove("missing");
    collection.clear();

    let revisions: Vec<u64> = drain(&mut rx)
        .into_iter()
        .map(|event| match event {
            StoreEvent::CollectionChanged(payload) => {
                assert_eq!(payload.key, "items");
                assert!(payload.persisted);
                payload.revision
            }
            StoreEvent::Toast(toast) => panic!("unexpected toast {toast:?}"),
        })
        .collect();
    assert_eq!(revisions, vec![1, 2, 3]);
}

#[test]
fn two_adapters_on_one_directory_are_last_write_wins() {
    let dir = tempdir().expect("tempdir");
    let tab_a = Arc::new(StorageAdapter::new(FileBackend::new(dir.path().to_path_buf())));
    let tab_b = Arc::new(StorageAdapter::new(FileBackend::new(dir.path().to_path_buf())));

    let mut first = PersistedCollection::open(tab_a, "items", None);
    let mut second = PersistedCollection::open(tab_b.clone(), "items", None);
    first.add(item("from-a"));
    second.add(item("from-b"));

    // The second writer never saw "from-a" and overwrote it.
    let observer: PersistedCollection<Item> = PersistedCollection::open(tab_b, "items", None);
    assert_eq!(ids(&observer), vec!["from-b"]);

    assert_eq!(first.reload(), LoadStatus::Restored { dropped: 0 });
    assert_eq!(ids(&first), vec!["from-b"]);
}

#[test]
fn reload_keeps_memory_when_snapshot_is_unreadable() {
    let storage = memory();
    let mut collection = PersistedCollection::open(storage.clone(), "items", None);
    collection.add(item("a"));
    storage.set_raw("items", "not json");

    assert_eq!(collection.reload(), LoadStatus::Corrupt);
    assert_eq!(ids(&collection), vec!["a"]);
}

#[test]
fn replace_all_and_retain() {
    let mut collection = PersistedCollection::open(memory(), "items", None);
    let dropped = collection.replace_all(vec![item("a"), item("b"), item("a"), item("c")]);
    assert_eq!(dropped, 1);
    assert_eq!(collection.retain(|it| it.id != "b"), 1);
    assert_eq!(collection.retain(|_| true), 0);
    assert_eq!(ids(&collection), vec!["a", "c"]);
}

#[test]
fn new_instance_gets_new_version_identity() {
    let storage = memory();
    let first: PersistedCollection<Item> = PersistedCollection::open(storage.clone(), "items", None);
    let second: PersistedCollection<Item> = PersistedCollection::open(storage, "items", None);
    assert_ne!(first.version(), second.version());
    assert_eq!(first.version().revision, 0);
}
