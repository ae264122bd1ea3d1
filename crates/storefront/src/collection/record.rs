use serde::de::DeserializeOwned;
use serde::Serialize;

/// A domain item held in a [`PersistedCollection`](super::PersistedCollection).
///
/// Identity is the string id; the container keeps ids unique.
pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> &str;

    /// Display name used in notifications.
    fn label(&self) -> &str {
        self.id()
    }

    /// Whether the record may exist in a collection at all. Invalid records
    /// are refused on insert, removed on update, and dropped on load.
    fn is_valid(&self) -> bool {
        true
    }
}
