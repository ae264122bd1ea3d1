use serde::Serialize;

use crate::storage::WriteOutcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum StoreEvent {
    CollectionChanged(CollectionChangedPayload),
    Toast(Toast),
}

/// Emitted after every in-memory mutation of a persisted collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionChangedPayload {
    pub key: String,
    pub revision: u64,
    pub len: usize,
    pub persisted: bool,
}

impl CollectionChangedPayload {
    pub fn new(key: &str, revision: u64, len: usize, outcome: WriteOutcome) -> Self {
        Self {
            key: key.to_string(),
            revision,
            len,
            persisted: outcome.is_written(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

/// User-facing feedback for a successful user-initiated change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }
}
