use tokio::sync::broadcast;

use crate::event::{StoreEvent, Toast};

pub const DEFAULT_BUS_CAPACITY: usize = 64;

#[derive(Clone, Debug)]
pub struct Bus {
    sender: broadcast::Sender<StoreEvent>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Publish to current subscribers. Returns how many received it; having
    /// none is not an error.
    pub fn publish(&self, event: StoreEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn toast(&self, toast: Toast) -> usize {
        self.publish(StoreEvent::Toast(toast))
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// Drain every event currently queued for `rx`.
pub fn drain(rx: &mut broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}

/// Drain only the toasts currently queued for `rx`.
pub fn drain_toasts(rx: &mut broadcast::Receiver<StoreEvent>) -> Vec<Toast> {
    drain(rx)
        .into_iter()
        .filter_map(|event| match event {
            StoreEvent::Toast(toast) => Some(toast),
            StoreEvent::CollectionChanged(_) => None,
        })
        .collect()
}
