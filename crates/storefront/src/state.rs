//! Owned storefront state: one adapter, one bus and every container.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::bus::Bus;
use crate::cart::{Cart, CartAdd, CartSummary};
use crate::collection::LoadStatus;
use crate::config::StorefrontConfig;
use crate::error::{StorefrontError, StorefrontResult};
use crate::event::StoreEvent;
use crate::format::{format_currency, pluralize};
use crate::notifications::{NotificationCenter, NotificationKind};
use crate::orders::{Order, OrderBook};
use crate::session::UserSlot;
use crate::storage::{
    FileBackend, MemoryBackend, SharedStorage, SnapshotKeys, StorageAdapter, UnavailableBackend,
    WriteOutcome,
};
use crate::wishlist::{Wishlist, WishlistSummary};

/// Everything one storefront session needs, created by [`Storefront::open`]
/// and torn down by [`Storefront::close`].
///
/// Containers are public fields so callers can borrow two of them at once.
pub struct Storefront {
    pub config: StorefrontConfig,
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub orders: OrderBook,
    pub notifications: NotificationCenter,
    pub user: UserSlot,
    storage: SharedStorage,
    keys: SnapshotKeys,
    bus: Bus,
}

impl fmt::Debug for Storefront {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Storefront")
            .field("config", &self.config)
            .field("storage", &self.storage)
            .field("cart", &self.cart.items().len())
            .field("wishlist", &self.wishlist.count())
            .field("orders", &self.orders.count())
            .finish()
    }
}

/// Per-key load results, reported after opening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub cart: LoadStatus,
    pub wishlist: LoadStatus,
    pub orders: LoadStatus,
    pub notifications: LoadStatus,
}

/// What [`Storefront::close`] flushed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseReport {
    /// Collections whose last write had failed and were written again.
    pub retried: usize,
    /// Retries that still did not reach the store.
    pub failed: usize,
}

impl Storefront {
    /// Open on the file backend in the configured storage directory.
    ///
    /// With no resolvable directory the storefront still opens, on a backend
    /// that is never available.
    pub fn open(config: StorefrontConfig) -> StorefrontResult<Self> {
        validate_prefix(&config.key_prefix)?;
        let storage = match config.resolved_storage_dir() {
            Some(dir) => {
                tracing::info!("opening storefront snapshots in {}", dir.display());
                StorageAdapter::new(FileBackend::new(dir))
            }
            None => {
                tracing::warn!("no storage directory; storefront state will not persist");
                StorageAdapter::new(UnavailableBackend)
            }
        };
        Ok(Self::with_storage(config, Arc::new(storage)))
    }

    /// Open on a fresh [`MemoryBackend`]. Nothing outlives the value.
    pub fn in_memory(config: StorefrontConfig) -> Self {
        Self::with_storage(config, Arc::new(StorageAdapter::new(MemoryBackend::new())))
    }

    pub fn with_storage(config: StorefrontConfig, storage: SharedStorage) -> Self {
        let keys = SnapshotKeys::new(config.key_prefix.clone());
        let bus = Bus::default();
        if !storage.is_available() {
            tracing::warn!(
                "{} storage is unavailable; changes stay in memory",
                storage.backend_name()
            );
        }

        let cart = Cart::open(storage.clone(), keys.cart(), Some(bus.clone()));
        let wishlist = Wishlist::open(storage.clone(), keys.wishlist(), Some(bus.clone()));
        let orders = OrderBook::open(storage.clone(), keys.orders(), Some(bus.clone()));
        let notifications = NotificationCenter::open(
            storage.clone(),
            keys.notifications(),
            Some(bus.clone()),
            config.notifications.max_entries,
        );
        let user = UserSlot::open(storage.clone(), keys.user());

        let storefront = Self {
            config,
            cart,
            wishlist,
            orders,
            notifications,
            user,
            storage,
            keys,
            bus,
        };
        tracing::debug!("storefront loaded: {:?}", storefront.load_report());
        storefront
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn keys(&self) -> &SnapshotKeys {
        &self.keys
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.bus.subscribe()
    }

    pub fn load_report(&self) -> LoadReport {
        LoadReport {
            cart: self.cart.collection().load_status(),
            wishlist: self.wishlist.collection().load_status(),
            orders: self.orders.collection().load_status(),
            notifications: self.notifications.collection().load_status(),
        }
    }

    pub fn cart_summary(&self) -> CartSummary {
        self.cart.summary()
    }

    pub fn wishlist_summary(&self) -> WishlistSummary {
        self.wishlist.summary()
    }

    /// Format an amount with the configured currency.
    pub fn format_price(&self, amount: f64) -> String {
        format_currency(amount, &self.config.currency)
    }

    pub fn move_to_cart(&mut self, id: &str) -> Option<CartAdd> {
        self.wishlist.move_to_cart(id, &mut self.cart)
    }

    /// Place the cart as an order with the configured shipping fee and
    /// record it in the inbox.
    pub fn place_order(&mut self, note: Option<String>) -> Option<Order> {
        let shipping_fee = self.config.orders.default_shipping_fee;
        let order = self
            .orders
            .place_from_cart(&mut self.cart, shipping_fee, note)?;
        let message = format!(
            "{} for {}",
            pluralize(order.item_count() as usize, "item", "items"),
            self.format_price(order.total)
        );
        self.notifications.push(
            format!("Order #{} placed", order.short_id()),
            message,
            NotificationKind::Success,
        );
        Some(order)
    }

    /// Re-read every collection from storage.
    pub fn reload(&mut self) -> LoadReport {
        LoadReport {
            cart: self.cart.reload(),
            wishlist: self.wishlist.reload(),
            orders: self.orders.reload(),
            notifications: self.notifications.reload(),
        }
    }

    /// Retry any write that failed, then drop the state.
    pub fn close(mut self) -> CloseReport {
        let outcomes = [
            self.cart.flush(),
            self.wishlist.flush(),
            self.orders.flush(),
            self.notifications.flush(),
        ];
        let mut report = CloseReport::default();
        for outcome in outcomes.into_iter().flatten() {
            report.retried += 1;
            if outcome != WriteOutcome::Written {
                report.failed += 1;
            }
        }
        tracing::info!(
            "storefront closed: {} items in cart, {} saved, {} orders ({} retried, {} failed)",
            self.cart.total_quantity(),
            self.wishlist.count(),
            self.orders.count(),
            report.retried,
            report.failed
        );
        report
    }
}

fn validate_prefix(prefix: &str) -> StorefrontResult<()> {
    if prefix.contains('/') || prefix.contains('\\') {
        return Err(StorefrontError::InvalidInput(format!(
            "key prefix {prefix:?} must not contain path separators"
        )));
    }
    Ok(())
}
