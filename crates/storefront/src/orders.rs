//! Orders placed from the cart, with a forward-only status lifecycle.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bus::Bus;
use crate::cart::{Cart, CartItem};
use crate::collection::{AddOutcome, LoadStatus, PersistedCollection, Record, UpdateOutcome};
use crate::event::Toast;
use crate::storage::{SharedStorage, WriteOutcome};
use crate::utils::time::now_rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether an order may move from `self` to `next`.
    ///
    /// Orders only move forward one step at a time; cancelling is possible
    /// until the order ships.
    pub fn can_become(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
        )
    }

    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub items: Vec<CartItem>,
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Order {
    fn from_lines(items: Vec<CartItem>, shipping_fee: f64, note: Option<String>) -> Self {
        let subtotal: f64 = items.iter().map(CartItem::line_total).sum();
        let now = now_rfc3339();
        Self {
            id: Uuid::now_v7().to_string(),
            items,
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
            status: OrderStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
            note,
        }
    }

    /// Last eight characters of the id, for display.
    pub fn short_id(&self) -> &str {
        let start = self.id.len().saturating_sub(8);
        self.id.get(start..).unwrap_or(&self.id)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

impl Record for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_valid(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.quantity >= 1)
    }
}

/// What [`OrderBook::update_status`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Changed,
    /// The order already had that status.
    Unchanged,
    /// The lifecycle does not allow this transition.
    Refused,
    NotFound,
}

#[derive(Debug)]
pub struct OrderBook {
    orders: PersistedCollection<Order>,
}

impl OrderBook {
    pub fn open(storage: SharedStorage, key: impl Into<String>, bus: Option<Bus>) -> Self {
        Self {
            orders: PersistedCollection::open(storage, key, bus),
        }
    }

    pub fn collection(&self) -> &PersistedCollection<Order> {
        &self.orders
    }

    pub fn flush(&mut self) -> Option<WriteOutcome> {
        self.orders.flush()
    }

    pub fn reload(&mut self) -> LoadStatus {
        self.orders.reload()
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.items()
    }

    pub fn find(&self, id: &str) -> Option<&Order> {
        self.orders.find(id)
    }

    /// Turn the cart into a pending order and empty the cart.
    ///
    /// The order is written before the cart is cleared; the two writes are
    /// independent. An empty cart places nothing.
    pub fn place_from_cart(
        &mut self,
        cart: &mut Cart,
        shipping_fee: f64,
        note: Option<String>,
    ) -> Option<Order> {
        if cart.items().is_empty() {
            return None;
        }
        let order = Order::from_lines(cart.items().to_vec(), shipping_fee, note);
        if self.orders.add(order.clone()) != AddOutcome::Added {
            tracing::warn!("order {} was not recorded", order.id);
            return None;
        }
        cart.clear();
        self.orders.notify(Toast::success(format!(
            "Order #{} placed",
            order.short_id()
        )));
        Some(order)
    }

    pub fn update_status(&mut self, id: &str, status: OrderStatus) -> StatusChange {
        let Some(current) = self.orders.find(id).map(|order| order.status) else {
            return StatusChange::NotFound;
        };
        if current == status {
            return StatusChange::Unchanged;
        }
        if !current.can_become(status) {
            tracing::debug!("refusing order {id} transition {current} -> {status}");
            return StatusChange::Refused;
        }
        let updated_at = now_rfc3339();
        match self.orders.update(id, |order| {
            order.status = status;
            order.updated_at = updated_at;
        }) {
            UpdateOutcome::Updated => StatusChange::Changed,
            _ => StatusChange::NotFound,
        }
    }

    pub fn cancel(&mut self, id: &str) -> StatusChange {
        let change = self.update_status(id, OrderStatus::Cancelled);
        if change == StatusChange::Changed {
            if let Some(order) = self.orders.find(id) {
                let message = format!("Order #{} cancelled", order.short_id());
                self.orders.notify(Toast::info(message));
            }
        }
        change
    }

    /// Up to `limit` orders, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&Order> {
        self.orders.iter().rev().take(limit).collect()
    }

    pub fn by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.status == status)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.orders.len()
    }

    /// Sum of totals over orders that were not cancelled.
    pub fn revenue(&self) -> f64 {
        self.orders
            .iter()
            .filter(|order| order.status != OrderStatus::Cancelled)
            .map(|order| order.total)
            .sum()
    }

    pub fn status_counts(&self) -> BTreeMap<OrderStatus, usize> {
        let mut counts = BTreeMap::new();
        for order in self.orders.iter() {
            *counts.entry(order.status).or_insert(0) += 1;
        }
        counts
    }
}
