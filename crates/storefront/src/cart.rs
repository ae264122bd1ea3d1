//! Shopping cart: quantities per product, minimum quantity one.

use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::collection::{AddOutcome, LoadStatus, PersistedCollection, Record, UpdateOutcome};
use crate::event::Toast;
use crate::storage::{SharedStorage, WriteOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            price,
            quantity,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

impl Record for CartItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn is_valid(&self) -> bool {
        self.quantity >= 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: u32,
    pub total: f64,
    pub is_empty: bool,
}

/// What [`Cart::add_item`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAdd {
    /// New line appended.
    Added,
    /// The product was already in the cart; its quantity grew to this value.
    Increased(u32),
    /// Quantity zero; nothing changed.
    Rejected,
}

#[derive(Debug)]
pub struct Cart {
    items: PersistedCollection<CartItem>,
}

impl Cart {
    pub fn open(storage: SharedStorage, key: impl Into<String>, bus: Option<Bus>) -> Self {
        Self {
            items: PersistedCollection::open(storage, key, bus),
        }
    }

    pub fn collection(&self) -> &PersistedCollection<CartItem> {
        &self.items
    }

    pub fn flush(&mut self) -> Option<WriteOutcome> {
        self.items.flush()
    }

    pub fn reload(&mut self) -> LoadStatus {
        self.items.reload()
    }

    pub fn items(&self) -> &[CartItem] {
        self.items.items()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    pub fn find(&self, id: &str) -> Option<&CartItem> {
        self.items.find(id)
    }

    pub fn quantity_of(&self, id: &str) -> u32 {
        self.items.find(id).map(|item| item.quantity).unwrap_or(0)
    }

    /// Add a product. A product already in the cart has its quantity raised
    /// by `item.quantity` instead of getting a second line.
    pub fn add_item(&mut self, item: CartItem) -> CartAdd {
        if item.quantity == 0 {
            return CartAdd::Rejected;
        }
        let name = item.name.clone();
        if let Some(existing) = self.items.find(&item.id) {
            let quantity = existing.quantity.saturating_add(item.quantity);
            self.items.update(&item.id, |line| line.quantity = quantity);
            self.items
                .notify(Toast::success(format!("Updated {name} quantity to {quantity}")));
            return CartAdd::Increased(quantity);
        }
        match self.items.add(item) {
            AddOutcome::Added => {
                self.items
                    .notify(Toast::success(format!("{name} added to cart")));
                CartAdd::Added
            }
            AddOutcome::Duplicate | AddOutcome::Rejected => CartAdd::Rejected,
        }
    }

    /// Remove a line and report it to the user.
    pub fn remove_item(&mut self, id: &str) -> Option<CartItem> {
        let removed = self.items.remove(id)?;
        self.items.notify(Toast::info(format!(
            "{} removed from cart",
            removed.label()
        )));
        Some(removed)
    }

    pub fn increment(&mut self, id: &str) -> UpdateOutcome {
        self.items
            .update(id, |line| line.quantity = line.quantity.saturating_add(1))
    }

    /// Lower the quantity by one; a line at quantity one is removed.
    pub fn decrement(&mut self, id: &str) -> UpdateOutcome {
        self.items
            .update(id, |line| line.quantity = line.quantity.saturating_sub(1))
    }

    /// Set an exact quantity; zero removes the line.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> UpdateOutcome {
        self.items.update(id, |line| line.quantity = quantity)
    }

    pub fn clear(&mut self) -> usize {
        self.items.clear()
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_quantity() == 0
    }

    pub fn summary(&self) -> CartSummary {
        summarize(self.items.items())
    }
}

fn summarize(items: &[CartItem]) -> CartSummary {
    let item_count: u32 = items.iter().map(|item| item.quantity).sum();
    CartSummary {
        item_count,
        total: items.iter().map(CartItem::line_total).sum(),
        is_empty: item_count == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::drain_toasts;
    use crate::storage::StorageAdapter;
    use std::sync::Arc;

    fn product(id: &str, price: f64) -> CartItem {
        CartItem::new(id, format!("Product {id}"), format!("/img/{id}.png"), price, 1)
    }

    fn open_cart() -> Cart {
        Cart::open(Arc::new(StorageAdapter::memory()), "cart", None)
    }

    #[test]
    fn adding_same_product_twice_increments_quantity() {
        let mut cart = open_cart();
        assert_eq!(cart.add_item(product("p1", 10.0)), CartAdd::Added);
        assert_eq!(cart.add_item(product("p1", 10.0)), CartAdd::Increased(2));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of("p1"), 2);
        assert_eq!(cart.total_price(), 20.0);
    }

    #[test]
    fn decrement_at_one_removes_line() {
        let mut cart = open_cart();
        cart.add_item(product("p1", 5.0));
        cart.set_quantity("p1", 3);

        assert_eq!(cart.decrement("p1"), UpdateOutcome::Updated);
        assert_eq!(cart.quantity_of("p1"), 2);
        assert_eq!(cart.decrement("p1"), UpdateOutcome::Updated);
        assert_eq!(cart.quantity_of("p1"), 1);
        assert_eq!(cart.decrement("p1"), UpdateOutcome::Removed);
        assert!(!cart.contains("p1"));
        assert_eq!(cart.decrement("p1"), UpdateOutcome::NotFound);
    }

    #[test]
    fn set_quantity_zero_removes_line() {
        let mut cart = open_cart();
        cart.add_item(product("p1", 5.0));
        cart.add_item(product("p2", 7.5));
        assert_eq!(cart.set_quantity("p1", 0), UpdateOutcome::Removed);
        assert_eq!(cart.items().iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), ["p2"]);
        assert!(cart.items().iter().all(|item| item.quantity >= 1));
    }

    #[test]
    fn zero_quantity_add_is_rejected() {
        let mut cart = open_cart();
        let mut item = product("p1", 1.0);
        item.quantity = 0;
        assert_eq!(cart.add_item(item), CartAdd::Rejected);
        assert!(cart.is_empty());
    }

    #[test]
    fn summary_sums_quantities_and_prices() {
        let mut cart = open_cart();
        cart.add_item(product("p1", 10.0));
        cart.add_item(product("p2", 2.5));
        cart.increment("p2");
        cart.increment("p2");

        let summary = cart.summary();
        assert_eq!(summary.item_count, 4);
        assert_eq!(summary.total, 17.5);
        assert!(!summary.is_empty);

        cart.clear();
        assert_eq!(
            cart.summary(),
            CartSummary {
                item_count: 0,
                total: 0.0,
                is_empty: true
            }
        );
    }

    #[test]
    fn user_actions_emit_toasts() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let mut cart = Cart::open(Arc::new(StorageAdapter::memory()), "cart", Some(bus));

        cart.add_item(product("p1", 10.0));
        cart.add_item(product("p1", 10.0));
        cart.increment("p1");
        cart.remove_item("p1");
        cart.remove_item("p1");

        let messages: Vec<String> = drain_toasts(&mut rx)
            .into_iter()
            .map(|toast| toast.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Product p1 added to cart",
                "Updated Product p1 quantity to 2",
                "Product p1 removed from cart",
            ]
        );
    }

    #[test]
    fn cart_json_shape_matches_snapshot_format() {
        let item = CartItem::new("p1", "Mug", "/img/mug.png", 12.5, 2);
        let value = serde_json::to_value(&item).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "p1",
                "name": "Mug",
                "image": "/img/mug.png",
                "price": 12.5,
                "quantity": 2
            })
        );
    }
}
