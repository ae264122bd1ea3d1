//! Wishlist: saved products, toggled on and off.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::cart::{Cart, CartAdd, CartItem};
use crate::collection::{AddOutcome, LoadStatus, PersistedCollection, Record, Toggled};
use crate::event::Toast;
use crate::storage::{SharedStorage, WriteOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub category: String,
}

impl WishlistItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            price,
            category: category.into(),
        }
    }

    /// A single-unit cart line for this product.
    pub fn to_cart_item(&self) -> CartItem {
        CartItem::new(&self.id, &self.name, &self.image, self.price, 1)
    }
}

impl Record for WishlistItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistSummary {
    pub item_count: usize,
    pub total: f64,
    pub is_empty: bool,
}

#[derive(Debug)]
pub struct Wishlist {
    items: PersistedCollection<WishlistItem>,
}

impl Wishlist {
    pub fn open(storage: SharedStorage, key: impl Into<String>, bus: Option<Bus>) -> Self {
        Self {
            items: PersistedCollection::open(storage, key, bus),
        }
    }

    pub fn collection(&self) -> &PersistedCollection<WishlistItem> {
        &self.items
    }

    pub fn flush(&mut self) -> Option<WriteOutcome> {
        self.items.flush()
    }

    pub fn reload(&mut self) -> LoadStatus {
        self.items.reload()
    }

    pub fn items(&self) -> &[WishlistItem] {
        self.items.items()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    pub fn find(&self, id: &str) -> Option<&WishlistItem> {
        self.items.find(id)
    }

    pub fn add_item(&mut self, item: WishlistItem) -> AddOutcome {
        let name = item.name.clone();
        let outcome = self.items.add(item);
        match outcome {
            AddOutcome::Added => self
                .items
                .notify(Toast::success(format!("{name} added to wishlist"))),
            AddOutcome::Duplicate => self
                .items
                .notify(Toast::info(format!("{name} is already in your wishlist"))),
            AddOutcome::Rejected => {}
        }
        outcome
    }

    pub fn remove_item(&mut self, id: &str) -> Option<WishlistItem> {
        let removed = self.items.remove(id)?;
        self.items.notify(Toast::info(format!(
            "{} removed from wishlist",
            removed.label()
        )));
        Some(removed)
    }

    /// Favorite / unfavorite in one step.
    pub fn toggle(&mut self, item: WishlistItem) -> Toggled {
        let name = item.name.clone();
        let toggled = self.items.toggle(item);
        match toggled {
            Toggled::Added => self
                .items
                .notify(Toast::success(format!("{name} added to wishlist"))),
            Toggled::Removed => self
                .items
                .notify(Toast::info(format!("{name} removed from wishlist"))),
            Toggled::Rejected => {}
        }
        toggled
    }

    pub fn clear(&mut self) -> usize {
        self.items.clear()
    }

    /// Add the product to `cart` with quantity one, then drop it from the
    /// wishlist.
    ///
    /// These are two separate writes to two snapshots. If the process dies
    /// between them the product ends up in both.
    pub fn move_to_cart(&mut self, id: &str, cart: &mut Cart) -> Option<CartAdd> {
        let item = self.items.find(id)?.to_cart_item();
        let added = cart.add_item(item);
        if added != CartAdd::Rejected {
            self.remove_item(id);
        }
        Some(added)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn summary(&self) -> WishlistSummary {
        summarize(self.items.items())
    }

    /// Items grouped by category, categories sorted, insertion order kept
    /// within a category.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&WishlistItem>> {
        let mut groups: BTreeMap<&str, Vec<&WishlistItem>> = BTreeMap::new();
        for item in self.items.iter() {
            groups.entry(item.category.as_str()).or_default().push(item);
        }
        groups
    }
}

fn summarize(items: &[WishlistItem]) -> WishlistSummary {
    WishlistSummary {
        item_count: items.len(),
        total: items.iter().map(|item| item.price).sum(),
        is_empty: items.is_empty(),
    }
}
