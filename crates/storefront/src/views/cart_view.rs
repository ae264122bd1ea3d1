use crate::cart::{Cart, CartSummary};
use crate::views::memo::Memo;

/// Memoized totals for a [`Cart`].
///
/// The sums are cached per collection version; `summary` is assembled from
/// them on every call.
#[derive(Debug, Default)]
pub struct CartView {
    count: Memo<u32>,
    value: Memo<f64>,
}

impl CartView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of quantities.
    pub fn total_count(&self, cart: &Cart) -> u32 {
        self.count
            .get_or_compute(cart.collection().version(), || cart.total_quantity())
    }

    /// Sum of `price × quantity`.
    pub fn total_value(&self, cart: &Cart) -> f64 {
        self.value
            .get_or_compute(cart.collection().version(), || cart.total_price())
    }

    pub fn is_empty(&self, cart: &Cart) -> bool {
        self.total_count(cart) == 0
    }

    pub fn summary(&self, cart: &Cart) -> CartSummary {
        let item_count = self.total_count(cart);
        CartSummary {
            item_count,
            total: self.total_value(cart),
            is_empty: item_count == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::storage::StorageAdapter;
    use std::sync::Arc;

    #[test]
    fn follows_cart_mutations() {
        let mut cart = Cart::open(Arc::new(StorageAdapter::memory()), "cart", None);
        let view = CartView::new();
        assert!(view.is_empty(&cart));

        cart.add_item(CartItem::new("p1", "Mug", "", 10.0, 1));
        cart.add_item(CartItem::new("p1", "Mug", "", 10.0, 1));
        assert_eq!(view.total_count(&cart), 2);
        assert_eq!(view.total_value(&cart), 20.0);

        cart.decrement("p1");
        assert_eq!(view.summary(&cart), cart.summary());
        assert_eq!(view.total_count(&cart), 1);
    }

    #[test]
    fn view_is_not_confused_by_a_different_cart() {
        let mut first = Cart::open(Arc::new(StorageAdapter::memory()), "cart", None);
        let mut second = Cart::open(Arc::new(StorageAdapter::memory()), "cart", None);
        first.add_item(CartItem::new("a", "A", "", 1.0, 1));
        second.add_item(CartItem::new("b", "B", "", 9.0, 3));

        let view = CartView::new();
        assert_eq!(view.total_value(&first), 1.0);
        assert_eq!(view.total_value(&second), 27.0);
    }
}
