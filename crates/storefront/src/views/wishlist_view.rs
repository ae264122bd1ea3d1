use crate::views::memo::Memo;
use crate::wishlist::{Wishlist, WishlistSummary};

/// Memoized totals for a [`Wishlist`].
#[derive(Debug, Default)]
pub struct WishlistView {
    value: Memo<f64>,
}

impl WishlistView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved records.
    pub fn total_count(&self, wishlist: &Wishlist) -> usize {
        wishlist.count()
    }

    /// Sum of prices.
    pub fn total_value(&self, wishlist: &Wishlist) -> f64 {
        self.value
            .get_or_compute(wishlist.collection().version(), || wishlist.total_price())
    }

    pub fn is_empty(&self, wishlist: &Wishlist) -> bool {
        self.total_count(wishlist) == 0
    }

    pub fn summary(&self, wishlist: &Wishlist) -> WishlistSummary {
        let item_count = self.total_count(wishlist);
        WishlistSummary {
            item_count,
            total: self.total_value(wishlist),
            is_empty: item_count == 0,
        }
    }
}
