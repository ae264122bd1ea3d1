//! Fixed snapshot key space.

pub const CART_KEY: &str = "cart";
pub const WISHLIST_KEY: &str = "wishlist";
pub const ORDERS_KEY: &str = "orders";
pub const NOTIFICATIONS_KEY: &str = "notifications";
pub const USER_KEY: &str = "user";

/// Resolves the fixed keys under an optional namespace prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotKeys {
    prefix: String,
}

impl SnapshotKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn resolve(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    pub fn cart(&self) -> String {
        self.resolve(CART_KEY)
    }

    pub fn wishlist(&self) -> String {
        self.resolve(WISHLIST_KEY)
    }

    pub fn orders(&self) -> String {
        self.resolve(ORDERS_KEY)
    }

    pub fn notifications(&self) -> String {
        self.resolve(NOTIFICATIONS_KEY)
    }

    pub fn user(&self) -> String {
        self.resolve(USER_KEY)
    }

    pub fn all(&self) -> Vec<String> {
        vec![
            self.cart(),
            self.wishlist(),
            self.orders(),
            self.notifications(),
            self.user(),
        ]
    }
}
