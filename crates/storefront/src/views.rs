//! Derived, memoized projections over containers and UI event wrappers.

pub mod actions;
pub mod cart_view;
pub mod memo;
pub mod wishlist_view;

pub use actions::{
    handle_add_to_cart, handle_move_to_cart, handle_remove_from_cart, handle_toggle_wishlist,
    SyntheticEvent, UiEvent,
};
pub use cart_view::CartView;
pub use memo::Memo;
pub use wishlist_view::WishlistView;
