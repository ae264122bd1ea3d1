//! Event-bound wrappers for presentational callers: suppress the UI event,
//! then delegate to the container.

use crate::cart::{Cart, CartAdd, CartItem};
use crate::collection::Toggled;
use crate::wishlist::{Wishlist, WishlistItem};

pub trait UiEvent {
    fn prevent_default(&mut self);
    fn stop_propagation(&mut self);
}

/// Plain event for callers without a UI toolkit, and for tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntheticEvent {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl UiEvent for SyntheticEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

fn suppress(event: &mut dyn UiEvent) {
    event.prevent_default();
    event.stop_propagation();
}

pub fn handle_add_to_cart(event: &mut dyn UiEvent, cart: &mut Cart, item: CartItem) -> CartAdd {
    suppress(event);
    cart.add_item(item)
}

pub fn handle_remove_from_cart(
    event: &mut dyn UiEvent,
    cart: &mut Cart,
    id: &str,
) -> Option<CartItem> {
    suppress(event);
    cart.remove_item(id)
}

pub fn handle_toggle_wishlist(
    event: &mut dyn UiEvent,
    wishlist: &mut Wishlist,
    item: WishlistItem,
) -> Toggled {
    suppress(event);
    wishlist.toggle(item)
}

pub fn handle_move_to_cart(
    event: &mut dyn UiEvent,
    wishlist: &mut Wishlist,
    cart: &mut Cart,
    id: &str,
) -> Option<CartAdd> {
    suppress(event);
    wishlist.move_to_cart(id, cart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageAdapter;
    use std::sync::Arc;

    #[test]
    fn handlers_suppress_event_and_delegate() {
        let storage = Arc::new(StorageAdapter::memory());
        let mut cart = Cart::open(storage.clone(), "cart", None);
        let mut wishlist = Wishlist::open(storage, "wishlist", None);
        let item = WishlistItem::new("a", "Lamp", "", 25.0, "home");

        let mut event = SyntheticEvent::default();
        assert_eq!(
            handle_toggle_wishlist(&mut event, &mut wishlist, item),
            Toggled::Added
        );
        assert!(event.default_prevented && event.propagation_stopped);

        let mut event = SyntheticEvent::default();
        assert_eq!(
            handle_move_to_cart(&mut event, &mut wishlist, &mut cart, "a"),
            Some(CartAdd::Added)
        );
        assert!(event.default_prevented);

        let mut event = SyntheticEvent::default();
        let removed = handle_remove_from_cart(&mut event, &mut cart, "a");
        assert_eq!(removed.map(|line| line.name), Some("Lamp".to_string()));
        assert!(event.propagation_stopped);
    }

    #[test]
    fn add_handler_suppresses_even_when_rejected() {
        let mut cart = Cart::open(Arc::new(StorageAdapter::memory()), "cart", None);
        let mut event = SyntheticEvent::default();
        let outcome = handle_add_to_cart(&mut event, &mut cart, CartItem::new("p", "P", "", 1.0, 0));
        assert_eq!(outcome, CartAdd::Rejected);
        assert_eq!(
            event,
            SyntheticEvent {
                default_prevented: true,
                propagation_stopped: true
            }
        );
    }
}
