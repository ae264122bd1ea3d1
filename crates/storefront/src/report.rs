//! Read-only overview of a storefront, as printed by `storefront-snapshot`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::cart::CartSummary;
use crate::format::{capitalize, format_date, format_date_time, parse_timestamp, slugify, truncate};
use crate::orders::Order;
use crate::session::UserProfile;
use crate::state::{LoadReport, Storefront};
use crate::wishlist::WishlistSummary;

const RECENT_ORDERS: usize = 5;
const NOTE_PREVIEW_CHARS: usize = 40;
const MESSAGE_PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontReport {
    pub backend: &'static str,
    pub storage_dir: Option<PathBuf>,
    pub available: bool,
    pub load: LoadReport,
    pub snapshots: Vec<SnapshotEntry>,
    pub cart: CartSummary,
    pub wishlist: WishlistSummary,
    /// Saved items per category slug.
    pub categories: BTreeMap<String, usize>,
    pub orders: OrdersReport,
    pub notifications: NotificationsReport,
    pub user: Option<UserProfile>,
}

/// One well-known key and the size of its stored snapshot, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub key: String,
    pub bytes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersReport {
    pub count: usize,
    /// Orders that are neither delivered nor cancelled.
    pub open: usize,
    pub revenue: String,
    pub by_status: BTreeMap<String, usize>,
    pub recent: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    pub status: String,
    pub total: String,
    pub placed_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsReport {
    pub total: usize,
    pub unread: usize,
    pub latest: Option<NotificationLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLine {
    pub title: String,
    pub message: String,
    pub at: String,
}

impl StorefrontReport {
    pub fn build(storefront: &Storefront) -> Self {
        let storage = storefront.storage();
        let snapshots = storefront
            .keys()
            .all()
            .into_iter()
            .map(|key| {
                let bytes = storage.get_raw(&key).into_option().map(|text| text.len());
                SnapshotEntry { key, bytes }
            })
            .collect();

        let mut categories = BTreeMap::new();
        for (category, items) in storefront.wishlist.by_category() {
            *categories.entry(slugify(category)).or_insert(0) += items.len();
        }

        Self {
            backend: storage.backend_name(),
            storage_dir: storefront.config.resolved_storage_dir(),
            available: storage.is_available(),
            load: storefront.load_report(),
            snapshots,
            cart: storefront.cart_summary(),
            wishlist: storefront.wishlist_summary(),
            categories,
            orders: orders_report(storefront),
            notifications: notifications_report(storefront),
            user: storefront.user.current().cloned(),
        }
    }
}

fn orders_report(storefront: &Storefront) -> OrdersReport {
    let orders = &storefront.orders;
    let by_status = orders
        .status_counts()
        .into_iter()
        .map(|(status, count)| (capitalize(status.as_str()), count))
        .collect();
    let open = orders
        .orders()
        .iter()
        .filter(|order| !order.status.is_final())
        .count();
    let recent = orders
        .recent(RECENT_ORDERS)
        .into_iter()
        .map(|order| order_line(storefront, order))
        .collect();

    OrdersReport {
        count: orders.count(),
        open,
        revenue: storefront.format_price(orders.revenue()),
        by_status,
        recent,
    }
}

fn order_line(storefront: &Storefront, order: &Order) -> OrderLine {
    OrderLine {
        id: order.short_id().to_string(),
        status: capitalize(order.status.as_str()),
        total: storefront.format_price(order.total),
        placed_on: readable(&order.created_at, format_date),
        note: order
            .note
            .as_deref()
            .map(|note| truncate(note, NOTE_PREVIEW_CHARS)),
    }
}

fn notifications_report(storefront: &Storefront) -> NotificationsReport {
    let inbox = &storefront.notifications;
    let latest = inbox.entries().last().map(|entry| NotificationLine {
        title: entry.title.clone(),
        message: truncate(&entry.message, MESSAGE_PREVIEW_CHARS),
        at: readable(&entry.created_at, format_date_time),
    });
    NotificationsReport {
        total: inbox.entries().len(),
        unread: inbox.unread_count(),
        latest,
    }
}

/// Render a stored RFC 3339 timestamp, keeping the raw text if it does not parse.
fn readable(stamp: &str, render: fn(&chrono::DateTime<chrono::Utc>) -> String) -> String {
    parse_timestamp(stamp)
        .map(|at| render(&at))
        .unwrap_or_else(|| stamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::config::StorefrontConfig;
    use crate::wishlist::WishlistItem;

    fn storefront_with_order(note: &str) -> Storefront {
        let mut storefront = Storefront::in_memory(StorefrontConfig::default());
        storefront
            .cart
            .add_item(CartItem::new("p1", "Mug", "/img/mug.png", 10.0, 2));
        storefront
            .place_order(Some(note.to_string()))
            .expect("order placed");
        storefront
    }

    #[test]
    fn orders_are_grouped_by_readable_status() {
        let mut storefront = storefront_with_order("leave at the door");
        storefront
            .cart
            .add_item(CartItem::new("p2", "Tote", "/img/tote.png", 5.0, 1));
        let second = storefront.place_order(None).expect("second order");
        storefront.orders.cancel(&second.id);

        let report = StorefrontReport::build(&storefront);
        assert_eq!(report.orders.count, 2);
        assert_eq!(report.orders.open, 1);
        assert_eq!(report.orders.by_status.get("Pending"), Some(&1));
        assert_eq!(report.orders.by_status.get("Cancelled"), Some(&1));
        assert_eq!(report.orders.recent[0].status, "Cancelled");
        assert_eq!(report.orders.recent[0].id, second.short_id());
    }

    #[test]
    fn order_lines_show_dates_and_short_notes() {
        let long_note = "please ring the bell twice and leave it with the neighbour";
        let storefront = storefront_with_order(long_note);
        let order = &storefront.orders.orders()[0];
        let placed = parse_timestamp(&order.created_at).expect("stored as rfc3339");

        let report = StorefrontReport::build(&storefront);
        let line = &report.orders.recent[0];
        assert_eq!(line.placed_on, format_date(&placed));
        assert_eq!(line.total, storefront.format_price(order.total));
        let note = line.note.as_deref().expect("note kept");
        assert_eq!(note.chars().count(), NOTE_PREVIEW_CHARS);
        assert!(note.ends_with('…'));
    }

    #[test]
    fn unparseable_timestamps_are_shown_raw() {
        assert_eq!(readable("last tuesday", format_date), "last tuesday");
    }

    #[test]
    fn latest_notification_uses_date_and_time() {
        let storefront = storefront_with_order("gift");
        let entry = storefront.notifications.entries().last().expect("order notice");
        let at = parse_timestamp(&entry.created_at).expect("stored as rfc3339");

        let report = StorefrontReport::build(&storefront);
        let latest = report.notifications.latest.expect("latest entry");
        assert!(latest.title.starts_with("Order #"));
        assert_eq!(latest.at, format_date_time(&at));
        assert_eq!(report.notifications.unread, 1);
    }

    #[test]
    fn categories_and_snapshots_are_listed() {
        let mut storefront = Storefront::in_memory(StorefrontConfig::default());
        storefront
            .wishlist
            .add_item(WishlistItem::new("a", "Vase", "/img/vase.png", 30.0, "Home Decor"));
        storefront
            .wishlist
            .add_item(WishlistItem::new("b", "Lamp", "/img/lamp.png", 45.0, "Home Decor"));
        storefront
            .wishlist
            .add_item(WishlistItem::new("c", "Tote", "/img/tote.png", 12.0, "bags"));

        let report = StorefrontReport::build(&storefront);
        assert_eq!(report.categories.get("home-decor"), Some(&2));
        assert_eq!(report.categories.get("bags"), Some(&1));

        let wishlist = report
            .snapshots
            .iter()
            .find(|entry| entry.key == "wishlist")
            .expect("wishlist key listed");
        assert!(wishlist.bytes.is_some_and(|bytes| bytes > 0));
        let user = report
            .snapshots
            .iter()
            .find(|entry| entry.key == "user")
            .expect("user key listed");
        assert_eq!(user.bytes, None);
        assert_eq!(report.snapshots.len(), 5);
    }

    #[test]
    fn report_serializes_in_camel_case() {
        let storefront = storefront_with_order("gift");
        let value = serde_json::to_value(StorefrontReport::build(&storefront)).expect("json");
        assert_eq!(value["orders"]["byStatus"]["Pending"], 1);
        assert!(value["orders"]["recent"][0]["placedOn"].is_string());
        assert_eq!(value["backend"], "memory");
        assert!(value["user"].is_null());
    }
}
