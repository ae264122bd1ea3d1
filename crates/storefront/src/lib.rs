pub mod error;
pub mod event;
pub mod bus;
pub mod config;
pub mod utils;

pub mod storage;
pub mod collection;

pub mod cart;
pub mod wishlist;
pub mod orders;
pub mod notifications;
pub mod session;
pub mod state;

pub mod views;
pub mod format;
pub mod report;

pub use crate::bus::Bus;
pub use crate::collection::{PersistedCollection, Record};
pub use crate::config::StorefrontConfig;
pub use crate::error::{StorageError, StorefrontError, StorefrontResult};
pub use crate::event::{StoreEvent, Toast};
pub use crate::report::StorefrontReport;
pub use crate::state::Storefront;
pub use crate::storage::{SharedStorage, StorageAdapter};
