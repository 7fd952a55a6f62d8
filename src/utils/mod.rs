//! Utility modules for browser APIs.
//!
//! Provides:
//! - [`KeyValueStore`], [`StorageEvents`] - localStorage access and cross-tab notifications
//! - [`http`] - `gloo-net` request helpers
//! - [`Clock`], [`Timer`] - Wall clock and sleeping for the rate limiters

pub mod dom;
pub mod http;
pub mod storage;
mod timer;

pub use storage::{
    BrowserStorage, KeyValueStore, MemoryStorage, StorageChange, StorageEvents, Subscription,
};
pub use timer::{BrowserTimer, Clock, Timer};
