//! Core business logic for the dashboard.
//!
//! This module provides:
//! - [`WalletRegistry`] wallet connection state, mirrored to the [`SessionStore`]
//! - [`CrossTabSync`] reconciliation with writes made by other tabs
//! - [`NftCache`] and [`IndexerClient`] for owned-asset listings
//! - [`Debounced`] and [`Throttled`] rate limiters
//! - [`Favorites`] and [`ProfileClient`] for the remaining dashboard features

pub mod error;
mod favorites;
mod indexer;
mod nft_cache;
mod profile;
pub mod provider;
mod rate_limit;
mod registry;
pub mod session;
mod sync;

pub use favorites::Favorites;
pub use indexer::IndexerClient;
pub use nft_cache::{AssetSource, NftCache, cache_key};
pub use profile::ProfileClient;
pub use provider::{BrowserProviders, ProviderDetector, WalletProvider};
pub use rate_limit::{Debounced, Throttled};
pub use registry::WalletRegistry;
pub use session::SessionStore;
pub use sync::{CrossTabSync, SyncPhase};
