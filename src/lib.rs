//! NFT dashboard: wallet session, cross-tab sync and asset cache for a
//! Leptos CSR front end.

pub mod app;
pub mod components;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;

#[cfg(any(test, feature = "mock"))]
pub mod testing;
