//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.
//! Endpoint base URLs can be overridden at build time through environment
//! variables read with `option_env!`.

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name displayed in the header.
pub const APP_NAME: &str = "nftdash";

/// Console log level installed by `main`.
pub const LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Info
};

// =============================================================================
// Network Configuration
// =============================================================================

/// Base URL of the NFT indexing API.
pub const INDEXER_BASE_URL: &str = match option_env!("NFTDASH_INDEXER_URL") {
    Some(url) => url,
    None => "/api",
};

/// Base URL of the profile persistence API.
pub const PROFILE_BASE_URL: &str = match option_env!("NFTDASH_PROFILE_URL") {
    Some(url) => url,
    None => "/api/users/profile",
};

/// Header carrying the wallet address on profile requests.
pub const WALLET_ADDRESS_HEADER: &str = "wallet-address";

// =============================================================================
// Session Storage Keys
// =============================================================================

/// localStorage keys shared by every tab of the dashboard.
pub mod storage_keys {
    /// Serialized `WalletEntry` list.
    pub const WALLETS: &str = "wallets";
    /// Manually entered wallet address (or [`UNSET_MARKER`]).
    pub const MANUAL_ADDRESS: &str = "manualWalletAddress";
    /// Literal stored under [`MANUAL_ADDRESS`] when no manual address is set.
    pub const UNSET_MARKER: &str = "null";
    /// Prefix for cached asset lists, followed by the owner address.
    pub const NFT_CACHE_PREFIX: &str = "nfts_";
}

// =============================================================================
// Wallet Configuration
// =============================================================================

/// Registry name of the manually entered pseudo-wallet.
pub const MANUAL_WALLET_NAME: &str = "Manual";

/// Base-58 address constraints (Solana public keys).
pub mod address {
    /// Shortest accepted address.
    pub const MIN_LEN: usize = 32;
    /// Longest accepted address.
    pub const MAX_LEN: usize = 44;
    /// Characters kept on each side when shortening for display.
    pub const DISPLAY_EDGE: usize = 4;
}

// =============================================================================
// Rate Limiting
// =============================================================================

/// Quiet period before an NFT id search fires (milliseconds).
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Minimum spacing between manual gallery refreshes (milliseconds).
pub const REFRESH_THROTTLE_MS: u32 = 2000;

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;
