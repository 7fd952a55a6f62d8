//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`Address`] - Validated base-58 wallet address
//! - [`WalletEntry`], [`WalletKind`], [`ProviderKind`] - Wallet registry entries
//! - [`SessionSnapshot`], [`Selection`] - Persisted session and derived selection
//! - [`NftSummary`], [`NftDetail`], [`CachedAssetList`] - Indexer data
//! - [`Profile`], [`ProfileDraft`] - Profile API records

mod address;
mod nft;
mod profile;
mod wallet;

pub use address::{Address, is_valid_address};
pub use nft::{
    Attribute, CachedAssetList, Collection, Compression, NftDetail, NftSummary, Royalty,
    parse_asset_detail, parse_asset_list,
};
pub use profile::{Profile, ProfileDraft};
pub use wallet::{ProviderKind, Selection, SessionSnapshot, WalletEntry, WalletKind};
