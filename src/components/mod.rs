//! UI components built with Leptos.
//!
//! - [`WalletBar`] - Wallet connect/disconnect, manual address and account picker
//! - [`Gallery`] - Owned NFTs with throttled refresh and favorites
//! - [`Search`] - Debounced NFT lookup by id
//! - [`ProfileCard`] - Profile of the selected account
//! - [`icons`] - Centralized icon definitions (change theme here)

mod gallery;
pub mod icons;
mod profile;
mod search;
mod wallet_bar;

pub use gallery::Gallery;
pub use profile::ProfileCard;
pub use search::Search;
pub use wallet_bar::WalletBar;
