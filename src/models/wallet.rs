use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MANUAL_WALLET_NAME;
use crate::models::Address;

/// Browser wallet extensions the dashboard knows how to talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Phantom,
    Backpack,
}

impl ProviderKind {
    /// Every supported provider, in the order they are offered in the UI.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Phantom, ProviderKind::Backpack];

    /// Human-readable provider name, also used as the registry key.
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Phantom => "Phantom",
            ProviderKind::Backpack => "Backpack",
        }
    }

    /// Property on `window` where the extension injects itself.
    pub fn global_name(self) -> &'static str {
        match self {
            ProviderKind::Phantom => "solana",
            ProviderKind::Backpack => "backpack",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry key of a wallet entry.
///
/// Serialized as the bare name (`"Phantom"`, `"Backpack"`, `"Manual"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WalletKind {
    Provider(ProviderKind),
    Manual,
}

impl WalletKind {
    pub fn name(self) -> &'static str {
        match self {
            WalletKind::Provider(kind) => kind.name(),
            WalletKind::Manual => MANUAL_WALLET_NAME,
        }
    }
}

impl From<ProviderKind> for WalletKind {
    fn from(kind: ProviderKind) -> Self {
        WalletKind::Provider(kind)
    }
}

impl TryFrom<String> for WalletKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == MANUAL_WALLET_NAME {
            return Ok(WalletKind::Manual);
        }
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.name() == value)
            .map(WalletKind::Provider)
            .ok_or_else(|| format!("unknown wallet name: {}", value))
    }
}

impl From<WalletKind> for String {
    fn from(kind: WalletKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Connection state of one wallet in the registry.
///
/// Invariant: `is_connected` implies `address.is_some()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletEntry {
    pub name: WalletKind,
    pub address: Option<Address>,
    pub is_connected: bool,
    #[serde(default)]
    pub accounts: Vec<Address>,
}

impl WalletEntry {
    /// Entry for a detected but not yet connected wallet.
    pub fn detected(name: impl Into<WalletKind>) -> Self {
        Self {
            name: name.into(),
            address: None,
            is_connected: false,
            accounts: Vec::new(),
        }
    }

    /// Entry for a wallet connected with a single account.
    pub fn connected(name: impl Into<WalletKind>, address: Address) -> Self {
        Self {
            name: name.into(),
            address: Some(address.clone()),
            is_connected: true,
            accounts: vec![address],
        }
    }

    /// Return to the detected shape, keeping the name.
    pub fn reset(&mut self) {
        self.address = None;
        self.is_connected = false;
        self.accounts.clear();
    }

    /// Repair entries written by other tabs that break the connected invariant.
    pub fn normalized(mut self) -> Self {
        if self.is_connected && self.address.is_none() {
            self.is_connected = false;
        }
        self
    }

    /// Format for display (shortened address or "not connected").
    pub fn display_name(&self) -> String {
        match &self.address {
            Some(address) if self.is_connected => address.short(),
            _ => "not connected".to_string(),
        }
    }
}

/// The wallet and account the dashboard is currently showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub wallet: WalletKind,
    pub account: Option<Address>,
}

impl Selection {
    /// First connected entry wins.
    pub fn derive(wallets: &[WalletEntry]) -> Option<Self> {
        wallets.iter().find(|w| w.is_connected).map(|w| Self {
            wallet: w.name,
            account: w.address.clone(),
        })
    }
}

/// Complete registry state as persisted to localStorage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub wallets: Vec<WalletEntry>,
    pub manual_address: Option<Address>,
}
