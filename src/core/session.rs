//! Persisted session store.
//!
//! Durable mirror of the wallet registry in localStorage. Two keys are
//! written: `wallets` (JSON list of [`WalletEntry`]) and
//! `manualWalletAddress` (the address, or the literal `null` when unset).
//! Every tab of the dashboard reads and writes the same keys.

use std::rc::Rc;

use crate::config::storage_keys::{MANUAL_ADDRESS, UNSET_MARKER, WALLETS};
use crate::core::error::StorageError;
use crate::models::{Address, SessionSnapshot, WalletEntry};
use crate::utils::KeyValueStore;

/// Decode a stored wallet list. Absent or empty means no wallets.
pub fn decode_wallets(raw: Option<&str>) -> Result<Vec<WalletEntry>, serde_json::Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(json) => {
            let wallets: Vec<WalletEntry> = serde_json::from_str(json)?;
            Ok(wallets.into_iter().map(WalletEntry::normalized).collect())
        }
    }
}

/// Decode the manual-address marker. Absent, `null` and malformed all mean unset.
pub fn decode_manual_address(raw: Option<&str>) -> Option<Address> {
    match raw {
        None | Some(UNSET_MARKER) => None,
        Some(value) => Address::parse(value).ok(),
    }
}

/// Encode a wallet list the way it is stored.
pub fn encode_wallets(wallets: &[WalletEntry]) -> Result<String, StorageError> {
    serde_json::to_string(wallets).map_err(|e| StorageError::Serialization {
        key: WALLETS.to_string(),
        reason: e.to_string(),
    })
}

/// Reads and writes the [`SessionSnapshot`] keys.
#[derive(Clone)]
pub struct SessionStore {
    store: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read both keys. Unreadable data is logged and treated as empty.
    pub fn load(&self) -> SessionSnapshot {
        SessionSnapshot {
            wallets: self.load_wallets(),
            manual_address: self.manual_address(),
        }
    }

    pub fn load_wallets(&self) -> Vec<WalletEntry> {
        let raw = self.store.get_item(WALLETS);
        decode_wallets(raw.as_deref()).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable {} entry: {}", WALLETS, e);
            Vec::new()
        })
    }

    pub fn save_wallets(&self, wallets: &[WalletEntry]) -> Result<(), StorageError> {
        let json = encode_wallets(wallets)?;
        self.store.set_item(WALLETS, &json)
    }

    pub fn manual_address(&self) -> Option<Address> {
        decode_manual_address(self.store.get_item(MANUAL_ADDRESS).as_deref())
    }

    pub fn save_manual_address(&self, address: &Address) -> Result<(), StorageError> {
        self.store.set_item(MANUAL_ADDRESS, address.as_str())
    }

    /// Remove the marker entirely.
    pub fn clear_manual_address(&self) -> Result<(), StorageError> {
        self.store.remove_item(MANUAL_ADDRESS)
    }

    /// Write both keys.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        self.save_wallets(&snapshot.wallets)?;
        match &snapshot.manual_address {
            Some(address) => self.save_manual_address(address),
            None => self.clear_manual_address(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProviderKind, WalletKind};
    use crate::utils::MemoryStorage;

    const ADDR: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    fn store() -> (MemoryStorage, SessionStore) {
        let memory = MemoryStorage::new();
        let session = SessionStore::new(Rc::new(memory.clone()));
        (memory, session)
    }

    #[test]
    fn test_empty_storage_loads_empty_snapshot() {
        let (_, session) = store();
        assert_eq!(session.load(), SessionSnapshot::default());
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let (_, session) = store();
        let address = Address::parse(ADDR).unwrap();
        let snapshot = SessionSnapshot {
            wallets: vec![
                WalletEntry::detected(ProviderKind::Backpack),
                WalletEntry::connected(WalletKind::Manual, address.clone()),
            ],
            manual_address: Some(address),
        };

        session.save(&snapshot).unwrap();

        assert_eq!(session.load(), snapshot);
    }

    #[test]
    fn test_wallets_written_as_json_list() {
        let (memory, session) = store();
        let entry = WalletEntry::connected(ProviderKind::Phantom, Address::parse(ADDR).unwrap());

        session.save_wallets(std::slice::from_ref(&entry)).unwrap();

        let raw = memory.get_item(WALLETS).unwrap();
        assert_eq!(raw, serde_json::to_string(&vec![entry]).unwrap());
    }

    #[test]
    fn test_null_marker_means_unset() {
        let (memory, session) = store();
        memory.set_item(MANUAL_ADDRESS, UNSET_MARKER).unwrap();
        assert_eq!(session.manual_address(), None);
    }

    #[test]
    fn test_invalid_manual_address_ignored() {
        let (memory, session) = store();
        memory.set_item(MANUAL_ADDRESS, "BadAddr").unwrap();
        assert_eq!(session.manual_address(), None);
    }

    #[test]
    fn test_clear_manual_address_removes_key() {
        let (memory, session) = store();
        session
            .save_manual_address(&Address::parse(ADDR).unwrap())
            .unwrap();
        session.clear_manual_address().unwrap();
        assert_eq!(memory.get_item(MANUAL_ADDRESS), None);
    }

    #[test]
    fn test_corrupt_wallets_load_as_empty() {
        let (memory, session) = store();
        memory.set_item(WALLETS, "{not json").unwrap();
        assert!(session.load_wallets().is_empty());
    }

    #[test]
    fn test_decode_wallets_empty_values() {
        assert_eq!(decode_wallets(None).unwrap(), vec![]);
        assert_eq!(decode_wallets(Some("")).unwrap(), vec![]);
        assert_eq!(decode_wallets(Some("[]")).unwrap(), vec![]);
    }

    #[test]
    fn test_decode_wallets_rejects_invalid_address() {
        let json = r#"[{"name":"Phantom","address":"0xdeadbeef","isConnected":true,"accounts":[]}]"#;
        assert!(decode_wallets(Some(json)).is_err());
    }
}
