//! Wallet registry.
//!
//! Owns the canonical list of [`WalletEntry`] values for one page session.
//! Every mutation is written through to the [`SessionStore`] before the call
//! returns, so localStorage never lags the in-memory state. Writes from other
//! tabs come back in through [`WalletRegistry::apply_remote_wallets`] and
//! [`WalletRegistry::apply_remote_manual_address`], and always win.
//!
//! At most one wallet is connected at a time: `connect` and
//! `add_manual_entry` refuse while a different wallet is connected or a
//! handshake is pending. `connect` checks again once the handshake resolves,
//! since another tab may have connected a wallet meanwhile.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::error::WalletError;
use crate::core::provider::ProviderDetector;
use crate::core::session::SessionStore;
use crate::models::{Address, ProviderKind, Selection, SessionSnapshot, WalletEntry, WalletKind};

struct RegistryState {
    wallets: Vec<WalletEntry>,
    manual_address: Option<Address>,
    selected: Option<Selection>,
}

/// Clears the pending handshake when `connect` finishes or is dropped.
struct PendingGuard<'a>(&'a Cell<Option<ProviderKind>>);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(None);
    }
}

pub struct WalletRegistry {
    state: RefCell<RegistryState>,
    pending: Cell<Option<ProviderKind>>,
    session: SessionStore,
    providers: Rc<dyn ProviderDetector>,
}

impl WalletRegistry {
    /// Create a registry hydrated from the session store.
    pub fn new(session: SessionStore, providers: Rc<dyn ProviderDetector>) -> Self {
        let SessionSnapshot {
            wallets,
            manual_address,
        } = session.load();
        let selected = Selection::derive(&wallets);
        log::debug!(
            "restored {} wallet(s), selected {:?}",
            wallets.len(),
            selected.as_ref().map(|s| s.wallet)
        );

        Self {
            state: RefCell::new(RegistryState {
                wallets,
                manual_address,
                selected,
            }),
            pending: Cell::new(None),
            session,
            providers,
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn wallets(&self) -> Vec<WalletEntry> {
        self.state.borrow().wallets.clone()
    }

    pub fn entry(&self, name: WalletKind) -> Option<WalletEntry> {
        self.state
            .borrow()
            .wallets
            .iter()
            .find(|w| w.name == name)
            .cloned()
    }

    pub fn selected(&self) -> Option<Selection> {
        self.state.borrow().selected.clone()
    }

    pub fn manual_address(&self) -> Option<Address> {
        self.state.borrow().manual_address.clone()
    }

    /// Provider whose handshake is in flight.
    pub fn pending(&self) -> Option<ProviderKind> {
        self.pending.get()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.borrow();
        SessionSnapshot {
            wallets: state.wallets.clone(),
            manual_address: state.manual_address.clone(),
        }
    }

    /// Connected wallet other than `except`, if any.
    fn connected_other_than(&self, except: WalletKind) -> Option<WalletKind> {
        self.state
            .borrow()
            .wallets
            .iter()
            .find(|w| w.is_connected && w.name != except)
            .map(|w| w.name)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Add a disconnected entry for every installed extension not yet listed.
    ///
    /// Returns the detected providers.
    pub fn detect_providers(&self) -> Vec<ProviderKind> {
        let detected = self.providers.detected();
        let added = {
            let mut state = self.state.borrow_mut();
            let mut added = false;
            for kind in &detected {
                let name = WalletKind::Provider(*kind);
                if !state.wallets.iter().any(|w| w.name == name) {
                    state.wallets.push(WalletEntry::detected(name));
                    added = true;
                }
            }
            added
        };
        if added {
            self.persist_wallets();
        }
        detected
    }

    /// Connect a provider through its extension.
    ///
    /// Suspends until the user approves or rejects the extension popup.
    pub async fn connect(&self, kind: ProviderKind) -> Result<Address, WalletError> {
        if let Some(pending) = self.pending.get() {
            return Err(WalletError::ConcurrentConnect { pending });
        }
        if let Some(connected) = self.connected_other_than(kind.into()) {
            return Err(WalletError::AnotherWalletConnected {
                connected: connected.to_string(),
            });
        }
        let provider = self
            .providers
            .detect(kind)
            .ok_or(WalletError::NotDetected(kind))?;

        self.pending.set(Some(kind));
        let _guard = PendingGuard(&self.pending);
        log::info!("connecting {}", kind);

        let public_key = provider
            .connect()
            .await
            .map_err(|reason| WalletError::Connection {
                provider: kind,
                reason,
            })?;
        let address = Address::parse(&public_key).map_err(|_| WalletError::Connection {
            provider: kind,
            reason: format!("provider returned an invalid public key: {}", public_key),
        })?;
        if let Some(connected) = self.connected_other_than(kind.into()) {
            log::warn!("dropping {} handshake: {} connected meanwhile", kind, connected);
            return Err(WalletError::AnotherWalletConnected {
                connected: connected.to_string(),
            });
        }

        {
            let mut state = self.state.borrow_mut();
            let connected = WalletEntry::connected(kind, address.clone());
            match state.wallets.iter_mut().find(|w| w.name == connected.name) {
                Some(entry) => *entry = connected,
                None => state.wallets.push(connected),
            }
            state.selected = Some(Selection {
                wallet: kind.into(),
                account: Some(address.clone()),
            });
        }
        self.persist_wallets();
        log::info!("connected {} as {}", kind, address);
        Ok(address)
    }

    /// Reset a provider entry to its disconnected shape. Idempotent.
    pub fn disconnect(&self, kind: ProviderKind) {
        {
            let mut state = self.state.borrow_mut();
            let name = WalletKind::Provider(kind);
            if let Some(entry) = state.wallets.iter_mut().find(|w| w.name == name) {
                entry.reset();
            }
            state.selected = Selection::derive(&state.wallets);
        }
        self.persist_wallets();
        log::info!("disconnected {}", kind);
    }

    /// Point a wallet at one of its reported accounts.
    pub fn select_account(&self, wallet: WalletKind, account: &Address) -> Result<(), WalletError> {
        {
            let mut state = self.state.borrow_mut();
            let entry = state
                .wallets
                .iter_mut()
                .find(|w| w.name == wallet && w.accounts.contains(account))
                .ok_or_else(|| WalletError::UnknownAccount {
                    wallet: wallet.to_string(),
                    account: account.to_string(),
                })?;
            entry.address = Some(account.clone());
            if entry.is_connected {
                state.selected = Some(Selection {
                    wallet,
                    account: Some(account.clone()),
                });
            }
        }
        self.persist_wallets();
        Ok(())
    }

    /// Track a typed-in address as the connected `"Manual"` wallet.
    pub fn add_manual_entry(&self, candidate: &str) -> Result<Address, WalletError> {
        let address = Address::parse(candidate)?;
        if let Some(pending) = self.pending.get() {
            return Err(WalletError::ConcurrentConnect { pending });
        }
        if let Some(connected) = self.connected_other_than(WalletKind::Manual) {
            return Err(WalletError::AnotherWalletConnected {
                connected: connected.to_string(),
            });
        }

        {
            let mut state = self.state.borrow_mut();
            let entry = WalletEntry::connected(WalletKind::Manual, address.clone());
            match state.wallets.iter_mut().find(|w| w.name == WalletKind::Manual) {
                Some(existing) => *existing = entry,
                None => state.wallets.push(entry),
            }
            state.manual_address = Some(address.clone());
            state.selected = Some(Selection {
                wallet: WalletKind::Manual,
                account: Some(address.clone()),
            });
        }
        self.persist_wallets();
        if let Err(e) = self.session.save_manual_address(&address) {
            log::warn!("failed to persist manual address: {}", e);
        }
        log::info!("manual wallet set to {}", address);
        Ok(address)
    }

    /// Delete the `"Manual"` entry and its marker.
    pub fn remove_manual_entry(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.wallets.retain(|w| w.name != WalletKind::Manual);
            state.manual_address = None;
            state.selected = Selection::derive(&state.wallets);
        }
        self.persist_wallets();
        if let Err(e) = self.session.clear_manual_address() {
            log::warn!("failed to clear manual address: {}", e);
        }
        log::info!("manual wallet removed");
    }

    // ------------------------------------------------------------------------
    // Cross-tab reconciliation
    // ------------------------------------------------------------------------

    /// Replace the wallet list with one written by another tab.
    ///
    /// Returns `false` when it already matches.
    pub fn apply_remote_wallets(&self, wallets: Vec<WalletEntry>) -> bool {
        let mut state = self.state.borrow_mut();
        if state.wallets == wallets {
            return false;
        }
        state.selected = Selection::derive(&wallets);
        state.wallets = wallets;
        true
    }

    /// Replace the manual address with one written by another tab.
    pub fn apply_remote_manual_address(&self, address: Option<Address>) -> bool {
        let mut state = self.state.borrow_mut();
        if state.manual_address == address {
            return false;
        }
        state.manual_address = address;
        true
    }

    fn persist_wallets(&self) {
        let state = self.state.borrow();
        if let Err(e) = self.session.save_wallets(&state.wallets) {
            log::warn!("failed to persist wallets: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::storage_keys::{MANUAL_ADDRESS, WALLETS};
    use std::pin::pin;

    use futures::FutureExt;
    use futures::executor::block_on;

    use crate::testing::{ALICE, BOB, FakeDetector, FakeProvider};
    use crate::utils::{KeyValueStore, MemoryStorage};

    fn registry_with(detector: FakeDetector) -> (MemoryStorage, WalletRegistry) {
        let memory = MemoryStorage::new();
        let session = SessionStore::new(Rc::new(memory.clone()));
        (memory, WalletRegistry::new(session, Rc::new(detector)))
    }

    fn alice() -> Address {
        Address::parse(ALICE).unwrap()
    }

    #[test]
    fn test_connect_phantom_persists_single_entry() {
        let detector = FakeDetector::new().with(FakeProvider::resolving(ProviderKind::Phantom, ALICE));
        let (memory, registry) = registry_with(detector);

        let address = block_on(registry.connect(ProviderKind::Phantom)).unwrap();

        let expected = WalletEntry {
            name: WalletKind::Provider(ProviderKind::Phantom),
            address: Some(alice()),
            is_connected: true,
            accounts: vec![alice()],
        };
        assert_eq!(address, alice());
        assert_eq!(registry.wallets(), vec![expected.clone()]);
        assert_eq!(
            memory.get_item(WALLETS).unwrap(),
            serde_json::to_string(&vec![expected]).unwrap()
        );
        assert_eq!(
            registry.selected(),
            Some(Selection {
                wallet: ProviderKind::Phantom.into(),
                account: Some(alice()),
            })
        );
        assert_eq!(registry.pending(), None);
    }

    #[test]
    fn test_connect_missing_provider() {
        let (_, registry) = registry_with(FakeDetector::new());
        assert_eq!(
            block_on(registry.connect(ProviderKind::Backpack)),
            Err(WalletError::NotDetected(ProviderKind::Backpack))
        );
    }

    #[test]
    fn test_connect_rejection_carries_reason() {
        let detector = FakeDetector::new().with(FakeProvider::rejecting(
            ProviderKind::Phantom,
            "User rejected the request.",
        ));
        let (memory, registry) = registry_with(detector);

        let err = block_on(registry.connect(ProviderKind::Phantom)).unwrap_err();

        assert_eq!(
            err,
            WalletError::Connection {
                provider: ProviderKind::Phantom,
                reason: "User rejected the request.".to_string(),
            }
        );
        assert!(registry.wallets().is_empty());
        assert_eq!(memory.get_item(WALLETS), None);
        assert_eq!(registry.pending(), None);
    }

    #[test]
    fn test_second_connect_while_pending_is_rejected() {
        let (phantom, gate) = FakeProvider::gated(ProviderKind::Phantom);
        let detector = FakeDetector::new()
            .with(phantom)
            .with(FakeProvider::resolving(ProviderKind::Backpack, BOB));
        let (_, registry) = registry_with(detector);

        let mut first = pin!(registry.connect(ProviderKind::Phantom));
        assert_eq!(first.as_mut().now_or_never(), None);
        assert_eq!(registry.pending(), Some(ProviderKind::Phantom));

        assert_eq!(
            block_on(registry.connect(ProviderKind::Backpack)),
            Err(WalletError::ConcurrentConnect {
                pending: ProviderKind::Phantom
            })
        );

        gate.open(Ok(ALICE.to_string()));
        assert_eq!(first.as_mut().now_or_never(), Some(Ok(alice())));
        assert_eq!(registry.pending(), None);
    }

    #[test]
    fn test_dropped_connect_clears_pending() {
        let (phantom, _gate) = FakeProvider::gated(ProviderKind::Phantom);
        let (_, registry) = registry_with(FakeDetector::new().with(phantom));

        {
            let mut connecting = pin!(registry.connect(ProviderKind::Phantom));
            assert_eq!(connecting.as_mut().now_or_never(), None);
            assert_eq!(registry.pending(), Some(ProviderKind::Phantom));
        }

        assert_eq!(registry.pending(), None);
        assert!(registry.wallets().is_empty());
    }

    #[test]
    fn test_manual_entry_refused_while_connect_pending() {
        let (phantom, gate) = FakeProvider::gated(ProviderKind::Phantom);
        let (memory, registry) = registry_with(FakeDetector::new().with(phantom));

        let mut connecting = pin!(registry.connect(ProviderKind::Phantom));
        assert_eq!(connecting.as_mut().now_or_never(), None);

        assert_eq!(
            registry.add_manual_entry(BOB),
            Err(WalletError::ConcurrentConnect {
                pending: ProviderKind::Phantom
            })
        );
        assert_eq!(memory.get_item(MANUAL_ADDRESS), None);

        gate.open(Ok(ALICE.to_string()));
        assert_eq!(connecting.as_mut().now_or_never(), Some(Ok(alice())));

        let connected: Vec<_> = registry
            .wallets()
            .into_iter()
            .filter(|w| w.is_connected)
            .map(|w| w.name)
            .collect();
        assert_eq!(connected, vec![WalletKind::Provider(ProviderKind::Phantom)]);
    }

    #[test]
    fn test_connect_dropped_when_other_wallet_connects_during_handshake() {
        let (phantom, gate) = FakeProvider::gated(ProviderKind::Phantom);
        let (memory, registry) = registry_with(FakeDetector::new().with(phantom));

        let mut connecting = pin!(registry.connect(ProviderKind::Phantom));
        assert_eq!(connecting.as_mut().now_or_never(), None);

        // Another tab tracks a manual address while the popup is open.
        let bob = Address::parse(BOB).unwrap();
        let remote = vec![WalletEntry::connected(WalletKind::Manual, bob.clone())];
        assert!(registry.apply_remote_wallets(remote.clone()));

        gate.open(Ok(ALICE.to_string()));
        assert_eq!(
            connecting.as_mut().now_or_never(),
            Some(Err(WalletError::AnotherWalletConnected {
                connected: "Manual".to_string()
            }))
        );

        assert_eq!(registry.wallets(), remote);
        assert_eq!(registry.pending(), None);
        assert_eq!(memory.get_item(WALLETS), None);
        assert_eq!(
            registry.selected(),
            Some(Selection {
                wallet: WalletKind::Manual,
                account: Some(bob),
            })
        );
    }

    #[test]
    fn test_manual_entry_rejects_padded_address() {
        let (_, registry) = registry_with(FakeDetector::new());
        let padded = format!(" {} ", ALICE);
        assert_eq!(
            registry.add_manual_entry(&padded),
            Err(WalletError::InvalidAddress(padded.clone()))
        );
        assert!(registry.wallets().is_empty());
    }

    #[test]
    fn test_connect_invalid_public_key() {
        let detector =
            FakeDetector::new().with(FakeProvider::resolving(ProviderKind::Phantom, "0xabc"));
        let (_, registry) = registry_with(detector);

        let err = block_on(registry.connect(ProviderKind::Phantom)).unwrap_err();

        assert!(matches!(err, WalletError::Connection { .. }));
        assert!(registry.wallets().is_empty());
    }

    #[test]
    fn test_connect_refused_while_other_wallet_connected() {
        let detector = FakeDetector::new()
            .with(FakeProvider::resolving(ProviderKind::Phantom, ALICE))
            .with(FakeProvider::resolving(ProviderKind::Backpack, BOB));
        let (_, registry) = registry_with(detector);
        block_on(registry.connect(ProviderKind::Phantom)).unwrap();

        assert_eq!(
            block_on(registry.connect(ProviderKind::Backpack)),
            Err(WalletError::AnotherWalletConnected {
                connected: "Phantom".to_string()
            })
        );

        registry.disconnect(ProviderKind::Phantom);
        assert!(block_on(registry.connect(ProviderKind::Backpack)).is_ok());
    }

    #[test]
    fn test_reconnect_same_provider_replaces_entry() {
        let detector = FakeDetector::new().with(FakeProvider::resolving(ProviderKind::Phantom, ALICE));
        let (_, registry) = registry_with(detector);
        block_on(registry.connect(ProviderKind::Phantom)).unwrap();
        block_on(registry.connect(ProviderKind::Phantom)).unwrap();
        assert_eq!(registry.wallets().len(), 1);
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let detector = FakeDetector::new().with(FakeProvider::resolving(ProviderKind::Phantom, ALICE));
        let (memory, registry) = registry_with(detector);
        block_on(registry.connect(ProviderKind::Phantom)).unwrap();

        registry.disconnect(ProviderKind::Phantom);
        let once = (registry.wallets(), memory.get_item(WALLETS));
        registry.disconnect(ProviderKind::Phantom);
        let twice = (registry.wallets(), memory.get_item(WALLETS));

        assert_eq!(once, twice);
        assert_eq!(
            registry.wallets(),
            vec![WalletEntry::detected(ProviderKind::Phantom)]
        );
        assert_eq!(registry.selected(), None);
    }

    #[test]
    fn test_disconnect_unknown_provider_is_noop() {
        let (_, registry) = registry_with(FakeDetector::new());
        registry.disconnect(ProviderKind::Backpack);
        assert!(registry.wallets().is_empty());
    }

    #[test]
    fn test_select_account() {
        let detector = FakeDetector::new().with(FakeProvider::resolving(ProviderKind::Phantom, ALICE));
        let (_, registry) = registry_with(detector);
        block_on(registry.connect(ProviderKind::Phantom)).unwrap();

        registry
            .select_account(ProviderKind::Phantom.into(), &alice())
            .unwrap();
        assert_eq!(
            registry.selected().and_then(|s| s.account),
            Some(alice())
        );

        let bob = Address::parse(BOB).unwrap();
        assert_eq!(
            registry.select_account(ProviderKind::Phantom.into(), &bob),
            Err(WalletError::UnknownAccount {
                wallet: "Phantom".to_string(),
                account: BOB.to_string(),
            })
        );
    }

    #[test]
    fn test_add_manual_entry() {
        let (memory, registry) = registry_with(FakeDetector::new());

        registry.add_manual_entry(ALICE).unwrap();

        assert_eq!(
            registry.entry(WalletKind::Manual),
            Some(WalletEntry::connected(WalletKind::Manual, alice()))
        );
        assert_eq!(memory.get_item(MANUAL_ADDRESS).as_deref(), Some(ALICE));
        assert_eq!(registry.manual_address(), Some(alice()));
        assert_eq!(
            registry.selected().map(|s| s.wallet),
            Some(WalletKind::Manual)
        );
    }

    #[test]
    fn test_add_manual_entry_replaces_previous() {
        let (_, registry) = registry_with(FakeDetector::new());
        registry.add_manual_entry(ALICE).unwrap();
        registry.add_manual_entry(BOB).unwrap();

        let manual: Vec<_> = registry
            .wallets()
            .into_iter()
            .filter(|w| w.name == WalletKind::Manual)
            .collect();
        assert_eq!(manual.len(), 1);
        assert_eq!(manual[0].address.as_ref().map(Address::as_str), Some(BOB));
    }

    #[test]
    fn test_add_manual_entry_invalid() {
        let (memory, registry) = registry_with(FakeDetector::new());
        assert_eq!(
            registry.add_manual_entry("BadAddr"),
            Err(WalletError::InvalidAddress("BadAddr".to_string()))
        );
        assert!(registry.wallets().is_empty());
        assert_eq!(memory.get_item(MANUAL_ADDRESS), None);
    }

    #[test]
    fn test_add_then_remove_manual_entry() {
        let (memory, registry) = registry_with(FakeDetector::new());
        registry.add_manual_entry(ALICE).unwrap();

        registry.remove_manual_entry();

        assert_eq!(registry.entry(WalletKind::Manual), None);
        assert_eq!(memory.get_item(MANUAL_ADDRESS), None);
        assert_eq!(registry.manual_address(), None);
        assert_eq!(registry.selected(), None);
        assert_eq!(memory.get_item(WALLETS).as_deref(), Some("[]"));
    }

    #[test]
    fn test_detect_providers_seeds_entries() {
        let detector = FakeDetector::new().with(FakeProvider::resolving(ProviderKind::Backpack, BOB));
        let (memory, registry) = registry_with(detector);

        assert_eq!(registry.detect_providers(), vec![ProviderKind::Backpack]);
        assert_eq!(
            registry.wallets(),
            vec![WalletEntry::detected(ProviderKind::Backpack)]
        );
        assert!(memory.get_item(WALLETS).is_some());

        // Already-present entries are left alone.
        block_on(registry.connect(ProviderKind::Backpack)).unwrap();
        registry.detect_providers();
        assert!(registry.entry(ProviderKind::Backpack.into()).unwrap().is_connected);
    }

    #[test]
    fn test_new_restores_from_storage() {
        let memory = MemoryStorage::new();
        let entry = WalletEntry::connected(ProviderKind::Phantom, alice());
        memory
            .set_item(WALLETS, &serde_json::to_string(&vec![entry.clone()]).unwrap())
            .unwrap();

        let registry = WalletRegistry::new(
            SessionStore::new(Rc::new(memory)),
            Rc::new(FakeDetector::new()),
        );

        assert_eq!(registry.wallets(), vec![entry]);
        assert_eq!(registry.selected().map(|s| s.account), Some(Some(alice())));
    }

    #[test]
    fn test_apply_remote_wallets_reports_change() {
        let (_, registry) = registry_with(FakeDetector::new());
        let remote = vec![WalletEntry::connected(WalletKind::Manual, alice())];

        assert!(registry.apply_remote_wallets(remote.clone()));
        assert!(!registry.apply_remote_wallets(remote));
        assert_eq!(registry.selected().map(|s| s.wallet), Some(WalletKind::Manual));

        assert!(registry.apply_remote_wallets(Vec::new()));
        assert_eq!(registry.selected(), None);
    }
}
