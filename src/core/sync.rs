//! Cross-tab synchronizer.
//!
//! Listens for writes to the session keys made by other tabs and folds them
//! into this tab's [`WalletRegistry`]. The stored value always wins: there is
//! no merge, and a change that already matches the in-memory state is
//! ignored. Dropping the [`CrossTabSync`] unsubscribes both listeners.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::storage_keys::{MANUAL_ADDRESS, UNSET_MARKER, WALLETS};
use crate::core::registry::WalletRegistry;
use crate::core::session::{decode_manual_address, decode_wallets};
use crate::utils::{StorageChange, StorageEvents, Subscription};

/// Where a tracked key is in its reconcile cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncPhase {
    #[default]
    Idle,
    Reconciling,
}

#[derive(Default)]
struct Phases {
    wallets: Cell<SyncPhase>,
    manual_address: Cell<SyncPhase>,
}

impl Phases {
    fn cell(&self, key: &str) -> Option<&Cell<SyncPhase>> {
        match key {
            WALLETS => Some(&self.wallets),
            MANUAL_ADDRESS => Some(&self.manual_address),
            _ => None,
        }
    }
}

/// Resets a key to [`SyncPhase::Idle`] when reconciling ends, even on panic.
struct Reconciling<'a>(&'a Cell<SyncPhase>);

impl<'a> Reconciling<'a> {
    fn enter(cell: &'a Cell<SyncPhase>) -> Self {
        cell.set(SyncPhase::Reconciling);
        Self(cell)
    }
}

impl Drop for Reconciling<'_> {
    fn drop(&mut self) {
        self.0.set(SyncPhase::Idle);
    }
}

/// Live subscription of a registry to other tabs' writes.
pub struct CrossTabSync {
    phases: Rc<Phases>,
    wallets: Subscription,
    manual_address: Subscription,
}

impl CrossTabSync {
    /// Subscribe `registry` to both session keys.
    ///
    /// `on_change` runs after a remote write actually changed the registry.
    pub fn attach(
        registry: Rc<WalletRegistry>,
        events: &dyn StorageEvents,
        on_change: impl Fn() + 'static,
    ) -> Self {
        let phases = Rc::new(Phases::default());
        let on_change: Rc<dyn Fn()> = Rc::new(on_change);

        let wallets = {
            let registry = Rc::clone(&registry);
            let phases = Rc::clone(&phases);
            let on_change = Rc::clone(&on_change);
            events.subscribe(
                WALLETS,
                Rc::new(move |change: &StorageChange| {
                    let _phase = Reconciling::enter(&phases.wallets);
                    match decode_wallets(change.new_value.as_deref()) {
                        Ok(wallets) => {
                            if registry.apply_remote_wallets(wallets) {
                                log::debug!("wallets updated by another tab");
                                on_change();
                            }
                        }
                        Err(e) => log::warn!("ignoring malformed {} from another tab: {}", WALLETS, e),
                    }
                }),
            )
        };

        let manual_address = {
            let phases = Rc::clone(&phases);
            events.subscribe(
                MANUAL_ADDRESS,
                Rc::new(move |change: &StorageChange| {
                    let _phase = Reconciling::enter(&phases.manual_address);
                    let address = decode_manual_address(change.new_value.as_deref());
                    if address.is_none()
                        && let Some(raw) = change.new_value.as_deref()
                        && raw != UNSET_MARKER
                    {
                        log::warn!("ignoring malformed {} from another tab: {}", MANUAL_ADDRESS, raw);
                        return;
                    }
                    if registry.apply_remote_manual_address(address) {
                        log::debug!("manual address updated by another tab");
                        on_change();
                    }
                }),
            )
        };

        Self {
            phases,
            wallets,
            manual_address,
        }
    }

    /// Phase of a tracked key. Untracked keys are always idle.
    pub fn phase(&self, key: &str) -> SyncPhase {
        self.phases
            .cell(key)
            .map(Cell::get)
            .unwrap_or_default()
    }

    /// Whether both listeners were registered.
    pub fn is_active(&self) -> bool {
        self.wallets.is_active() && self.manual_address.is_active()
    }
}
