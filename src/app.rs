//! Root application module.
//!
//! Contains the main App component, AppContext definition, WalletState,
//! and application-level setup logic following Leptos conventions.

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::components::{Gallery, ProfileCard, Search, WalletBar};
use crate::config::APP_NAME;
use crate::core::{
    BrowserProviders, CrossTabSync, Favorites, IndexerClient, NftCache, ProfileClient,
    SessionStore, WalletRegistry,
};
use crate::models::{Address, ProviderKind, Selection, WalletEntry, WalletKind};
use crate::utils::{
    BrowserStorage, BrowserTimer, Clock, KeyValueStore, MemoryStorage, StorageEvents,
};

// ============================================================================
// Services
// ============================================================================

/// Non-reactive services owned by the page session.
///
/// These hold `Rc`s and are kept in a local [`StoredValue`], never in a
/// signal.
pub struct Services {
    pub registry: Rc<WalletRegistry>,
    pub nft_cache: Rc<NftCache>,
    pub indexer: IndexerClient,
    pub profiles: ProfileClient,
    pub events: Rc<dyn StorageEvents>,
    pub timer: Rc<BrowserTimer>,
}

impl Services {
    /// Wire everything to localStorage, or to an in-memory area when
    /// localStorage is blocked.
    pub fn new() -> Self {
        let (store, events): (Rc<dyn KeyValueStore>, Rc<dyn StorageEvents>) =
            if BrowserStorage::is_available() {
                (Rc::new(BrowserStorage), Rc::new(BrowserStorage))
            } else {
                log::warn!("localStorage unavailable; session will not persist");
                let memory = MemoryStorage::new();
                (Rc::new(memory.clone()), Rc::new(memory))
            };

        let timer = Rc::new(BrowserTimer);
        let indexer = IndexerClient::default();
        let registry = Rc::new(WalletRegistry::new(
            SessionStore::new(Rc::clone(&store)),
            Rc::new(BrowserProviders),
        ));
        let nft_cache = Rc::new(NftCache::new(
            store,
            Rc::new(indexer.clone()),
            Rc::clone(&timer) as Rc<dyn Clock>,
        ));

        Self {
            registry,
            nft_cache,
            indexer,
            profiles: ProfileClient::default(),
            events,
            timer,
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// WalletState
// ============================================================================

/// Reactive mirror of the [`WalletRegistry`].
///
/// The registry stays the source of truth; these signals are refreshed from
/// it after every mutation and every cross-tab update.
#[derive(Clone, Copy)]
pub struct WalletState {
    pub wallets: RwSignal<Vec<WalletEntry>>,
    pub selected: RwSignal<Option<Selection>>,
    pub manual_address: RwSignal<Option<Address>>,
    /// Provider whose handshake is waiting on the user.
    pub pending: RwSignal<Option<ProviderKind>>,
    /// Last wallet error, shown inline until the next action.
    pub error: RwSignal<Option<String>>,
}

impl WalletState {
    pub fn new() -> Self {
        Self {
            wallets: RwSignal::new(Vec::new()),
            selected: RwSignal::new(None),
            manual_address: RwSignal::new(None),
            pending: RwSignal::new(None),
            error: RwSignal::new(None),
        }
    }

    fn load(&self, registry: &WalletRegistry) {
        self.wallets.set(registry.wallets());
        self.selected.set(registry.selected());
        self.manual_address.set(registry.manual_address());
        self.pending.set(registry.pending());
    }

    /// Address of the selected account, used to key the gallery and profile.
    pub fn active_address(&self) -> Option<Address> {
        self.selected
            .with(|s| s.as_ref().and_then(|s| s.account.clone()))
    }

    /// [`active_address`](Self::active_address) without tracking.
    pub fn active_address_untracked(&self) -> Option<Address> {
        self.selected
            .with_untracked(|s| s.as_ref().and_then(|s| s.account.clone()))
    }
}

impl Default for WalletState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and read with
/// `use_context::<AppContext>()`.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub services: StoredValue<Services, LocalStorage>,
    pub wallet: WalletState,
    pub favorites: RwSignal<Favorites>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            services: StoredValue::new_local(Services::new()),
            wallet: WalletState::new(),
            favorites: RwSignal::new(Favorites::new()),
        }
    }

    pub fn registry(&self) -> Option<Rc<WalletRegistry>> {
        self.services.try_with_value(|s| Rc::clone(&s.registry))
    }

    /// Re-read the registry into the wallet signals.
    pub fn refresh(&self) {
        if let Some(registry) = self.registry() {
            self.wallet.load(&registry);
        }
    }

    /// Seed entries for installed extensions, then refresh.
    pub fn detect_providers(&self) {
        if let Some(registry) = self.registry() {
            let found = registry.detect_providers();
            log::debug!("detected providers: {:?}", found);
            self.refresh();
        }
    }

    /// Start listening to the other tabs. Dropping the result stops it.
    pub fn attach_sync(&self) -> Option<CrossTabSync> {
        let (registry, events) = self
            .services
            .try_with_value(|s| (Rc::clone(&s.registry), Rc::clone(&s.events)))?;
        let ctx = *self;
        Some(CrossTabSync::attach(registry, events.as_ref(), move || {
            ctx.refresh()
        }))
    }

    pub fn connect(&self, kind: ProviderKind) {
        let Some(registry) = self.registry() else {
            return;
        };
        let ctx = *self;
        ctx.wallet.error.set(None);
        if registry.pending().is_none() {
            ctx.wallet.pending.set(Some(kind));
        }
        spawn_local(async move {
            if let Err(e) = registry.connect(kind).await {
                log::warn!("{}", e);
                ctx.wallet.error.set(Some(e.to_string()));
            }
            ctx.refresh();
        });
    }

    pub fn disconnect(&self, kind: ProviderKind) {
        if let Some(registry) = self.registry() {
            registry.disconnect(kind);
            self.wallet.error.set(None);
            self.refresh();
        }
    }

    pub fn select_account(&self, wallet: WalletKind, account: &str) {
        let Some(registry) = self.registry() else {
            return;
        };
        let result = Address::parse(account).and_then(|a| registry.select_account(wallet, &a));
        self.wallet.error.set(result.err().map(|e| e.to_string()));
        self.refresh();
    }

    /// Returns whether the address was accepted. Typed input is trimmed here.
    pub fn add_manual_entry(&self, candidate: &str) -> bool {
        let Some(registry) = self.registry() else {
            return false;
        };
        let result = registry.add_manual_entry(candidate.trim());
        let accepted = result.is_ok();
        self.wallet.error.set(result.err().map(|e| e.to_string()));
        self.refresh();
        accepted
    }

    pub fn remove_manual_entry(&self) {
        if let Some(registry) = self.registry() {
            registry.remove_manual_entry();
            self.wallet.error.set(None);
            self.refresh();
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Restores the session and seeds detected wallet extensions
/// - Keeps the cross-tab listener alive for as long as the app is mounted
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    ctx.refresh();
    ctx.detect_providers();

    // Dropped with the root owner, which unsubscribes from storage events.
    let sync = StoredValue::new_local(ctx.attach_sync());
    if sync.with_value(|s| !s.as_ref().is_some_and(CrossTabSync::is_active)) {
        log::warn!("cross-tab sync not active; other tabs will not be reflected");
    }

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    background: #0b0d17;
                    color: #e0e0e0;
                    font-family: system-ui, sans-serif;
                ">
                    <h1 style="color: #ff6b6b; margin-bottom: 1rem;">
                        "Something went wrong"
                    </h1>
                    <ul style="color: #ff6b6b; font-size: 0.9rem;">
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button
                        on:click=move |_| {
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().reload();
                            }
                        }
                        style="
                            background: #7c5cff;
                            color: white;
                            border: none;
                            padding: 0.75rem 2rem;
                            border-radius: 4px;
                            cursor: pointer;
                        "
                    >
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <header class="app-header">
                <h1>{APP_NAME}</h1>
                <WalletBar />
            </header>
            <main class="app-main">
                <Gallery />
                <aside class="app-side">
                    <Search />
                    <ProfileCard />
                </aside>
            </main>
        </ErrorBoundary>
    }
}
