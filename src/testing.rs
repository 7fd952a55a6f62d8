//! Test doubles for the browser-facing traits.
//!
//! Compiled for unit tests and with the `mock` feature, which the
//! integration tests under `tests/` require.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::core::AssetSource;
use crate::core::error::FetchError;
use crate::core::provider::{ProviderDetector, WalletProvider};
use crate::models::{Address, NftSummary, ProviderKind};
use crate::utils::Clock;

pub const ALICE: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
pub const BOB: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

// ============================================================================
// Gate
// ============================================================================

#[derive(Default)]
struct GateState {
    outcome: Option<Result<String, String>>,
    wakers: Vec<Waker>,
}

/// Holds a fake handshake open until the test decides its outcome.
#[derive(Clone, Default)]
pub struct Gate(Rc<RefCell<GateState>>);

impl Gate {
    pub fn open(&self, outcome: Result<String, String>) {
        let wakers = {
            let mut state = self.0.borrow_mut();
            state.outcome = Some(outcome);
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }

    fn wait(&self) -> GateFuture {
        GateFuture(self.clone())
    }
}

struct GateFuture(Gate);

impl Future for GateFuture {
    type Output = Result<String, String>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = (self.0).0.borrow_mut();
        match &state.outcome {
            Some(outcome) => Poll::Ready(outcome.clone()),
            None => {
                state.wakers.push(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

// ============================================================================
// Providers
// ============================================================================

/// Scripted wallet extension.
pub struct FakeProvider {
    kind: ProviderKind,
    gate: Gate,
    calls: Cell<usize>,
}

impl FakeProvider {
    /// Approves immediately with `public_key`.
    pub fn resolving(kind: ProviderKind, public_key: &str) -> Self {
        let gate = Gate::default();
        gate.open(Ok(public_key.to_string()));
        Self::with_gate(kind, gate)
    }

    /// Rejects immediately with `reason`.
    pub fn rejecting(kind: ProviderKind, reason: &str) -> Self {
        let gate = Gate::default();
        gate.open(Err(reason.to_string()));
        Self::with_gate(kind, gate)
    }

    /// Stays pending until the returned gate is opened.
    pub fn gated(kind: ProviderKind) -> (Self, Gate) {
        let gate = Gate::default();
        (Self::with_gate(kind, gate.clone()), gate)
    }

    fn with_gate(kind: ProviderKind, gate: Gate) -> Self {
        Self {
            kind,
            gate,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl WalletProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn connect(&self) -> LocalBoxFuture<'_, Result<String, String>> {
        self.calls.set(self.calls.get() + 1);
        self.gate.wait().boxed_local()
    }
}

/// Detector over a fixed set of fake extensions.
#[derive(Default)]
pub struct FakeDetector {
    providers: HashMap<ProviderKind, Rc<FakeProvider>>,
}

impl FakeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: FakeProvider) -> Self {
        self.providers.insert(provider.kind, Rc::new(provider));
        self
    }
}

impl ProviderDetector for FakeDetector {
    fn detect(&self, kind: ProviderKind) -> Option<Rc<dyn WalletProvider>> {
        self.providers
            .get(&kind)
            .map(|p| Rc::clone(p) as Rc<dyn WalletProvider>)
    }
}

// ============================================================================
// Asset Source
// ============================================================================

/// Indexer stand-in that counts requests.
pub struct CountingSource {
    response: RefCell<Result<Vec<NftSummary>, FetchError>>,
    calls: Cell<usize>,
    last_owner: RefCell<Option<Address>>,
}

impl CountingSource {
    pub fn returning(items: Vec<NftSummary>) -> Self {
        Self {
            response: RefCell::new(Ok(items)),
            calls: Cell::new(0),
            last_owner: RefCell::new(None),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        let source = Self::returning(Vec::new());
        source.set_response(Err(error));
        source
    }

    pub fn set_response(&self, response: Result<Vec<NftSummary>, FetchError>) {
        *self.response.borrow_mut() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_owner(&self) -> Option<Address> {
        self.last_owner.borrow().clone()
    }
}

impl AssetSource for CountingSource {
    fn assets_by_owner<'a>(
        &'a self,
        owner: &'a Address,
    ) -> LocalBoxFuture<'a, Result<Vec<NftSummary>, FetchError>> {
        self.calls.set(self.calls.get() + 1);
        *self.last_owner.borrow_mut() = Some(owner.clone());
        let response = self.response.borrow().clone();
        async move { response }.boxed_local()
    }
}

/// Build a summary with the given id and title.
pub fn nft(id: &str, title: &str) -> NftSummary {
    NftSummary {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        image_url: format!("https://img.example/{}.png", id),
        attributes: Vec::new(),
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Clock that only moves when told to.
#[derive(Default)]
pub struct ManualClock(Cell<u64>);

impl ManualClock {
    pub fn at(ms: u64) -> Self {
        Self(Cell::new(ms))
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}
