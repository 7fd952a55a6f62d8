//! Wallet extension access using web-sys.
//!
//! Phantom injects itself as `window.solana`, Backpack as `window.backpack`.
//! Both expose `connect()` resolving to `{ publicKey }`, driven here through
//! the Reflect API.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::models::ProviderKind;
use crate::utils::dom;

/// A connectable wallet extension.
pub trait WalletProvider {
    fn kind(&self) -> ProviderKind;

    /// Run the connection handshake.
    ///
    /// Resolves with the base-58 public key, or a description of why the
    /// handshake failed. May stay pending until the user answers the
    /// extension's popup.
    fn connect(&self) -> LocalBoxFuture<'_, Result<String, String>>;
}

/// Looks up the extensions present in the page.
pub trait ProviderDetector {
    /// `None` means the extension is not installed.
    fn detect(&self, kind: ProviderKind) -> Option<Rc<dyn WalletProvider>>;

    /// Every supported provider that is currently present.
    fn detected(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.detect(*kind).is_some())
            .collect()
    }
}

/// Extension object found on `window`.
pub struct InjectedProvider {
    kind: ProviderKind,
    object: Object,
}

impl InjectedProvider {
    async fn handshake(&self) -> Result<String, String> {
        let connect = Reflect::get(&self.object, &"connect".into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| format!("{} does not expose connect()", self.kind))?;

        let promise: Promise = connect
            .call0(&self.object)
            .map_err(|e| describe_js_error(&e))?
            .into();

        let response = JsFuture::from(promise)
            .await
            .map_err(|e| describe_js_error(&e))?;

        // Phantom resolves with { publicKey }, and also sets it on the provider.
        let public_key = Reflect::get(&response, &"publicKey".into())
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
            .or_else(|| Reflect::get(&self.object, &"publicKey".into()).ok())
            .filter(|v| !v.is_undefined() && !v.is_null())
            .ok_or_else(|| "no public key returned".to_string())?;

        js_to_string(&public_key).ok_or_else(|| "unreadable public key".to_string())
    }
}

impl WalletProvider for InjectedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn connect(&self) -> LocalBoxFuture<'_, Result<String, String>> {
        self.handshake().boxed_local()
    }
}

/// Detects extensions injected into the current page.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserProviders;

impl ProviderDetector for BrowserProviders {
    fn detect(&self, kind: ProviderKind) -> Option<Rc<dyn WalletProvider>> {
        let object = dom::window_object(kind.global_name())?;
        Some(Rc::new(InjectedProvider { kind, object }))
    }
}

/// `String(value)`, which is how a `PublicKey` renders as base-58.
fn js_to_string(value: &JsValue) -> Option<String> {
    value
        .as_string()
        .or_else(|| {
            let to_string = Reflect::get(value, &"toString".into())
                .ok()?
                .dyn_into::<Function>()
                .ok()?;
            to_string.call0(value).ok()?.as_string()
        })
}

/// Rejections are usually `{ code, message }` objects.
fn describe_js_error(error: &JsValue) -> String {
    Reflect::get(error, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}
