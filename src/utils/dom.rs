//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use js_sys::{Object, Reflect};
use wasm_bindgen::JsCast;
use web_sys::{Storage, Window};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get localStorage.
#[inline]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// Get an object injected on `window` (e.g. `window.solana`).
///
/// Returns `None` when the property is missing or not an object.
pub fn window_object(name: &str) -> Option<Object> {
    let window = window()?;
    Reflect::get(&window, &name.into())
        .ok()
        .filter(|v| v.is_object())
        .and_then(|v| v.dyn_into::<Object>().ok())
}
