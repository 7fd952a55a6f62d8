//! Clock and sleep abstraction used by the rate limiters and the NFT cache.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;

/// Wall-clock time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// A [`Clock`] that can also suspend.
pub trait Timer: Clock {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// `Date.now()` and `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Clock for BrowserTimer {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

impl Timer for BrowserTimer {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(ms).boxed_local()
    }
}
