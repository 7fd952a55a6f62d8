//! Debounce and throttle decorators for async operations.
//!
//! Both wrap a function returning a future and hand back futures of their
//! own; nothing is spawned here. The caller decides where to drive them
//! (`spawn_local` in the UI, a test runtime in tests).

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::utils::{Clock, Timer};

type Operation<A, R> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, R>>;

fn boxed<A, R, F, Fut>(f: F) -> Operation<A, R>
where
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = R> + 'static,
{
    Rc::new(move |arg| f(arg).boxed_local())
}

// ============================================================================
// Debounce
// ============================================================================

/// Runs only the last call of a burst, once `delay_ms` passed without a newer call.
pub struct Debounced<A, R> {
    op: Operation<A, R>,
    timer: Rc<dyn Timer>,
    delay_ms: u32,
    generation: Rc<Cell<u64>>,
}

impl<A: 'static, R: 'static> Debounced<A, R> {
    pub fn new<F, Fut>(timer: Rc<dyn Timer>, delay_ms: u32, f: F) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = R> + 'static,
    {
        Self {
            op: boxed(f),
            timer,
            delay_ms,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Schedule `arg`, superseding any call still waiting.
    ///
    /// Resolves to `None` if a later call or [`cancel`](Self::cancel)
    /// superseded this one before its delay elapsed.
    pub fn call(&self, arg: A) -> LocalBoxFuture<'static, Option<R>> {
        let ticket = self.generation.get() + 1;
        self.generation.set(ticket);

        let generation = Rc::clone(&self.generation);
        let op = Rc::clone(&self.op);
        let quiet = self.timer.sleep(self.delay_ms);
        async move {
            quiet.await;
            if generation.get() != ticket {
                return None;
            }
            Some(op(arg).await)
        }
        .boxed_local()
    }

    /// Drop whatever call is waiting.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}

impl<A, R> Clone for Debounced<A, R> {
    fn clone(&self) -> Self {
        Self {
            op: Rc::clone(&self.op),
            timer: Rc::clone(&self.timer),
            delay_ms: self.delay_ms,
            generation: Rc::clone(&self.generation),
        }
    }
}

// ============================================================================
// Throttle
// ============================================================================

/// Runs the first call of each `interval_ms` window and drops the rest.
pub struct Throttled<A, R> {
    op: Operation<A, R>,
    clock: Rc<dyn Clock>,
    interval_ms: u64,
    window_start: Rc<Cell<Option<u64>>>,
}

impl<A: 'static, R: 'static> Throttled<A, R> {
    pub fn new<F, Fut>(clock: Rc<dyn Clock>, interval_ms: u32, f: F) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = R> + 'static,
    {
        Self {
            op: boxed(f),
            clock,
            interval_ms: u64::from(interval_ms),
            window_start: Rc::new(Cell::new(None)),
        }
    }

    /// Start the operation, or return `None` if the current window already fired.
    ///
    /// A started operation is never cancelled by later calls.
    pub fn call(&self, arg: A) -> Option<LocalBoxFuture<'static, R>> {
        let now = self.clock.now_ms();
        if let Some(start) = self.window_start.get()
            && now.saturating_sub(start) < self.interval_ms
        {
            return None;
        }
        self.window_start.set(Some(now));
        Some((self.op)(arg))
    }

    /// Whether a call made now would run.
    pub fn is_ready(&self) -> bool {
        self.window_start
            .get()
            .is_none_or(|start| self.clock.now_ms().saturating_sub(start) >= self.interval_ms)
    }
}

impl<A, R> Clone for Throttled<A, R> {
    fn clone(&self) -> Self {
        Self {
            op: Rc::clone(&self.op),
            clock: Rc::clone(&self.clock),
            interval_ms: self.interval_ms,
            window_start: Rc::clone(&self.window_start),
        }
    }
}
