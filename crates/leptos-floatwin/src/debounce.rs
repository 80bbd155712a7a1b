//! Trailing Debounce
//!
//! Coalesces a burst of events into a single trailing invocation: each call
//! re-arms the timer, so only the last call in a quiescence window fires.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Holds at most one pending invocation.
#[derive(Clone)]
pub struct Debounce {
    delay_ms: u32,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl Debounce {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    /// Schedule `callback` after the quiescence window, replacing any
    /// invocation still pending.
    pub fn call(&self, callback: impl FnOnce() + 'static) {
        let pending = Rc::clone(&self.pending);
        let timeout = Timeout::new(self.delay_ms, move || {
            pending.borrow_mut().take();
            callback();
        });
        if let Some(previous) = self.pending.borrow_mut().replace(timeout) {
            previous.cancel();
        }
    }

    /// Drop any pending invocation without running it.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.borrow_mut().take() {
            pending.cancel();
        }
    }
}
