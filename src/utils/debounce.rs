//! Trailing-edge debounce on top of browser timers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Runs only the last of a burst of calls, `delay_ms` after the burst ends.
///
/// Each [`call`](Self::call) replaces the pending timer; dropping a
/// [`Timeout`] clears it, so only the newest callback can fire.
#[derive(Clone)]
pub struct Debouncer {
    delay_ms: u32,
    timer: Rc<RefCell<Option<Timeout>>>,
    armed: Rc<Cell<bool>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            timer: Rc::new(RefCell::new(None)),
            armed: Rc::new(Cell::new(false)),
        }
    }

    /// Schedule `f`, cancelling whatever was scheduled before.
    pub fn call(&self, f: impl FnOnce() + 'static) {
        let armed = Rc::clone(&self.armed);
        let timeout = Timeout::new(self.delay_ms, move || {
            armed.set(false);
            f();
        });
        self.armed.set(true);
        // The previous timer is dropped (and cleared) here
        *self.timer.borrow_mut() = Some(timeout);
    }

    /// Cancel the pending callback, if any.
    pub fn cancel(&self) {
        if let Some(timeout) = self.timer.borrow_mut().take() {
            timeout.cancel();
        }
        self.armed.set(false);
    }

    /// Whether a callback is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.armed.get()
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay_ms", &self.delay_ms)
            .field("pending", &self.is_pending())
            .finish()
    }
}
