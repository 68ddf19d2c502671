//! Level-triggered wake gate for the render loop.
//!
//! Producers raise the signal after queueing work; the render loop lowers
//! it before going idle and blocks until it is raised again. Raising an
//! already raised signal is a no-op, so many wakes collapse into one.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub struct WakeSignal {
    raised: Mutex<bool>,
    changed: Condvar,
}

impl WakeSignal {
    /// Create a lowered signal
    pub const fn new() -> Self {
        Self {
            raised: Mutex::new(false),
            changed: Condvar::new(),
        }
    }

    /// Raise the signal and release every waiter
    pub fn set(&self) {
        let mut raised = self.lock();
        *raised = true;
        self.changed.notify_all();
    }

    /// Lower the signal
    pub fn clear(&self) {
        *self.lock() = false;
    }

    pub fn is_set(&self) -> bool {
        *self.lock()
    }

    /// Block until the signal is raised
    ///
    /// Returns immediately if it already is.
    pub fn wait(&self) {
        let mut raised = self.lock();
        while !*raised {
            raised = self
                .changed
                .wait(raised)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the signal is raised or `timeout` passes
    ///
    /// Returns `true` if the signal is raised.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let raised = self.lock();
        let (raised, _) = self
            .changed
            .wait_timeout_while(raised, timeout, |raised| !*raised)
            .unwrap_or_else(PoisonError::into_inner);
        *raised
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.raised.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}
