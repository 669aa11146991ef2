use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Cooperative cancellation token with interruptible waits.
///
/// Triggered from the Ctrl+C handler or the keyboard monitor; the poll loop
/// checks it between cycles and while waiting.
pub struct ShutdownSignal {
    shutdown: AtomicBool,
    condvar: Condvar,
    mutex: Mutex<()>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal in the non-shutdown state.
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            condvar: Condvar::new(),
            mutex: Mutex::new(()),
        }
    }

    /// Trigger the shutdown signal, waking all waiting threads.
    pub fn trigger(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let _guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        self.condvar.notify_all();
    }

    /// Check if shutdown has been triggered.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Wait for the specified duration or until shutdown is triggered.
    ///
    /// Returns `true` if shutdown was triggered, `false` if the wait completed normally.
    pub fn wait(&self, duration: Duration) -> bool {
        if self.is_shutdown() {
            return true;
        }

        let guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        match self
            .condvar
            .wait_timeout_while(guard, duration, |_| !self.is_shutdown())
        {
            Ok(_) => self.is_shutdown(),
            // Mutex poisoned, treat as shutdown
            Err(_) => true,
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
