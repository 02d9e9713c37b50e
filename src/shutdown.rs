//! Cooperative stop request for long-running tasks.
//!
//! The run loop spends nearly all of its life waiting out run and idle
//! windows.  It waits on this signal instead of sleeping so a stop request
//! ends the wait immediately rather than after up to `interval` seconds.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::fan::lock;

#[derive(Debug, Default)]
pub struct ShutdownSignal {
    triggered: Mutex<bool>,
    cvar: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop and wake every waiter.
    pub fn trigger(&self) {
        *lock(&self.triggered) = true;
        self.cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *lock(&self.triggered)
    }

    /// Block for up to `timeout`.  Returns `true` if a stop was requested
    /// before or during the wait.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut triggered = lock(&self.triggered);
        while !*triggered {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            triggered = match self.cvar.wait_timeout(triggered, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        true
    }
}
