//! # Completion Latch
//!
//! A counting latch (wait group). It starts at the number of workers, each
//! worker counts it down exactly once, and the launcher blocks in `wait`
//! until the count reaches zero.
//!
//! Workers hold a [`LatchGuard`] for the duration of their body so that the
//! count-down happens on every exit path, including early returns and
//! unwinding panics.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub struct CompletionLatch {
    remaining: Mutex<usize>,
    all_done: Condvar,
}

impl CompletionLatch {
    /// Create a latch expecting `count` completions
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            remaining: Mutex::new(count),
            all_done: Condvar::new(),
        })
    }

    // A worker panicking while holding the lock cannot leave the counter
    // half-updated, so a poisoned mutex is still safe to use.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one completion; wakes waiters when the count hits zero
    pub fn count_down(&self) {
        let mut remaining = self.lock();
        debug_assert!(*remaining > 0, "latch counted down past zero");
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.all_done.notify_all();
        }
    }

    /// Outstanding completions
    pub fn remaining(&self) -> usize {
        *self.lock()
    }

    /// Block until every expected completion has been recorded
    pub fn wait(&self) {
        let mut remaining = self.lock();
        while *remaining > 0 {
            remaining = self
                .all_done
                .wait(remaining)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block for at most `timeout`. Returns `true` if the latch opened.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let remaining = self.lock();
        let (remaining, _) = self
            .all_done
            .wait_timeout_while(remaining, timeout, |r| *r > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *remaining == 0
    }

    /// Guard that counts the latch down once when dropped
    pub fn guard(self: &Arc<Self>) -> LatchGuard {
        LatchGuard {
            latch: Arc::clone(self),
        }
    }
}

/// Counts its latch down on drop
pub struct LatchGuard {
    latch: Arc<CompletionLatch>,
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        self.latch.count_down();
    }
}
