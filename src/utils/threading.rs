//! # Threading Helpers
//!
//! Thread and thread-pool construction for the two executors. Spawn
//! failures (thread limits, memory) surface as `PrimeError::Spawn` instead
//! of panicking.

use std::num::NonZeroUsize;
use std::thread::{self, JoinHandle};

use crate::error::{PrimeError, Result};

/// Build a rayon pool with exactly `n_threads` threads.
pub fn build_thread_pool(n_threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("prime-pool-{}", i + 1))
        .build()
        .map_err(PrimeError::from)
}

/// Spawn a named OS thread, reporting failure as a spawn error.
pub fn spawn_named<F, T>(name: String, f: F) -> Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map_err(|e| PrimeError::spawn(name, e))
}

/// Number of cores the OS reports, 1 if unknown
pub fn available_cores() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
