//! # Data Module
//!
//! In-memory representations of the scanned domain: half-open ranges, the
//! partition of the full series into per-worker chunks, and worker identity.

pub mod range;

pub use range::{Partition, Range};

use std::fmt;

/// Zero-cost newtype for worker indices (0-based)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WorkerId(pub usize);

impl WorkerId {
    pub fn new(idx: usize) -> Self {
        Self(idx)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Label used to attribute output lines, `Thread-<i+1>`
    pub fn label(self) -> String {
        format!("Thread-{}", self.0 + 1)
    }
}

impl From<usize> for WorkerId {
    fn from(idx: usize) -> Self {
        Self(idx)
    }
}

impl From<WorkerId> for usize {
    fn from(id: WorkerId) -> usize {
        id.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thread-{}", self.0 + 1)
    }
}
