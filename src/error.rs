//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.

use thiserror::Error;

/// Main error type for prime-chunks operations
#[derive(Error, Debug)]
pub enum PrimeError {
    /// I/O errors (closed stdout/stderr, broken pipe)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (zero series size, zero workers)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The OS refused to start a worker thread or build the pool
    #[error("Failed to start {worker}: {message}")]
    Spawn { worker: String, message: String },

    /// A worker body returned an error
    #[error("{worker} failed: {message}")]
    Worker { worker: String, message: String },
}

/// Type alias for Results using PrimeError
pub type Result<T> = std::result::Result<T, PrimeError>;

impl PrimeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a spawn error for the named worker
    pub fn spawn(worker: impl Into<String>, message: impl ToString) -> Self {
        Self::Spawn {
            worker: worker.into(),
            message: message.to_string(),
        }
    }

    /// Create a worker failure
    pub fn worker(worker: impl Into<String>, message: impl ToString) -> Self {
        Self::Worker {
            worker: worker.into(),
            message: message.to_string(),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for PrimeError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::spawn("thread pool", err)
    }
}
