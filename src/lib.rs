//! # prime-chunks Library
//!
//! Fork-join prime search benchmark. The range `[0, series)` is split into
//! equal contiguous chunks, one per worker; each worker tests every value of
//! its chunk by trial division and reports hits.
//!
//! ## Modules
//! - `config`: The two benchmark constants and CLI overrides
//! - `data`: Ranges, partitions, worker identity
//! - `error`: Error types and result aliases
//! - `io`: Output sinks (stdout/stderr, in-memory)
//! - `model`: Trial-division primality test
//! - `pipelines`: Launcher and worker orchestration
//! - `utils`: Completion latch, stopwatch, telemetry, threading

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod model;
pub mod pipelines;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, ExecutorKind, NUM_SERIES, NUM_THREADS};
pub use data::{Partition, Range, WorkerId};
pub use error::{PrimeError, Result};
pub use io::{MemorySink, OutputSink, StdoutSink};
pub use model::is_prime;
pub use pipelines::{Launcher, RunReport, Worker};
