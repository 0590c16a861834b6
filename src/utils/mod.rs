//! # Utilities Module
//!
//! ## Role
//! Cross-cutting helpers that don't belong in domain-specific modules.
//!
//! ## Sub-modules
//! - `latch`: Counting completion latch (the fork-join barrier)
//! - `stopwatch`: Wall-clock timing of the parallel phase
//! - `telemetry`: Atomic progress counters and the heartbeat reporter
//! - `threading`: Named thread and rayon pool construction

pub mod latch;
pub mod stopwatch;
pub mod telemetry;
pub mod threading;
