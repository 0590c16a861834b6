//! # I/O Module
//!
//! Output sinks for prime hits and diagnostic lines.

pub mod sink;

pub use sink::{MemorySink, OutputLine, OutputSink, StdoutSink};
