//! # Pipeline Module
//!
//! Fork-join orchestration of the scan: the launcher partitions the series
//! and starts one worker per chunk.

pub mod launcher;
pub mod worker;

pub use launcher::{Launcher, RunReport};
pub use worker::Worker;
