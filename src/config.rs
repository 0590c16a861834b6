//! # Configuration Logic
//!
//! ## Role
//! The two benchmark constants and the CLI that can override them.
//!
//! Run without arguments the benchmark scans `[0, NUM_SERIES)` with
//! `NUM_THREADS` workers on dedicated OS threads. Everything else is an
//! ambient switch (profiling, progress heartbeat, executor choice).
//!
//! ## Validation
//! - `series > 0`
//! - `threads > 0`
//! - with `--progress`, `1 <= heartbeat-secs <= MAX_HEARTBEAT_SECS`
//!
//! ## Example CLI
//! ```bash
//! prime-chunks --series 1000000 --threads 8 --executor pool --progress
//! ```

use clap::{Parser, ValueEnum};

use crate::error::{PrimeError, Result};

/// Total size of the scanned range `[0, NUM_SERIES)`
pub const NUM_SERIES: u64 = 100_000_000;

/// Number of workers the range is split across
pub const NUM_THREADS: usize = 4;

/// Longest accepted progress interval (one day)
pub const MAX_HEARTBEAT_SECS: u64 = 86_400;

/// How workers are put onto OS threads
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExecutorKind {
    /// One dedicated, named OS thread per worker
    #[default]
    Threads,
    /// A fixed rayon pool with one thread per worker
    Pool,
}

impl ExecutorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutorKind::Threads => "threads",
            ExecutorKind::Pool => "pool",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "prime-chunks")]
#[command(about = "Fork-join prime search over equal contiguous chunks")]
#[command(version)]
pub struct Config {
    /// Total range size; numbers in [0, series) are scanned
    #[arg(long, default_value_t = NUM_SERIES)]
    pub series: u64,

    /// Number of workers (one chunk each)
    #[arg(long, default_value_t = NUM_THREADS)]
    pub threads: usize,

    /// Launch strategy for the workers
    #[arg(long, value_enum, default_value_t = ExecutorKind::Threads)]
    pub executor: ExecutorKind,

    /// Print tracing span timings to stderr
    #[arg(long)]
    pub profile: bool,

    /// Periodically report scan progress on stderr
    #[arg(long)]
    pub progress: bool,

    /// Interval between progress reports (seconds)
    #[arg(long, default_value_t = 5)]
    pub heartbeat_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(NUM_SERIES, NUM_THREADS)
    }
}

impl Config {
    /// Build a configuration for the given series size and worker count
    /// with every ambient switch off.
    pub fn new(series: u64, threads: usize) -> Self {
        Self {
            series,
            threads,
            executor: ExecutorKind::Threads,
            profile: false,
            progress: false,
            heartbeat_secs: 5,
        }
    }

    /// Builder-style executor override
    pub fn with_executor(mut self, executor: ExecutorKind) -> Self {
        self.executor = executor;
        self
    }

    /// Parse command line arguments and validate them
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.series == 0 {
            return Err(PrimeError::config("series must be a positive integer"));
        }
        if self.threads == 0 {
            return Err(PrimeError::config("threads must be a positive integer"));
        }
        if self.progress && !(1..=MAX_HEARTBEAT_SECS).contains(&self.heartbeat_secs) {
            return Err(PrimeError::config(format!(
                "heartbeat-secs must be between 1 and {}",
                MAX_HEARTBEAT_SECS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = Config::parse_from(["prime-chunks"]);
        assert_eq!(config.series, NUM_SERIES);
        assert_eq!(config.threads, NUM_THREADS);
        assert_eq!(config.executor, ExecutorKind::Threads);
        assert!(!config.profile);
        assert!(!config.progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::parse_from([
            "prime-chunks",
            "--series",
            "20",
            "--threads",
            "2",
            "--executor",
            "pool",
        ]);
        assert_eq!(config.series, 20);
        assert_eq!(config.threads, 2);
        assert_eq!(config.executor, ExecutorKind::Pool);
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(Config::new(0, 4).validate().is_err());
        assert!(Config::new(100, 0).validate().is_err());

        let mut config = Config::new(100, 4);
        config.progress = true;
        config.heartbeat_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_heartbeat_interval_only_checked_with_progress() {
        let config = Config::parse_from(["prime-chunks", "--heartbeat-secs", "0"]);
        assert!(config.validate().is_ok());

        let config = Config::parse_from([
            "prime-chunks",
            "--progress",
            "--heartbeat-secs",
            "18446744073709551615",
        ]);
        assert!(matches!(config.validate(), Err(PrimeError::Config { .. })));

        let config = Config::parse_from(["prime-chunks", "--progress", "--heartbeat-secs", "86400"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_more_threads_than_series_is_valid() {
        // chunk size becomes zero; every number is dropped, nothing fails
        assert!(Config::new(3, 8).validate().is_ok());
    }
}
