//! # Output Sinks
//!
//! Workers report hits as `<label>: <value>` on the primary stream; the
//! launcher writes `Created ...` and the timing summary on the diagnostic
//! stream. `StdoutSink` maps these to stdout/stderr. `MemorySink` keeps them
//! in arrival order for library callers and tests.
//!
//! Lines from different workers interleave in unspecified order. Each line
//! is written whole under the stream lock.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::data::WorkerId;

/// Destination for prime hits and diagnostic lines
pub trait OutputSink: Send + Sync {
    /// Emit one prime found by `worker`
    fn prime(&self, worker: WorkerId, value: u64) -> io::Result<()>;

    /// Emit one diagnostic line (no trailing newline)
    fn diagnostic(&self, line: &str) -> io::Result<()>;
}

/// Primes to stdout, diagnostics to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for StdoutSink {
    fn prime(&self, worker: WorkerId, value: u64) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}: {}", worker, value)
    }

    fn diagnostic(&self, line: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "{}", line)
    }
}

/// One line captured by a [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Prime { worker: WorkerId, value: u64 },
    Diagnostic(String),
}

impl OutputLine {
    /// The line as it would appear on its stream
    pub fn render(&self) -> String {
        match self {
            OutputLine::Prime { worker, value } => format!("{}: {}", worker, value),
            OutputLine::Diagnostic(line) => line.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    lines: Vec<OutputLine>,
    primes_written: usize,
}

/// Collects every line in memory, in the order the sink received them
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose prime writes fail with `BrokenPipe` once `n` primes
    /// have been accepted
    pub fn failing_after(n: usize) -> Self {
        Self {
            state: Mutex::default(),
            fail_after: Some(n),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All captured lines in arrival order
    pub fn lines(&self) -> Vec<OutputLine> {
        self.lock().lines.clone()
    }

    /// `(worker, value)` for every prime line, in arrival order
    pub fn primes(&self) -> Vec<(WorkerId, u64)> {
        self.lock()
            .lines
            .iter()
            .filter_map(|line| match line {
                OutputLine::Prime { worker, value } => Some((*worker, *value)),
                OutputLine::Diagnostic(_) => None,
            })
            .collect()
    }

    /// Rendered prime lines (`Thread-1: 7`), in arrival order
    pub fn prime_lines(&self) -> Vec<String> {
        self.lock()
            .lines
            .iter()
            .filter(|line| matches!(line, OutputLine::Prime { .. }))
            .map(OutputLine::render)
            .collect()
    }

    /// Diagnostic lines, in arrival order
    pub fn diagnostics(&self) -> Vec<String> {
        self.lock()
            .lines
            .iter()
            .filter_map(|line| match line {
                OutputLine::Diagnostic(text) => Some(text.clone()),
                OutputLine::Prime { .. } => None,
            })
            .collect()
    }
}

impl OutputSink for MemorySink {
    fn prime(&self, worker: WorkerId, value: u64) -> io::Result<()> {
        let mut state = self.lock();
        if let Some(limit) = self.fail_after {
            if state.primes_written >= limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"));
            }
        }
        state.primes_written += 1;
        state.lines.push(OutputLine::Prime { worker, value });
        Ok(())
    }

    fn diagnostic(&self, line: &str) -> io::Result<()> {
        self.lock().lines.push(OutputLine::Diagnostic(line.to_string()));
        Ok(())
    }
}
