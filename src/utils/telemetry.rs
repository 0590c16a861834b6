//! # Telemetry Blackboard
//!
//! Thread-safe progress tracking for a scan. Workers bump atomic counters in
//! batches; an optional heartbeat thread periodically reads them and reports
//! progress on stderr.
//!
//! The blackboard pattern decouples work execution from progress reporting:
//! - Worker threads update atomic counters with minimal overhead
//! - A background heartbeat thread periodically reads and reports progress

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::utils::threading::spawn_named;

/// Processing stage for high-level progress tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Stage {
    Initializing = 0,
    Partitioning = 1,
    Scanning = 2,
    Complete = 3,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Initializing => "Initializing",
            Stage::Partitioning => "Partitioning",
            Stage::Scanning => "Scanning",
            Stage::Complete => "Complete",
        }
    }

    fn from_u64(val: u64) -> Self {
        match val {
            0 => Stage::Initializing,
            1 => Stage::Partitioning,
            2 => Stage::Scanning,
            _ => Stage::Complete,
        }
    }
}

/// Global telemetry state - designed for cheap atomic updates from hot loops.
///
/// All fields use relaxed ordering since we only need eventual visibility,
/// not strict synchronization. The heartbeat thread reads approximate values.
pub struct TelemetryBlackboard {
    stage: AtomicU64,

    total_numbers: AtomicU64,
    numbers_scanned: AtomicU64,
    primes_found: AtomicU64,

    total_workers: AtomicU64,
    workers_finished: AtomicU64,

    start_time: Instant,
    last_progress_nanos: AtomicU64,

    shutdown: AtomicBool,
}

impl TelemetryBlackboard {
    /// Create a new telemetry blackboard
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    pub fn set_stage(&self, stage: Stage) {
        self.stage.store(stage as u64, Ordering::Relaxed);
        self.touch_progress();
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::from_u64(self.stage.load(Ordering::Relaxed))
    }

    /// Reset counters for a scan of `total_numbers` values across `workers`
    pub fn begin_scan(&self, total_numbers: u64, workers: u64) {
        self.total_numbers.store(total_numbers, Ordering::Relaxed);
        self.total_workers.store(workers, Ordering::Relaxed);
        self.numbers_scanned.store(0, Ordering::Relaxed);
        self.primes_found.store(0, Ordering::Relaxed);
        self.workers_finished.store(0, Ordering::Relaxed);
        self.set_stage(Stage::Scanning);
    }

    /// Record a finished batch of scanned values and the hits within it
    #[inline]
    pub fn record_batch(&self, scanned: u64, primes: u64) {
        self.numbers_scanned.fetch_add(scanned, Ordering::Relaxed);
        self.primes_found.fetch_add(primes, Ordering::Relaxed);
        self.touch_progress();
    }

    #[inline]
    pub fn worker_finished(&self) {
        self.workers_finished.fetch_add(1, Ordering::Relaxed);
        self.touch_progress();
    }

    pub fn numbers_scanned(&self) -> u64 {
        self.numbers_scanned.load(Ordering::Relaxed)
    }

    pub fn primes_found(&self) -> u64 {
        self.primes_found.load(Ordering::Relaxed)
    }

    pub fn workers_finished(&self) -> u64 {
        self.workers_finished.load(Ordering::Relaxed)
    }

    // === Timing ===

    #[inline]
    fn touch_progress(&self) {
        let elapsed = self.start_time.elapsed().as_nanos() as u64;
        self.last_progress_nanos.store(elapsed, Ordering::Relaxed);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    // === Snapshot for Heartbeat ===

    fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            stage: self.stage(),
            total_numbers: self.total_numbers.load(Ordering::Relaxed),
            numbers_scanned: self.numbers_scanned(),
            primes_found: self.primes_found(),
            total_workers: self.total_workers.load(Ordering::Relaxed),
            workers_finished: self.workers_finished(),
            elapsed_secs: self.elapsed_secs(),
            last_progress_nanos: self.last_progress_nanos.load(Ordering::Relaxed),
            current_nanos: self.start_time.elapsed().as_nanos() as u64,
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl Default for TelemetryBlackboard {
    fn default() -> Self {
        Self {
            stage: AtomicU64::new(Stage::Initializing as u64),
            total_numbers: AtomicU64::new(0),
            numbers_scanned: AtomicU64::new(0),
            primes_found: AtomicU64::new(0),
            total_workers: AtomicU64::new(0),
            workers_finished: AtomicU64::new(0),
            start_time: Instant::now(),
            last_progress_nanos: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        }
    }
}

/// Snapshot of telemetry state at a point in time
struct TelemetrySnapshot {
    stage: Stage,
    total_numbers: u64,
    numbers_scanned: u64,
    primes_found: u64,
    total_workers: u64,
    workers_finished: u64,
    elapsed_secs: f64,
    last_progress_nanos: u64,
    current_nanos: u64,
}

impl TelemetrySnapshot {
    fn progress_pct(&self) -> f64 {
        if self.total_numbers > 0 {
            (self.numbers_scanned as f64 / self.total_numbers as f64 * 100.0).min(100.0)
        } else {
            0.0
        }
    }
}

/// Heartbeat output configuration
pub struct HeartbeatConfig {
    /// Interval between heartbeats (seconds)
    pub interval_secs: u64,
    /// Stall warning threshold (seconds with no progress)
    pub stall_threshold_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            stall_threshold_secs: 120,
        }
    }
}

/// Handle to the heartbeat thread
pub struct HeartbeatHandle {
    handle: Option<JoinHandle<()>>,
    blackboard: Arc<TelemetryBlackboard>,
}

impl HeartbeatHandle {
    /// Spawn the heartbeat thread
    pub fn spawn(blackboard: Arc<TelemetryBlackboard>, config: HeartbeatConfig) -> Result<Self> {
        let bb = blackboard.clone();
        let is_tty = io::stderr().is_terminal();

        let handle = spawn_named("heartbeat".to_string(), move || {
            heartbeat_loop(bb, config, is_tty);
        })?;

        Ok(Self {
            handle: Some(handle),
            blackboard,
        })
    }

    /// Signal shutdown and wait for thread to finish
    pub fn shutdown(mut self) {
        self.blackboard.signal_shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        // Don't block in drop - just signal shutdown
        self.blackboard.signal_shutdown();
    }
}

/// Get RSS memory usage in MB (Linux only)
fn get_rss_mb() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/self/statm")
            .ok()
            .and_then(|s| {
                let parts: Vec<&str> = s.split_whitespace().collect();
                // Second field is RSS in pages
                parts.get(1)?.parse::<u64>().ok()
            })
            .map(|pages| pages * 4096 / (1024 * 1024))
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Format duration in human-readable form
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.0}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{:.0}m{:.0}s", mins, remaining_secs)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

/// Sleep for `interval`, waking early on shutdown. Returns `false` on shutdown.
///
/// An interval too large to represent as an `Instant` never expires.
fn sleep_unless_shutdown(bb: &TelemetryBlackboard, interval: Duration) -> bool {
    const SLICE: Duration = Duration::from_millis(50);
    let deadline = Instant::now().checked_add(interval);
    loop {
        if bb.is_shutdown() {
            return false;
        }
        let remaining = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return true;
                }
                deadline - now
            }
            None => SLICE,
        };
        thread::sleep(SLICE.min(remaining));
    }
}

/// Main heartbeat loop
fn heartbeat_loop(bb: Arc<TelemetryBlackboard>, config: HeartbeatConfig, is_tty: bool) {
    let interval = Duration::from_secs(config.interval_secs);
    let mut last_scanned = 0u64;
    let mut last_time = Instant::now();

    while sleep_unless_shutdown(&bb, interval) {
        let snap = bb.snapshot();
        if snap.stage == Stage::Complete {
            break;
        }

        // Numbers per second since the previous beat
        let now = Instant::now();
        let dt = now.duration_since(last_time).as_secs_f64();
        let velocity = if dt > 0.1 {
            snap.numbers_scanned.saturating_sub(last_scanned) as f64 / dt
        } else {
            0.0
        };
        last_scanned = snap.numbers_scanned;
        last_time = now;

        // Trial division slows down as values grow, so this ETA is optimistic
        let eta_str = if velocity > 0.0 && snap.total_numbers > snap.numbers_scanned {
            let remaining = snap.total_numbers - snap.numbers_scanned;
            format_duration(remaining as f64 / velocity)
        } else {
            "unknown".to_string()
        };

        let stall_secs =
            snap.current_nanos.saturating_sub(snap.last_progress_nanos) / 1_000_000_000;
        let is_stalled = stall_secs > config.stall_threshold_secs;

        let rss_mb = get_rss_mb();

        if is_tty {
            print_tty_progress(&snap, &eta_str, rss_mb, velocity, is_stalled);
        } else {
            print_log_progress(&snap, &eta_str, rss_mb, velocity, is_stalled);
        }
    }

    // Clear TTY line on shutdown
    if is_tty {
        eprint!("\r\x1b[K");
        let _ = io::stderr().flush();
    }
}

/// Print progress for TTY (rewriting single line)
fn print_tty_progress(
    snap: &TelemetrySnapshot,
    eta: &str,
    rss_mb: Option<u64>,
    velocity: f64,
    is_stalled: bool,
) {
    let progress_pct = snap.progress_pct();

    let bar_width = 20;
    let filled = ((progress_pct / 100.0) * bar_width as f64) as usize;
    let bar: String = "=".repeat(filled.min(bar_width))
        + &" ".repeat(bar_width.saturating_sub(filled));

    let mem_str = rss_mb.map(|mb| format!(" {}MB", mb)).unwrap_or_default();
    let stall_str = if is_stalled { " [STALLED]" } else { "" };

    eprint!(
        "\r[{}] {:>5.1}% | {} W{}/{} | {} primes | {:.0} n/s | {} | ETA: {}{}{}    \x1b[K",
        bar,
        progress_pct,
        snap.stage.as_str(),
        snap.workers_finished,
        snap.total_workers,
        snap.primes_found,
        velocity,
        format_duration(snap.elapsed_secs),
        eta,
        mem_str,
        stall_str
    );
    let _ = io::stderr().flush();
}

/// Print progress for non-TTY (structured log line)
fn print_log_progress(
    snap: &TelemetrySnapshot,
    eta: &str,
    rss_mb: Option<u64>,
    velocity: f64,
    is_stalled: bool,
) {
    eprintln!(
        "[HEARTBEAT] stage=\"{}\" scanned={}/{} primes={} workers={}/{} \
         velocity={:.0}/s elapsed={:.0}s eta={} rss_mb={} stalled={}",
        snap.stage.as_str(),
        snap.numbers_scanned,
        snap.total_numbers,
        snap.primes_found,
        snap.workers_finished,
        snap.total_workers,
        velocity,
        snap.elapsed_secs,
        eta,
        rss_mb
            .map(|m| m.to_string())
            .unwrap_or_else(|| "?".to_string()),
        is_stalled
    );
}
