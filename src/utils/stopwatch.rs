//! Wall-clock stopwatch around the parallel phase.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
    stop: Option<Instant>,
}

impl Stopwatch {
    /// Start timing now
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            stop: None,
        }
    }

    /// Freeze the stopwatch and return the elapsed time.
    ///
    /// Calling `stop` again keeps the first stop time.
    pub fn stop(&mut self) -> Duration {
        let stop = *self.stop.get_or_insert_with(Instant::now);
        stop.duration_since(self.start)
    }
}

/// Seconds with microsecond precision, e.g. `1.234567`
pub fn format_secs(elapsed: Duration) -> String {
    format!("{:.6}", elapsed.as_secs_f64())
}
