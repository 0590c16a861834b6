//! # Worker
//!
//! Scans one half-open range in ascending order and writes every hit to the
//! sink as `<label>: <value>`. There is no cancellation: a worker runs to the
//! end of its range unless the sink fails.

use tracing::{debug, info_span};

use crate::data::{Range, WorkerId};
use crate::error::{PrimeError, Result};
use crate::io::OutputSink;
use crate::model::scan_range;
use crate::utils::telemetry::TelemetryBlackboard;

/// Values scanned between telemetry updates
const PROGRESS_BATCH: u64 = 1 << 16;

/// One worker and the range it owns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Worker {
    id: WorkerId,
    range: Range,
}

impl Worker {
    pub fn new(id: WorkerId, range: Range) -> Self {
        Self { id, range }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn label(&self) -> String {
        self.id.label()
    }

    /// Scan the whole range, returning the number of primes emitted.
    ///
    /// Progress is published to `telemetry` once per batch of values so the
    /// hot loop stays free of shared writes.
    pub fn run<S>(&self, sink: &S, telemetry: Option<&TelemetryBlackboard>) -> Result<u64>
    where
        S: OutputSink + ?Sized,
    {
        let _span = info_span!(
            "worker",
            label = %self.id,
            start = self.range.start,
            stop = self.range.stop
        )
        .entered();

        let mut hits = 0;
        let mut start = self.range.start;
        while start < self.range.stop {
            let stop = start.saturating_add(PROGRESS_BATCH).min(self.range.stop);
            let batch = Range::new(start, stop);

            let batch_hits = scan_range(batch, |n| sink.prime(self.id, n))
                .map_err(|e| PrimeError::worker(self.label(), e))?;
            hits += batch_hits;

            if let Some(bb) = telemetry {
                bb.record_batch(batch.len(), batch_hits);
            }
            start = stop;
        }

        if let Some(bb) = telemetry {
            bb.worker_finished();
        }
        debug!(primes = hits, "worker finished");
        Ok(hits)
    }
}
