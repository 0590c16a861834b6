//! # Ranges and Partitioning
//!
//! Splits `[0, series)` into `n_workers` equal contiguous chunks.
//! `chunk_size` is floor division, so the last `series % n_workers` numbers
//! are never assigned to any worker.

use std::fmt;

use crate::data::WorkerId;

/// Half-open integer range `[start, stop)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: u64,
    pub stop: u64,
}

impl Range {
    pub fn new(start: u64, stop: u64) -> Self {
        debug_assert!(start <= stop, "range start {} past stop {}", start, stop);
        Self { start, stop }
    }

    pub fn len(&self) -> u64 {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.stop
    }

    pub fn contains(&self, n: u64) -> bool {
        self.start <= n && n < self.stop
    }
}

impl IntoIterator for Range {
    type Item = u64;
    type IntoIter = std::ops::Range<u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.start..self.stop
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "start={}, stop={}", self.start, self.stop)
    }
}

/// The per-worker chunks of `[0, series)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    series: u64,
    chunk_size: u64,
    ranges: Vec<Range>,
}

impl Partition {
    /// Divide `[0, series)` into `n_workers` chunks of `series / n_workers`.
    ///
    /// `n_workers` must be positive; the caller validates it via `Config`.
    pub fn new(series: u64, n_workers: usize) -> Self {
        debug_assert!(n_workers > 0);
        let chunk_size = series / n_workers.max(1) as u64;
        let ranges = (0..n_workers as u64)
            .map(|i| {
                let start = i * chunk_size;
                Range::new(start, start + chunk_size)
            })
            .collect();

        Self {
            series,
            chunk_size,
            ranges,
        }
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn n_workers(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// Range assigned to a worker
    pub fn range(&self, worker: WorkerId) -> Option<Range> {
        self.ranges.get(worker.as_usize()).copied()
    }

    /// Iterate `(worker, range)` pairs in worker order
    pub fn assignments(&self) -> impl Iterator<Item = (WorkerId, Range)> + '_ {
        self.ranges
            .iter()
            .enumerate()
            .map(|(i, r)| (WorkerId::new(i), *r))
    }

    /// Number of values covered by some worker, `chunk_size * n_workers`
    pub fn covered(&self) -> u64 {
        self.chunk_size * self.ranges.len() as u64
    }

    /// Tail of the series that no worker scans
    pub fn dropped(&self) -> Range {
        Range::new(self.covered(), self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_partition() {
        let p = Partition::new(20, 2);
        assert_eq!(p.chunk_size(), 10);
        assert_eq!(p.ranges(), &[Range::new(0, 10), Range::new(10, 20)]);
        assert_eq!(p.covered(), 20);
        assert!(p.dropped().is_empty());
    }

    #[test]
    fn test_uneven_partition_drops_remainder() {
        let p = Partition::new(21, 2);
        assert_eq!(p.chunk_size(), 10);
        assert_eq!(p.covered(), 20);
        assert_eq!(p.dropped(), Range::new(20, 21));
        assert!(p.ranges().iter().all(|r| !r.contains(20)));
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        for (series, workers) in [(100_000_000, 4), (1_000, 7), (97, 10), (5, 5)] {
            let p = Partition::new(series, workers);
            let chunk = p.chunk_size();
            assert_eq!(p.n_workers(), workers);

            let mut expected_start = 0;
            for r in p.ranges() {
                assert_eq!(r.start, expected_start, "chunks must be contiguous");
                assert_eq!(r.len(), chunk);
                expected_start = r.stop;
            }
            assert_eq!(expected_start, chunk * workers as u64);
            assert_eq!(p.covered() + p.dropped().len(), series);
        }
    }

    #[test]
    fn test_more_workers_than_values() {
        let p = Partition::new(3, 8);
        assert_eq!(p.chunk_size(), 0);
        assert!(p.ranges().iter().all(Range::is_empty));
        assert_eq!(p.dropped(), Range::new(0, 3));
    }

    #[test]
    fn test_assignments_and_display() {
        let p = Partition::new(40, 4);
        let (id, range) = p.assignments().nth(2).unwrap();
        assert_eq!(id, WorkerId::new(2));
        assert_eq!(range.to_string(), "start=20, stop=30");
        assert_eq!(p.range(WorkerId::new(3)), Some(Range::new(30, 40)));
        assert_eq!(p.range(WorkerId::new(4)), None);
    }
}
