//! End-to-end runs of the launcher against an in-memory sink.
//!
//! Interleaving across workers is unspecified, so comparisons are made on
//! sorted line sets; order is only checked within a single worker.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use clap::Parser;

use prime_chunks::io::OutputLine;
use prime_chunks::{is_prime, Config, ExecutorKind, Launcher, MemorySink, WorkerId};

// =============================================================================
// Helpers
// =============================================================================

fn run(config: Config) -> Arc<MemorySink> {
    let sink = Arc::new(MemorySink::new());
    Launcher::new(config, sink.clone(), None)
        .run()
        .expect("benchmark run");
    sink
}

fn sorted_prime_lines(sink: &MemorySink) -> Vec<String> {
    let mut lines = sink.prime_lines();
    lines.sort();
    lines
}

fn values_by_worker(sink: &MemorySink) -> BTreeMap<WorkerId, Vec<u64>> {
    let mut by_worker: BTreeMap<WorkerId, Vec<u64>> = BTreeMap::new();
    for (worker, value) in sink.primes() {
        by_worker.entry(worker).or_default().push(value);
    }
    by_worker
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn twenty_values_two_workers() {
    let config = Config::parse_from(["prime-chunks", "--series", "20", "--threads", "2"]);
    let sink = run(config);

    let mut expected = vec![
        "Thread-1: 0",
        "Thread-1: 1",
        "Thread-1: 2",
        "Thread-1: 3",
        "Thread-1: 5",
        "Thread-1: 7",
        "Thread-2: 11",
        "Thread-2: 13",
        "Thread-2: 17",
        "Thread-2: 19",
    ];
    expected.sort();
    assert_eq!(sorted_prime_lines(&sink), expected);
}

#[test]
fn uneven_division_never_scans_remainder() {
    // 20 and 21 are not prime, so use a remainder that holds a prime: 23
    let sink = run(Config::new(24, 5));
    assert!(sink.primes().iter().all(|&(_, v)| v < 20));

    let sink = run(Config::new(21, 2));
    assert!(sink.primes().iter().all(|&(_, v)| v != 20));
    assert_eq!(sink.primes().len(), 10);
}

#[test]
fn within_worker_output_is_ascending() {
    let sink = run(Config::new(200_000, 4));
    for (worker, values) in values_by_worker(&sink) {
        assert!(
            values.windows(2).all(|w| w[0] < w[1]),
            "{} emitted out of order",
            worker
        );
    }
}

#[test]
fn every_emitted_value_belongs_to_its_chunk() {
    let config = Config::new(10_000, 7);
    let chunk = config.series / config.threads as u64;
    let sink = run(config);

    for (worker, value) in sink.primes() {
        let start = worker.as_usize() as u64 * chunk;
        assert!(value >= start && value < start + chunk);
        assert!(is_prime(value));
    }
}

#[test]
fn repeated_runs_emit_the_same_set() {
    let first: BTreeSet<String> = run(Config::new(50_000, 4)).prime_lines().into_iter().collect();
    let second: BTreeSet<String> = run(Config::new(50_000, 4)).prime_lines().into_iter().collect();
    assert_eq!(first, second);
}

#[test]
fn executors_emit_the_same_set() {
    let threads = run(Config::new(30_000, 6));
    let pool = run(Config::new(30_000, 6).with_executor(ExecutorKind::Pool));
    assert_eq!(sorted_prime_lines(&threads), sorted_prime_lines(&pool));
}

#[test]
fn summary_follows_all_prime_lines() {
    for executor in [ExecutorKind::Threads, ExecutorKind::Pool] {
        let sink = run(Config::new(100_000, 4).with_executor(executor));
        let lines = sink.lines();

        let summary_at = lines
            .iter()
            .position(|l| matches!(l, OutputLine::Diagnostic(d) if d.contains("Threads took")))
            .expect("summary line");
        let last_prime_at = lines
            .iter()
            .rposition(|l| matches!(l, OutputLine::Prime { .. }))
            .expect("prime lines");

        assert!(summary_at > last_prime_at);
        assert_eq!(summary_at, lines.len() - 1);
    }
}

#[test]
fn created_lines_precede_summary_in_worker_order() {
    let sink = run(Config::new(40, 4));
    let diagnostics = sink.diagnostics();
    assert_eq!(
        &diagnostics[..4],
        &[
            "Created Thread-1 with start=0, stop=10",
            "Created Thread-2 with start=10, stop=20",
            "Created Thread-3 with start=20, stop=30",
            "Created Thread-4 with start=30, stop=40",
        ]
    );

    let summary = &diagnostics[4];
    let secs = summary
        .strip_prefix("4 Threads took ")
        .and_then(|s| s.strip_suffix(" seconds to complete"))
        .expect("summary format");
    let (_, fraction) = secs.split_once('.').expect("decimal point");
    assert_eq!(fraction.len(), 6);
}
