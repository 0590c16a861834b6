//! # Partitioner / Launcher
//!
//! Fork-join orchestration: split `[0, series)` into one chunk per worker,
//! start every worker concurrently, block on the completion latch, then
//! report the elapsed wall-clock time.
//!
//! Diagnostic output (one `Created ...` line per worker, one summary line)
//! goes to the sink's diagnostic stream. The summary is written only after
//! the latch has opened, i.e. after every worker's last prime line.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::config::{Config, ExecutorKind};
use crate::data::{Partition, WorkerId};
use crate::error::{PrimeError, Result};
use crate::io::OutputSink;
use crate::pipelines::worker::Worker;
use crate::utils::latch::CompletionLatch;
use crate::utils::stopwatch::{format_secs, Stopwatch};
use crate::utils::telemetry::{Stage, TelemetryBlackboard};
use crate::utils::threading::{available_cores, build_thread_pool, spawn_named};

type WorkerResult = (WorkerId, Result<u64>);

/// Outcome of one benchmark run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub partition: Partition,
    /// Wall-clock time from before the first launch until the latch opened
    pub elapsed: Duration,
    /// Primes emitted by each worker, indexed by worker
    pub primes_per_worker: Vec<u64>,
}

impl RunReport {
    pub fn total_primes(&self) -> u64 {
        self.primes_per_worker.iter().sum()
    }

    /// `<N> Threads took <secs> seconds to complete`
    pub fn summary_line(&self) -> String {
        format!(
            "{} Threads took {} seconds to complete",
            self.partition.n_workers(),
            format_secs(self.elapsed)
        )
    }
}

pub struct Launcher<S: OutputSink + 'static> {
    config: Config,
    sink: Arc<S>,
    telemetry: Option<Arc<TelemetryBlackboard>>,
}

impl<S: OutputSink + 'static> Launcher<S> {
    pub fn new(config: Config, sink: Arc<S>, telemetry: Option<Arc<TelemetryBlackboard>>) -> Self {
        Self {
            config,
            sink,
            telemetry,
        }
    }

    /// Run the benchmark to completion
    #[instrument(
        name = "launch",
        skip(self),
        fields(
            series = self.config.series,
            threads = self.config.threads,
            executor = self.config.executor.as_str()
        )
    )]
    pub fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        self.set_stage(Stage::Partitioning);

        let partition = Partition::new(self.config.series, self.config.threads);
        let dropped = partition.dropped();
        if !dropped.is_empty() {
            debug!(
                start = dropped.start,
                stop = dropped.stop,
                "remainder not assigned to any worker"
            );
        }
        let cores = available_cores();
        if partition.n_workers() > cores {
            debug!(workers = partition.n_workers(), cores, "more workers than cores");
        }
        if let Some(bb) = &self.telemetry {
            bb.begin_scan(partition.covered(), partition.n_workers() as u64);
        }

        let latch = CompletionLatch::new(partition.n_workers());
        let (tx, rx) = mpsc::channel::<WorkerResult>();

        let elapsed = match self.config.executor {
            ExecutorKind::Threads => {
                let mut watch = Stopwatch::start();
                let handles = self.launch_threads(&partition, &latch, &tx)?;
                drop(tx);
                latch.wait();
                let elapsed = watch.stop();

                // Every worker has counted down; joining only surfaces panics
                for handle in handles {
                    if let Err(payload) = handle.join() {
                        panic::resume_unwind(payload);
                    }
                }
                elapsed
            }
            ExecutorKind::Pool => {
                let pool = build_thread_pool(partition.n_workers())?;
                let mut watch = Stopwatch::start();
                self.launch_pool(&pool, &partition, &latch, &tx)?;
                drop(tx);
                latch.wait();
                watch.stop()
            }
        };

        let mut primes_per_worker = vec![0; partition.n_workers()];
        let mut first_error = None;
        for (id, result) in rx.try_iter() {
            match result {
                Ok(hits) => primes_per_worker[id.as_usize()] = hits,
                Err(e) => {
                    warn!(worker = %id, error = %e, "worker failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        self.set_stage(Stage::Complete);
        if let Some(e) = first_error {
            return Err(e);
        }

        let report = RunReport {
            partition,
            elapsed,
            primes_per_worker,
        };
        self.sink.diagnostic(&report.summary_line())?;
        debug!(total_primes = report.total_primes(), "scan complete");

        Ok(report)
    }

    fn set_stage(&self, stage: Stage) {
        if let Some(bb) = &self.telemetry {
            bb.set_stage(stage);
        }
    }

    fn announce(&self, worker: &Worker) -> Result<()> {
        self.sink
            .diagnostic(&format!("Created {} with {}", worker.id(), worker.range()))?;
        Ok(())
    }

    /// One named OS thread per worker
    fn launch_threads(
        &self,
        partition: &Partition,
        latch: &Arc<CompletionLatch>,
        tx: &mpsc::Sender<WorkerResult>,
    ) -> Result<Vec<JoinHandle<()>>> {
        let mut handles = Vec::with_capacity(partition.n_workers());
        for (id, range) in partition.assignments() {
            let worker = Worker::new(id, range);
            self.announce(&worker)?;
            let task = self.worker_task(worker, latch, tx, false);
            handles.push(spawn_named(worker.label(), task)?);
        }
        Ok(handles)
    }

    /// One task per worker on a pool sized to the worker count
    fn launch_pool(
        &self,
        pool: &rayon::ThreadPool,
        partition: &Partition,
        latch: &Arc<CompletionLatch>,
        tx: &mpsc::Sender<WorkerResult>,
    ) -> Result<()> {
        for (id, range) in partition.assignments() {
            let worker = Worker::new(id, range);
            self.announce(&worker)?;
            // rayon aborts on an escaped panic, so pool tasks catch their own
            pool.spawn(self.worker_task(worker, latch, tx, true));
        }
        Ok(())
    }

    /// The worker body as run on its thread.
    ///
    /// The latch guard is the first local, so it is dropped last: after the
    /// result has been sent, and also while unwinding from a panic.
    fn worker_task(
        &self,
        worker: Worker,
        latch: &Arc<CompletionLatch>,
        tx: &mpsc::Sender<WorkerResult>,
        catch_panics: bool,
    ) -> impl FnOnce() + Send + 'static {
        let sink = Arc::clone(&self.sink);
        let telemetry = self.telemetry.clone();
        let latch = Arc::clone(latch);
        let tx = tx.clone();

        move || {
            let _done = latch.guard();
            let run = || worker.run(sink.as_ref(), telemetry.as_deref());
            let result = if catch_panics {
                panic::catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
                    Err(PrimeError::worker(worker.label(), panic_message(payload.as_ref())))
                })
            } else {
                run()
            };
            let _ = tx.send((worker.id(), result));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}
