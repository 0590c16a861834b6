//! # prime-chunks: Fork-Join Prime Search Benchmark
//!
//! Splits `[0, 100_000_000)` across 4 workers, prints every prime found as
//! `Thread-<n>: <value>` on stdout and the elapsed time on stderr.
//!
//! ## Usage
//! ```bash
//! # Default benchmark
//! prime-chunks > primes.txt
//!
//! # Smaller run on a fixed-size pool, with progress and span timings
//! prime-chunks --series 1000000 --threads 8 --executor pool --progress --profile
//! ```

use std::sync::Arc;

use prime_chunks::config::Config;
use prime_chunks::io::StdoutSink;
use prime_chunks::pipelines::Launcher;
use prime_chunks::utils::telemetry::{HeartbeatConfig, HeartbeatHandle, TelemetryBlackboard};
use prime_chunks::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber for hierarchical profiling output
fn init_profiling() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime()),
        )
        .init();
}

fn run() -> Result<()> {
    let config = Config::parse_and_validate()?;

    if config.profile {
        init_profiling();
    }

    let telemetry = TelemetryBlackboard::new();
    let heartbeat = if config.progress {
        Some(HeartbeatHandle::spawn(
            telemetry.clone(),
            HeartbeatConfig {
                interval_secs: config.heartbeat_secs,
                ..HeartbeatConfig::default()
            },
        )?)
    } else {
        None
    };

    let launcher = Launcher::new(config, Arc::new(StdoutSink::new()), Some(telemetry));
    let outcome = launcher.run();

    if let Some(heartbeat) = heartbeat {
        heartbeat.shutdown();
    }
    outcome.map(|_| ())
}
