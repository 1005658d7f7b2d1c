//! Multi-threaded file logging with rolling.
//!
//! cargo run -p kaos-log --release --example file_logger
//! cargo run -p kaos-log --release --example file_logger -- logger.toml
//!
//! Without a config file, writes to `./logs/file_logger.<time>.log`, rolling
//! every 1 MiB. Diagnostics from the writer thread go through tracing
//! (`RUST_LOG=kaos_log=debug` shows every roll).

use kaos_log::{log_debug, log_info, log_warn, Destination, Logger, LoggerConfig, MIB};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const THREADS: usize = 4;
const PER_THREAD: usize = 250_000;

fn main() -> kaos_log::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => LoggerConfig::load(path)?,
        None => LoggerConfig {
            log_dir: "logs".into(),
            basename: "file_logger".into(),
            destination: Destination::File,
            roll_size: MIB,
            ..LoggerConfig::default()
        },
    };

    let logger = Arc::new(Logger::new(&config)?);
    log_info!(logger, "starting {} threads x {} records", THREADS, PER_THREAD);

    let start = Instant::now();
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    log_debug!(logger, "thread {} record {} payload {:>32}", t, i, "x");
                }
            })
        })
        .collect();
    for h in handles {
        if h.join().is_err() {
            log_warn!(logger, "producer thread panicked");
        }
    }
    let elapsed = start.elapsed();

    let total = THREADS * PER_THREAD;
    log_info!(logger, "done in {:?}", elapsed);
    logger.stop();

    println!("Kaos Log File Logger");
    println!("====================");
    println!("{} records in {:?}", total, elapsed);
    println!(
        "{:.2} M records/s",
        total as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
    if let Some(pipeline) = logger.pipeline() {
        let stats = pipeline.stats();
        println!(
            "batches={} buffers={} bytes={} dropped={}",
            stats.batches(),
            stats.buffers_written(),
            stats.bytes_written(),
            stats.buffers_dropped()
        );
    }
    Ok(())
}
