//! Asynchronous logging pipeline (double buffering, single writer thread).
//!
//! ```text
//! append() ──► current ──(full)──► pending ──(swap)──► writer thread ──► RollingFile
//!                 ▲                                         │
//!                 └──── next / standby ◄──── recycled ◄─────┘
//! ```
//!
//! Producers copy records into `current` under one short lock. The writer
//! thread wakes when a buffer fills or every `flush_interval`, takes every
//! filled buffer in one swap and writes them outside the lock. Two buffers
//! live on the producer side (`current`, `next`) and two on the writer side
//! (`spare1`, `spare2`), so a steady state swap never allocates.

use crate::buffer::{FixedBuffer, SMALL_BUFFER};
use crate::clock::{Clock, SystemClock};
use crate::diag::{diag_error, diag_warn};
use crate::disk::{FileStorage, Storage};
use crate::error::{LogError, Result};
use crate::latch::CountDownLatch;
use crate::rolling::{RollConfig, RollingFile};
use crate::sync::{Backend, Monitor, ParkingLotBackend};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Queued buffers above which the writer starts dropping.
pub const DROP_THRESHOLD: usize = 25;
/// Buffers kept from an overloaded batch.
pub const KEEP_ON_DROP: usize = 2;
/// Writer-side wall-clock check cadence.
pub const WRITER_CHECK_EVERY_N: u32 = 256;

type BufferPtr = Box<FixedBuffer>;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bytes per buffer; also the largest record accepted.
    pub buffer_capacity: usize,
    /// Writer wake-up period when no buffer fills.
    pub flush_interval: Duration,
    /// Policy for the writer's rolling file.
    pub roll: RollConfig,
    pub drop_threshold: usize,
    pub keep_on_drop: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: SMALL_BUFFER,
            flush_interval: Duration::from_secs(3),
            roll: RollConfig::default().with_check_every_n(WRITER_CHECK_EVERY_N),
            drop_threshold: DROP_THRESHOLD,
            keep_on_drop: KEEP_ON_DROP,
        }
    }
}

impl PipelineConfig {
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_roll(mut self, roll: RollConfig) -> Self {
        self.roll = roll;
        self
    }

    pub fn with_roll_size(mut self, roll_size: u64) -> Self {
        self.roll.roll_size = roll_size;
        self
    }

    pub fn with_drop_policy(mut self, threshold: usize, keep: usize) -> Self {
        self.drop_threshold = threshold;
        self.keep_on_drop = keep;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(LogError::config("buffer capacity must be greater than 0"));
        }
        if self.flush_interval.is_zero() {
            return Err(LogError::config("flush interval must be greater than 0"));
        }
        if self.keep_on_drop > self.drop_threshold {
            return Err(LogError::config("keep_on_drop cannot exceed drop_threshold"));
        }
        self.roll.validate()
    }
}

/// Lifecycle of the writer thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum State {
    Stopped = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

impl State {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => State::Starting,
            2 => State::Running,
            3 => State::Stopping,
            _ => State::Stopped,
        }
    }
}

/// Counters mirroring what the writer reports on the diagnostic channel.
#[derive(Debug, Default)]
pub struct PipelineStats {
    batches: AtomicU64,
    buffers_written: AtomicU64,
    bytes_written: AtomicU64,
    buffers_dropped: AtomicU64,
    oversized_records: AtomicU64,
    records_refused: AtomicU64,
    buffers_allocated: AtomicU64,
}

impl PipelineStats {
    /// Writer iterations that wrote at least one buffer.
    pub fn batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    pub fn buffers_written(&self) -> u64 {
        self.buffers_written.load(Ordering::Relaxed)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Buffers discarded by the overload policy.
    pub fn buffers_dropped(&self) -> u64 {
        self.buffers_dropped.load(Ordering::Relaxed)
    }

    /// Records larger than a whole buffer, never written.
    pub fn oversized_records(&self) -> u64 {
        self.oversized_records.load(Ordering::Relaxed)
    }

    /// Records refused while stopped because the backlog was full.
    pub fn records_refused(&self) -> u64 {
        self.records_refused.load(Ordering::Relaxed)
    }

    /// Buffers allocated over the pipeline's lifetime.
    pub fn buffers_allocated(&self) -> u64 {
        self.buffers_allocated.load(Ordering::Relaxed)
    }
}

/// Producer-side state, guarded by the handoff monitor.
struct Handoff {
    current: BufferPtr,
    next: Option<BufferPtr>,
    pending: Vec<BufferPtr>,
}

struct Shared<B: Backend> {
    handoff: B::Monitor<Handoff>,
    running: AtomicBool,
    state: AtomicU8,
    stats: PipelineStats,
    reported: Reported,
    config: PipelineConfig,
}

/// Producer-side drops already reported. Producers only count; the writer
/// thread turns the counts into diagnostics.
#[derive(Default)]
struct Reported {
    oversized: AtomicU64,
    refused: AtomicU64,
}

impl Reported {
    fn report(&self, stats: &PipelineStats) {
        let oversized = stats.oversized_records();
        let before = self.oversized.swap(oversized, Ordering::Relaxed);
        if oversized > before {
            diag_warn!("dropped {} log records larger than a buffer", oversized - before);
        }

        let refused = stats.records_refused();
        let before = self.refused.swap(refused, Ordering::Relaxed);
        if refused > before {
            diag_warn!("dropped {} log records appended while stopped", refused - before);
        }
    }
}

impl<B: Backend> Shared<B> {
    fn new_buffer(&self) -> BufferPtr {
        self.stats.buffers_allocated.fetch_add(1, Ordering::Relaxed);
        Box::new(FixedBuffer::with_capacity(self.config.buffer_capacity))
    }

    fn set_state(&self, state: State) {
        self.state.store(state as u8, Ordering::Release);
    }
}

struct Control<S> {
    storage: S,
    writer: Option<JoinHandle<()>>,
}

/// Non-blocking front end over a background writer thread.
///
/// `append` only copies into memory; disk I/O happens on the writer thread.
/// Records appended while stopped are kept and written after the next
/// `start`. Dropping the pipeline stops it.
pub struct AsyncLogging<S: Storage + Clone = FileStorage, B: Backend = ParkingLotBackend> {
    basename: PathBuf,
    clock: Arc<dyn Clock>,
    shared: Arc<Shared<B>>,
    control: B::Monitor<Control<S>>,
}

impl AsyncLogging<FileStorage, ParkingLotBackend> {
    pub fn new(basename: impl AsRef<Path>, config: PipelineConfig) -> Result<Self> {
        Self::with_parts(basename, config, FileStorage::default(), Arc::new(SystemClock))
    }
}

impl<S: Storage + Clone, B: Backend> AsyncLogging<S, B> {
    pub fn with_parts(
        basename: impl AsRef<Path>,
        config: PipelineConfig,
        storage: S,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let stats = PipelineStats::default();
        stats.buffers_allocated.store(2, Ordering::Relaxed);
        let handoff = Handoff {
            current: Box::new(FixedBuffer::with_capacity(config.buffer_capacity)),
            next: Some(Box::new(FixedBuffer::with_capacity(config.buffer_capacity))),
            pending: Vec::with_capacity(16),
        };

        Ok(Self {
            basename: basename.as_ref().to_path_buf(),
            clock,
            shared: Arc::new(Shared {
                handoff: Monitor::new(handoff),
                running: AtomicBool::new(false),
                state: AtomicU8::new(State::Stopped as u8),
                stats,
                reported: Reported::default(),
                config,
            }),
            control: Monitor::new(Control {
                storage,
                writer: None,
            }),
        })
    }

    /// Open the first log file and launch the writer thread. Returns once
    /// the writer has entered its loop.
    pub fn start(&self) -> Result<()> {
        self.control.lock(|control| {
            if control.writer.is_some() {
                return Err(LogError::AlreadyRunning);
            }

            let output = RollingFile::with_storage(
                &self.basename,
                self.shared.config.roll.clone(),
                control.storage.clone(),
                self.clock.clone(),
            )?;

            self.shared.set_state(State::Starting);
            self.shared.running.store(true, Ordering::Release);

            let latch = Arc::new(CountDownLatch::<B>::new(1));
            let shared = self.shared.clone();
            let ready = latch.clone();
            let spawned = thread::Builder::new()
                .name("kaos-log-writer".into())
                .spawn(move || writer_loop(&shared, output, &ready));

            match spawned {
                Ok(handle) => {
                    latch.wait();
                    control.writer = Some(handle);
                    self.shared.set_state(State::Running);
                    Ok(())
                }
                Err(e) => {
                    self.shared.running.store(false, Ordering::Release);
                    self.shared.set_state(State::Stopped);
                    Err(e.into())
                }
            }
        })
    }

    /// Wake the writer, let it finish and drain, then join it. No-op when
    /// already stopped.
    pub fn stop(&self) {
        self.control.lock(|control| {
            let Some(handle) = control.writer.take() else {
                return;
            };

            self.shared.set_state(State::Stopping);
            // under the handoff lock so the writer cannot miss the wakeup
            self.shared
                .handoff
                .lock(|_| self.shared.running.store(false, Ordering::Release));
            self.shared.handoff.notify_all();

            if handle.join().is_err() {
                diag_error!("log writer thread panicked");
            }
            self.shared.set_state(State::Stopped);
        });
    }

    /// Copy one record into the current buffer. Never blocks on I/O.
    ///
    /// A record longer than a whole buffer is dropped and counted; the
    /// writer thread reports it. While stopped, the backlog is capped so
    /// the next `start` writes all of it, and records beyond that are
    /// refused and counted.
    pub fn append(&self, data: &[u8]) {
        let shared = &*self.shared;
        if data.len() > shared.config.buffer_capacity {
            shared.stats.oversized_records.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let swapped = shared.handoff.lock(|h| {
            if h.current.available() >= data.len() {
                h.current.append(data);
                return false;
            }

            // pending plus current must stay within the drop threshold
            if !shared.running.load(Ordering::Acquire)
                && h.pending.len() + 2 > shared.config.drop_threshold
            {
                shared.stats.records_refused.fetch_add(1, Ordering::Relaxed);
                return false;
            }

            let fresh = match h.next.take() {
                Some(next) => next,
                None => shared.new_buffer(),
            };
            let full = mem::replace(&mut h.current, fresh);
            h.pending.push(full);
            h.current.append(data);
            true
        });

        if swapped {
            shared.handoff.notify_all();
        }
    }

    pub fn state(&self) -> State {
        State::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.shared.stats
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.shared.config
    }

    pub fn basename(&self) -> &Path {
        &self.basename
    }
}

impl<S: Storage + Clone, B: Backend> Drop for AsyncLogging<S, B> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn writer_loop<S: Storage, B: Backend>(
    shared: &Shared<B>,
    mut output: RollingFile<S>,
    ready: &CountDownLatch<B>,
) {
    let config = &shared.config;
    let mut spare1 = Some(shared.new_buffer());
    let mut spare2 = Some(shared.new_buffer());
    let mut to_write: Vec<BufferPtr> = Vec::with_capacity(16);

    ready.count_down();

    while shared.running.load(Ordering::Acquire) {
        debug_assert!(to_write.is_empty());

        shared.handoff.wait_timeout_then(
            config.flush_interval,
            |h| h.pending.is_empty() && shared.running.load(Ordering::Acquire),
            |h| {
                let standby = spare1.take().unwrap_or_else(|| shared.new_buffer());
                let filled = mem::replace(&mut h.current, standby);
                h.pending.push(filled);
                mem::swap(&mut to_write, &mut h.pending);
                if h.next.is_none() {
                    h.next = spare2.take();
                }
            },
        );

        write_batch(shared, &mut output, &mut to_write);

        // keep at most two for the writer-side spares
        to_write.truncate(2);
        refill(shared, &mut spare1, &mut to_write);
        refill(shared, &mut spare2, &mut to_write);
        to_write.clear();

        output.flush();
        shared.reported.report(&shared.stats);
    }

    // Records that arrived after the last swap.
    shared.handoff.lock(|h| {
        let standby = spare1.take().unwrap_or_else(|| shared.new_buffer());
        let filled = mem::replace(&mut h.current, standby);
        to_write.append(&mut h.pending);
        to_write.push(filled);
        if h.next.is_none() {
            h.next = spare2.take();
        }
    });
    to_write.retain(|buf| !buf.is_empty());
    if !to_write.is_empty() {
        write_batch(shared, &mut output, &mut to_write);
    }
    output.flush();
    shared.reported.report(&shared.stats);
}

fn write_batch<S: Storage, B: Backend>(
    shared: &Shared<B>,
    output: &mut RollingFile<S>,
    to_write: &mut Vec<BufferPtr>,
) {
    let config = &shared.config;
    let stats = &shared.stats;

    if to_write.len() > config.drop_threshold {
        let dropped = to_write.len() - config.keep_on_drop;
        diag_warn!("dropped log messages, {} larger buffers", dropped);
        stats.buffers_dropped.fetch_add(dropped as u64, Ordering::Relaxed);
        to_write.truncate(config.keep_on_drop);
    }

    let mut bytes = 0u64;
    for buf in to_write.iter() {
        output.append(buf.data());
        bytes += buf.len() as u64;
    }

    stats.batches.fetch_add(1, Ordering::Relaxed);
    stats.buffers_written.fetch_add(to_write.len() as u64, Ordering::Relaxed);
    stats.bytes_written.fetch_add(bytes, Ordering::Relaxed);
}

fn refill<B: Backend>(
    shared: &Shared<B>,
    slot: &mut Option<BufferPtr>,
    to_write: &mut Vec<BufferPtr>,
) {
    if slot.is_some() {
        return;
    }
    let mut buf = to_write.pop().unwrap_or_else(|| shared.new_buffer());
    buf.reset();
    *slot = Some(buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::StdBackend;
    use std::fs;
    use std::time::Instant;
    use tempfile::{tempdir, TempDir};

    fn read_all(dir: &TempDir) -> Vec<u8> {
        let mut files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        files.sort();
        files.iter().flat_map(|f| fs::read(f).unwrap()).collect()
    }

    fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        cond()
    }

    #[test]
    fn test_state_machine() {
        let dir = tempdir().unwrap();
        let log = AsyncLogging::new(dir.path().join("app"), PipelineConfig::default()).unwrap();
        assert_eq!(log.state(), State::Stopped);

        log.start().unwrap();
        assert_eq!(log.state(), State::Running);
        assert!(matches!(log.start(), Err(LogError::AlreadyRunning)));

        log.stop();
        assert_eq!(log.state(), State::Stopped);
        log.stop();
        assert_eq!(log.state(), State::Stopped);
    }

    #[test]
    fn test_stop_flushes_partial_buffer() {
        let dir = tempdir().unwrap();
        let log = AsyncLogging::new(dir.path().join("app"), PipelineConfig::default()).unwrap();
        log.start().unwrap();
        log.append(b"hello\n");
        log.append(b"world\n");
        log.stop();

        assert_eq!(read_all(&dir), b"hello\nworld\n");
    }

    #[test]
    fn test_drop_stops_and_flushes() {
        let dir = tempdir().unwrap();
        {
            let log = AsyncLogging::new(dir.path().join("app"), PipelineConfig::default())
                .unwrap();
            log.start().unwrap();
            log.append(b"bye\n");
        }
        assert_eq!(read_all(&dir), b"bye\n");
    }

    #[test]
    fn test_single_producer_order_preserved() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_buffer_capacity(256);
        let log = AsyncLogging::new(dir.path().join("app"), config).unwrap();
        log.start().unwrap();

        let mut expected = Vec::new();
        for i in 0..10_000 {
            let line = format!("record-{:05}\n", i);
            log.append(line.as_bytes());
            expected.extend_from_slice(line.as_bytes());
        }
        log.stop();

        assert_eq!(log.stats().buffers_dropped(), 0);
        assert_eq!(read_all(&dir), expected);
    }

    #[test]
    fn test_oversized_record_dropped() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_buffer_capacity(16);
        let log = AsyncLogging::new(dir.path().join("app"), config).unwrap();
        log.start().unwrap();

        log.append(b"short\n");
        log.append(&[b'x'; 32]);
        log.append(b"exactly-16-bytes");
        log.stop();

        assert_eq!(log.stats().oversized_records(), 1);
        assert_eq!(read_all(&dir), b"short\nexactly-16-bytes");
    }

    #[test]
    fn test_idle_flush_on_interval() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_flush_interval(Duration::from_millis(20));
        let log = AsyncLogging::new(dir.path().join("app"), config).unwrap();
        log.start().unwrap();

        log.append(b"tick\n");
        assert!(wait_until(Duration::from_secs(5), || read_all(&dir) == b"tick\n"));
        assert_eq!(log.state(), State::Running);
        log.stop();
    }

    #[test]
    fn test_full_buffer_wakes_writer() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default()
            .with_buffer_capacity(8)
            .with_flush_interval(Duration::from_secs(3600));
        let log = AsyncLogging::new(dir.path().join("app"), config).unwrap();
        log.start().unwrap();

        log.append(b"aaaa");
        log.append(b"bbbb");
        // does not fit, swaps and signals
        log.append(b"cccc");
        assert!(wait_until(Duration::from_secs(5), || {
            read_all(&dir).starts_with(b"aaaabbbb")
        }));
        log.stop();
        assert_eq!(read_all(&dir), b"aaaabbbbcccc");
    }

    #[test]
    fn test_steady_state_does_not_allocate() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::default()
            .with_buffer_capacity(64)
            .with_flush_interval(Duration::from_millis(10));
        let log = AsyncLogging::new(dir.path().join("app"), config).unwrap();
        log.start().unwrap();
        assert_eq!(log.stats().buffers_allocated(), 4);

        for i in 0..20 {
            // the second record forces a producer-side swap
            log.append(format!("{:039}\n", 2 * i).as_bytes());
            log.append(format!("{:039}\n", 2 * i + 1).as_bytes());
            let batches = log.stats().batches();
            assert!(wait_until(Duration::from_secs(5), || log.stats().batches() > batches + 1));
        }
        log.stop();

        assert_eq!(log.stats().buffers_allocated(), 4);
        assert_eq!(log.stats().buffers_dropped(), 0);
        assert_eq!(read_all(&dir).len(), 40 * 40);
    }

    #[test]
    fn test_start_fails_without_directory() {
        let dir = tempdir().unwrap();
        let log = AsyncLogging::new(dir.path().join("nope/app"), PipelineConfig::default())
            .unwrap();
        assert!(matches!(log.start(), Err(LogError::Io(_))));
        assert_eq!(log.state(), State::Stopped);
    }

    #[test]
    fn test_restart_keeps_records_appended_while_stopped() {
        let dir = tempdir().unwrap();
        let log = AsyncLogging::new(dir.path().join("app"), PipelineConfig::default()).unwrap();
        log.append(b"early\n");
        log.start().unwrap();
        log.stop();
        log.append(b"between\n");
        log.start().unwrap();
        log.append(b"late\n");
        log.stop();

        assert_eq!(read_all(&dir), b"early\nbetween\nlate\n");
    }

    #[test]
    fn test_backlog_capped_while_stopped() {
        let dir = tempdir().unwrap();
        let log = AsyncLogging::new(dir.path().join("app"), PipelineConfig::default()).unwrap();
        log.start().unwrap();
        log.stop();

        for _ in 0..100_000 {
            log.append(&[b'x'; 100]);
        }
        // two writer spares, current, next, and at most a threshold's worth of backlog
        assert!(log.stats().buffers_allocated() <= 4 + DROP_THRESHOLD as u64);
        assert!(log.stats().records_refused() > 0);

        // everything kept is written on restart, nothing is lost to the drop policy
        log.start().unwrap();
        log.stop();
        assert_eq!(log.stats().buffers_dropped(), 0);
        let written = read_all(&dir).len() as u64;
        assert_eq!(written + log.stats().records_refused() * 100, 100 * 100_000);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_oversized_record_not_reported_on_caller_thread() {
        use std::io::{self, Write};

        #[derive(Clone, Default)]
        struct Captured(Arc<parking_lot::Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let dir = tempdir().unwrap();
        let config = PipelineConfig::default().with_buffer_capacity(16);
        let log = AsyncLogging::new(dir.path().join("app"), config).unwrap();
        log.start().unwrap();

        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            log.append(&[b'x'; 32]);
            log.append(&[b'y'; 32]);
            tracing::warn!("caller marker");
        });
        log.stop();

        assert_eq!(log.stats().oversized_records(), 2);
        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        assert!(output.contains("caller marker"));
        assert!(!output.contains("larger than a buffer"));
    }

    #[test]
    fn test_std_backend_pipeline() {
        let dir = tempdir().unwrap();
        let log = AsyncLogging::<FileStorage, StdBackend>::with_parts(
            dir.path().join("app"),
            PipelineConfig::default().with_buffer_capacity(32),
            FileStorage::default(),
            Arc::new(SystemClock),
        )
        .unwrap();
        log.start().unwrap();
        for _ in 0..100 {
            log.append(b"0123456789\n");
        }
        log.stop();
        assert_eq!(read_all(&dir).len(), 1100);
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.buffer_capacity, SMALL_BUFFER);
        assert_eq!(config.flush_interval, Duration::from_secs(3));
        assert_eq!(config.roll.check_every_n, WRITER_CHECK_EVERY_N);
        assert_eq!(config.roll.flush_interval, Duration::from_secs(2));
        assert_eq!((config.drop_threshold, config.keep_on_drop), (25, 2));
    }

    #[test]
    fn test_invalid_config() {
        let config = PipelineConfig::default().with_drop_policy(2, 3);
        assert!(matches!(
            AsyncLogging::new("unused", config),
            Err(LogError::InvalidConfig(_))
        ));
        let config = PipelineConfig::default().with_buffer_capacity(0);
        assert!(AsyncLogging::new("unused", config).is_err());
    }
}
