//! Size and day based rolling log file.
//!
//! Size is checked after every append against the writer's logical byte
//! count. Wall-clock time is only read every `check_every_n` appends, which
//! keeps a time syscall off the common path at the cost of roll precision.

use crate::clock::{Clock, SystemClock};
use crate::diag::{diag_debug, diag_error};
use crate::disk::{DiskWriter, FileStorage, Storage};
use crate::error::{LogError, Result};
use crate::sync::{Backend, Monitor, ParkingLotBackend};
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

/// Default roll period: one calendar day (UTC).
pub const ROLL_PERIOD: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Clone)]
pub struct RollConfig {
    /// Roll once more than this many bytes went to the current file.
    pub roll_size: u64,
    /// Appends between wall-clock checks.
    pub check_every_n: u32,
    /// Flush when this much time passed since the last flush.
    pub flush_interval: Duration,
    /// Roll when `now` crosses into a new period of this length.
    pub period: Duration,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            roll_size: 4 * MIB,
            check_every_n: 20,
            flush_interval: Duration::from_secs(2),
            period: ROLL_PERIOD,
        }
    }
}

impl RollConfig {
    pub fn with_roll_size(mut self, roll_size: u64) -> Self {
        self.roll_size = roll_size;
        self
    }

    pub fn with_check_every_n(mut self, n: u32) -> Self {
        self.check_every_n = n;
        self
    }

    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.check_every_n == 0 {
            return Err(LogError::config("check_every_n must be greater than 0"));
        }
        if self.period.as_secs() == 0 {
            return Err(LogError::config("roll period must be at least one second"));
        }
        Ok(())
    }
}

/// `<basename>.<YYYYMMDD>-<HHMMSS>-<mmm>.log`, UTC.
pub fn log_file_name(basename: &Path, now: DateTime<Utc>) -> PathBuf {
    let mut name = basename.as_os_str().to_owned();
    name.push(format!(
        ".{}-{:03}.log",
        now.format("%Y%m%d-%H%M%S"),
        now.timestamp_subsec_millis()
    ));
    PathBuf::from(name)
}

/// Single-writer rolling file. See [`LockedRollingFile`] for shared use.
pub struct RollingFile<S: Storage = FileStorage> {
    basename: PathBuf,
    config: RollConfig,
    storage: S,
    clock: Arc<dyn Clock>,
    file: DiskWriter<S::Writer>,
    path: PathBuf,
    last_roll: i64,
    last_flush: i64,
    start_of_period: i64,
    count: u32,
    rolls: u64,
}

impl RollingFile<FileStorage> {
    pub fn new(basename: impl AsRef<Path>, config: RollConfig) -> Result<Self> {
        Self::with_storage(basename, config, FileStorage::default(), Arc::new(SystemClock))
    }
}

impl<S: Storage> RollingFile<S> {
    /// Open the first file. This roll is unconditional, and the only one
    /// whose failure is returned to the caller.
    pub fn with_storage(
        basename: impl AsRef<Path>,
        config: RollConfig,
        mut storage: S,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let basename = basename.as_ref().to_path_buf();
        let now = clock.now();
        let path = log_file_name(&basename, now);
        let file = DiskWriter::new(storage.open_append(&path)?);
        let secs = now.timestamp();
        let start_of_period = period_start(secs, &config);

        Ok(Self {
            basename,
            config,
            storage,
            clock,
            file,
            path,
            last_roll: secs,
            last_flush: secs,
            start_of_period,
            count: 0,
            rolls: 1,
        })
    }

    pub fn append(&mut self, data: &[u8]) {
        self.file.append(data);

        if self.file.written_bytes() > self.config.roll_size {
            self.roll_or_report();
        } else {
            self.count += 1;
            if self.count >= self.config.check_every_n {
                self.count = 0;
                let now = self.clock.now().timestamp();
                if period_start(now, &self.config) != self.start_of_period {
                    self.roll_or_report();
                } else if now - self.last_flush > self.config.flush_interval.as_secs() as i64 {
                    self.last_flush = now;
                    self.file.flush();
                }
            }
        }
    }

    pub fn flush(&mut self) {
        self.file.flush();
    }

    /// Switch to a freshly named file. Returns `Ok(false)` without touching
    /// anything when the clock has not moved past the previous roll's
    /// second, so two rolls never share a file name.
    pub fn roll(&mut self) -> io::Result<bool> {
        let now = self.clock.now();
        let secs = now.timestamp();
        if secs <= self.last_roll {
            return Ok(false);
        }
        // a failed open still consumes this second
        self.last_roll = secs;

        let path = log_file_name(&self.basename, now);
        let writer = self.storage.open_append(&path)?;

        self.file.flush();
        self.file = DiskWriter::new(writer);
        self.path = path;
        self.last_flush = secs;
        self.start_of_period = period_start(secs, &self.config);
        self.rolls += 1;

        diag_debug!("rolled log file to {}", self.path.display());
        Ok(true)
    }

    fn roll_or_report(&mut self) {
        if let Err(e) = self.roll() {
            diag_error!(
                "log roll failed for {}: {}, staying on {}",
                self.basename.display(),
                e,
                self.path.display()
            );
        }
    }

    /// Path of the file currently receiving appends.
    pub fn current_path(&self) -> &Path {
        &self.path
    }

    /// Files opened so far, including the first one.
    pub fn roll_count(&self) -> u64 {
        self.rolls
    }

    /// Logical bytes submitted to the current file.
    pub fn written_bytes(&self) -> u64 {
        self.file.written_bytes()
    }

    pub fn config(&self) -> &RollConfig {
        &self.config
    }
}

#[inline]
fn period_start(secs: i64, config: &RollConfig) -> i64 {
    let period = config.period.as_secs() as i64;
    secs.div_euclid(period) * period
}

/// A [`RollingFile`] behind a backend lock, shareable across threads.
pub struct LockedRollingFile<S: Storage = FileStorage, B: Backend = ParkingLotBackend> {
    inner: B::Monitor<RollingFile<S>>,
}

impl<S: Storage, B: Backend> LockedRollingFile<S, B> {
    pub fn new(file: RollingFile<S>) -> Self {
        Self {
            inner: Monitor::new(file),
        }
    }

    pub fn append(&self, data: &[u8]) {
        self.inner.lock(|file| file.append(data));
    }

    pub fn flush(&self) {
        self.inner.lock(|file| file.flush());
    }

    pub fn roll(&self) -> io::Result<bool> {
        self.inner.lock(|file| file.roll())
    }

    /// Run `f` against the file with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut RollingFile<S>) -> R) -> R {
        self.inner.lock(f)
    }
}
