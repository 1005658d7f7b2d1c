//! Disk fault injection - short writes, stalls, errors.
//!
//! Seeded so a failing run can be replayed.

use kaos_log::Storage;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// What a single `write` call does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteFault {
    /// Sleep, then write everything
    Delay { min_us: u64, max_us: u64 },
    /// Accept only part of the buffer
    Short,
    /// Return `Ok(0)`
    ZeroProgress,
    /// Return an I/O error
    Error,
    None,
}

/// Decides faults for each write.
///
/// ```
/// use kaos_test_support::DiskChaos;
///
/// let chaos = DiskChaos::seeded(7)
///     .with_short_write_probability(0.3)
///     .with_error_probability(0.01);
/// ```
#[derive(Debug, Clone)]
pub struct DiskChaos {
    delay_probability: f64,
    delay_min_us: u64,
    delay_max_us: u64,
    short_write_probability: f64,
    zero_progress_probability: f64,
    error_probability: f64,
    rng: StdRng,
    events_triggered: usize,
}

impl Default for DiskChaos {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl DiskChaos {
    pub fn seeded(seed: u64) -> Self {
        Self {
            delay_probability: 0.0,
            delay_min_us: 100,
            delay_max_us: 10_000,
            short_write_probability: 0.0,
            zero_progress_probability: 0.0,
            error_probability: 0.0,
            rng: StdRng::seed_from_u64(seed),
            events_triggered: 0,
        }
    }

    pub fn with_delay_probability(mut self, prob: f64) -> Self {
        self.delay_probability = prob.clamp(0.0, 1.0);
        self
    }

    pub fn with_delay_range(mut self, min_us: u64, max_us: u64) -> Self {
        self.delay_min_us = min_us;
        self.delay_max_us = max_us;
        self
    }

    pub fn with_short_write_probability(mut self, prob: f64) -> Self {
        self.short_write_probability = prob.clamp(0.0, 1.0);
        self
    }

    pub fn with_zero_progress_probability(mut self, prob: f64) -> Self {
        self.zero_progress_probability = prob.clamp(0.0, 1.0);
        self
    }

    pub fn with_error_probability(mut self, prob: f64) -> Self {
        self.error_probability = prob.clamp(0.0, 1.0);
        self
    }

    pub fn decide(&mut self) -> WriteFault {
        let roll = self.rng.gen::<f64>();
        let mut threshold = 0.0;

        threshold += self.delay_probability;
        if roll < threshold {
            self.events_triggered += 1;
            return WriteFault::Delay {
                min_us: self.delay_min_us,
                max_us: self.delay_max_us,
            };
        }

        threshold += self.short_write_probability;
        if roll < threshold {
            self.events_triggered += 1;
            return WriteFault::Short;
        }

        threshold += self.zero_progress_probability;
        if roll < threshold {
            self.events_triggered += 1;
            return WriteFault::ZeroProgress;
        }

        threshold += self.error_probability;
        if roll < threshold {
            self.events_triggered += 1;
            return WriteFault::Error;
        }

        WriteFault::None
    }

    pub fn events_triggered(&self) -> usize {
        self.events_triggered
    }
}

/// Applies [`DiskChaos`] to every write of the wrapped sink.
pub struct FaultyWriter<W> {
    inner: W,
    chaos: DiskChaos,
}

impl<W: Write> FaultyWriter<W> {
    pub fn new(inner: W, chaos: DiskChaos) -> Self {
        Self { inner, chaos }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn chaos(&self) -> &DiskChaos {
        &self.chaos
    }
}

impl<W: Write> Write for FaultyWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.chaos.decide() {
            WriteFault::Delay { min_us, max_us } => {
                let us = self.chaos.rng.gen_range(min_us..=max_us);
                std::thread::sleep(Duration::from_micros(us));
                self.inner.write(buf)
            }
            WriteFault::Short => {
                let n = self.chaos.rng.gen_range(1..=buf.len());
                self.inner.write(&buf[..n])
            }
            WriteFault::ZeroProgress => Ok(0),
            WriteFault::Error => Err(io::Error::new(io::ErrorKind::Other, "injected write error")),
            WriteFault::None => self.inner.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

type Files = Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>;

/// One in-memory file, shared with the [`MemoryStorage`] that opened it.
pub struct MemoryFile {
    path: PathBuf,
    files: Files,
    write_delay: Duration,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.write_delay.is_zero() {
            std::thread::sleep(self.write_delay);
        }
        self.files
            .lock()
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Storage that keeps every rolled file in memory.
///
/// Clones share the same files, so a test can keep one handle while the
/// pipeline owns another.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Files,
    write_delay: Duration,
    chaos: DiskChaos,
    fail_opens: Arc<Mutex<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write call sleeps this long first.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    pub fn with_chaos(mut self, chaos: DiskChaos) -> Self {
        self.chaos = chaos;
        self
    }

    /// Make the next `n` opens fail.
    pub fn fail_next_opens(&self, n: usize) {
        *self.fail_opens.lock() = n;
    }

    /// File names in creation order (names sort by timestamp).
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().keys().cloned().collect()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }

    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().get(path).cloned()
    }

    /// Every file's bytes, concatenated in name order.
    pub fn concat(&self) -> Vec<u8> {
        self.files.lock().values().flatten().copied().collect()
    }
}

impl Storage for MemoryStorage {
    type Writer = FaultyWriter<MemoryFile>;

    fn open_append(&mut self, path: &Path) -> io::Result<Self::Writer> {
        {
            let mut fail = self.fail_opens.lock();
            if *fail > 0 {
                *fail -= 1;
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected open error"));
            }
        }

        self.files.lock().entry(path.to_path_buf()).or_default();
        let file = MemoryFile {
            path: path.to_path_buf(),
            files: self.files.clone(),
            write_delay: self.write_delay,
        };
        Ok(FaultyWriter::new(file, self.chaos.clone()))
    }
}
