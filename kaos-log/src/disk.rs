//! Append-only file writer with short-write recovery.

use crate::diag::diag_error;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Attempts per `append` before the remainder is dropped.
pub const WRITE_RETRIES: usize = 3;

/// `Interrupted` results tolerated per `append` before giving up.
pub const INTERRUPT_RETRIES: usize = 16;

/// Default userspace buffer in front of each log file.
pub const FILE_BUFFER_SIZE: usize = 64 * 1024;

/// Opens the sink behind each rolled file.
pub trait Storage: Send + 'static {
    type Writer: Write + Send;

    /// Open `path` for appending, creating it if missing.
    fn open_append(&mut self, path: &Path) -> io::Result<Self::Writer>;
}

/// Append-mode files on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    buffer_size: usize,
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(FILE_BUFFER_SIZE)
    }
}

impl FileStorage {
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}

impl Storage for FileStorage {
    type Writer = BufWriter<File>;

    fn open_append(&mut self, path: &Path) -> io::Result<Self::Writer> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(BufWriter::with_capacity(self.buffer_size, file))
    }
}

/// Owns one open sink and counts the bytes submitted to it.
///
/// The counter advances by the full requested length even when part of a
/// write is dropped, so size based rolling keeps working on a failing disk.
pub struct DiskWriter<W: Write> {
    inner: W,
    written: u64,
    dropped: u64,
}

impl<W: Write> DiskWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            written: 0,
            dropped: 0,
        }
    }

    /// Write all of `data`, looping on short writes. Never fails: on zero
    /// progress or repeated errors the rest is dropped and reported.
    pub fn append(&mut self, data: &[u8]) {
        let mut n = 0;
        let mut failures = 0;
        let mut interrupts = 0;

        while n < data.len() {
            match self.inner.write(&data[n..]) {
                Ok(0) => {
                    diag_error!(
                        "log write made no progress, dropped {} of {} bytes",
                        data.len() - n,
                        data.len()
                    );
                    break;
                }
                Ok(x) => n += x,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    interrupts += 1;
                    if interrupts >= INTERRUPT_RETRIES {
                        diag_error!(
                            "log write kept being interrupted, dropped {} of {} bytes",
                            data.len() - n,
                            data.len()
                        );
                        break;
                    }
                }
                Err(e) => {
                    failures += 1;
                    if failures >= WRITE_RETRIES {
                        diag_error!(
                            "log write failed: {}, dropped {} of {} bytes",
                            e,
                            data.len() - n,
                            data.len()
                        );
                        break;
                    }
                }
            }
        }

        self.dropped += (data.len() - n) as u64;
        self.written += data.len() as u64;
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.inner.flush() {
            diag_error!("log flush failed: {}", e);
        }
    }

    /// Logical bytes submitted, including dropped ones.
    #[inline]
    pub fn written_bytes(&self) -> u64 {
        self.written
    }

    #[inline]
    pub fn dropped_bytes(&self) -> u64 {
        self.dropped
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}
