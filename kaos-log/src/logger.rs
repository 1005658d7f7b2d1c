//! Level-filtered logger over the async pipeline.
//!
//! The logger is a plain owned value: build it in `main`, hand out `&Logger`
//! or `Arc<Logger>`, stop it (or drop it) on the way out.

use crate::config::{Level, LoggerConfig};
use crate::error::Result;
use crate::pipeline::AsyncLogging;
use chrono::Local;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

thread_local! {
    static LINE_BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(1024));
}

pub struct Logger {
    console: Option<Level>,
    file: Option<(Level, AsyncLogging)>,
    max_record_len: usize,
    oversized: AtomicU64,
}

impl Logger {
    /// Create the log directory if needed and start the file pipeline when
    /// file output is enabled.
    pub fn new(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;

        let file = if config.destination.file() {
            std::fs::create_dir_all(&config.log_dir)?;
            let pipeline = AsyncLogging::new(config.base_path(), config.pipeline_config())?;
            pipeline.start()?;
            Some((config.file_level, pipeline))
        } else {
            None
        };

        Ok(Self {
            console: config.destination.console().then_some(config.console_level),
            file,
            max_record_len: config.max_record_len,
            oversized: AtomicU64::new(0),
        })
    }

    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(&LoggerConfig::load(path)?)
    }

    /// Whether a record at `level` reaches any output.
    pub fn enabled(&self, level: Level) -> bool {
        self.console.is_some_and(|min| level >= min)
            || self.file.as_ref().is_some_and(|(min, _)| level >= *min)
    }

    /// Format `<local time>,<L>,<message>\n` and route it. Records longer
    /// than `max_record_len` once formatted are dropped and counted.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        LINE_BUFFER.with(|cell| match cell.try_borrow_mut() {
            Ok(mut line) => self.emit(&mut line, level, args),
            // logging from inside a Display impl being logged
            Err(_) => self.emit(&mut Vec::new(), level, args),
        });
    }

    fn emit(&self, line: &mut Vec<u8>, level: Level, args: fmt::Arguments<'_>) {
        line.clear();
        let now = Local::now();
        let _ = write!(
            line,
            "{},{},",
            now.format("%Y-%m-%d %H:%M:%S%.3f"),
            level.letter()
        );
        let _ = line.write_fmt(args);
        line.push(b'\n');

        if line.len() > self.max_record_len {
            self.oversized.fetch_add(1, Ordering::Relaxed);
            return;
        }

        if self.console.is_some_and(|min| level >= min) {
            let _ = io::stdout().lock().write_all(&line[..]);
        }
        if let Some((min, pipeline)) = &self.file {
            if level >= *min {
                pipeline.append(&line[..]);
            }
        }
    }

    /// Stop the file pipeline, writing out everything buffered.
    pub fn stop(&self) {
        if let Some((_, pipeline)) = &self.file {
            pipeline.stop();
        }
    }

    pub fn pipeline(&self) -> Option<&AsyncLogging> {
        self.file.as_ref().map(|(_, pipeline)| pipeline)
    }

    /// Records dropped for exceeding `max_record_len`.
    pub fn oversized_records(&self) -> u64 {
        self.oversized.load(Ordering::Relaxed)
    }
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Debug, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Info, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Warn, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log($crate::Level::Error, format_args!($($arg)+))
    };
}
