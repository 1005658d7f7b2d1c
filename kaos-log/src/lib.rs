//! Kaos Log - asynchronous file logging.
//!
//! - `AsyncLogging` - non-blocking `append`, one background writer thread
//! - `RollingFile` - rolls on size and on day boundaries
//! - `Logger` - level filtering and record formatting on top
//!
//! ```rust,ignore
//! use kaos_log::{AsyncLogging, PipelineConfig};
//!
//! let log = AsyncLogging::new("/var/log/app", PipelineConfig::default())?;
//! log.start()?;
//! log.append(b"hello\n");
//! log.stop();
//! ```

mod diag;

pub mod buffer;
pub mod clock;
pub mod config;
pub mod disk;
pub mod error;
pub mod latch;
pub mod logger;
pub mod pipeline;
pub mod rolling;
pub mod sync;

pub use buffer::{FixedBuffer, LARGE_BUFFER, SMALL_BUFFER};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Destination, Level, LoggerConfig, MAX_RECORD_LEN};
pub use disk::{DiskWriter, FileStorage, Storage};
pub use error::{LogError, Result};
pub use latch::CountDownLatch;
pub use logger::Logger;
pub use pipeline::{AsyncLogging, PipelineConfig, PipelineStats, State};
pub use rolling::{log_file_name, LockedRollingFile, RollConfig, RollingFile, GIB, KIB, MIB};
pub use sync::{Backend, Monitor, ParkingLotBackend, StdBackend};
