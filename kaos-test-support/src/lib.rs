//! Test helpers for kaos-log.
//!
//! - `faults` - in-memory storage with slow and failing writes
//! - `verify` - per-producer ordering checks on written output

pub mod faults;
pub mod verify;

pub use faults::{DiskChaos, FaultyWriter, MemoryFile, MemoryStorage, WriteFault};
pub use verify::{record, RecordVerifier, VerifyStats};
