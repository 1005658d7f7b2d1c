//! Error types for kaos-log.
//!
//! Only the control plane reports errors. Appends never do: write failures,
//! skipped rolls and overload drops go to the diagnostic channel instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid level: {0}")]
    InvalidLevel(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("pipeline already running")]
    AlreadyRunning,
}

impl LogError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
