//! Logger configuration, loadable from TOML.
//!
//! ```toml
//! log_dir = "/var/log/app"
//! basename = "server"
//! destination = "both"      # none | console | file | both
//! console_level = "info"
//! file_level = "debug"
//! ```

use crate::buffer::SMALL_BUFFER;
use crate::error::{LogError, Result};
use crate::pipeline::PipelineConfig;
use crate::rolling::MIB;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Longest formatted record the logger accepts.
pub const MAX_RECORD_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Single letter written into each record.
    pub fn letter(self) -> &'static str {
        match self {
            Level::Debug => "D",
            Level::Info => "I",
            Level::Warn => "W",
            Level::Error => "E",
        }
    }
}

impl FromStr for Level {
    type Err = LogError;

    /// Case-insensitive, surrounding whitespace ignored. Empty means debug.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "debug" | "dbg" => Ok(Level::Debug),
            "info" | "infomation" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "err" | "error" => Ok(Level::Error),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = LogError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        };
        f.write_str(name)
    }
}

/// Where records go. Unrecognised values disable both outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Destination {
    None,
    Console,
    File,
    Both,
}

impl Destination {
    pub fn console(self) -> bool {
        matches!(self, Destination::Console | Destination::Both)
    }

    pub fn file(self) -> bool {
        matches!(self, Destination::File | Destination::Both)
    }
}

impl From<String> for Destination {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Destination::Console,
            "file" => Destination::File,
            "both" => Destination::Both,
            _ => Destination::None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub basename: String,
    pub destination: Destination,
    pub console_level: Level,
    pub file_level: Level,
    pub max_record_len: usize,
    pub buffer_capacity: usize,
    pub flush_interval_secs: u64,
    pub roll_size: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            basename: "app".into(),
            destination: Destination::File,
            console_level: Level::Debug,
            file_level: Level::Debug,
            max_record_len: MAX_RECORD_LEN,
            buffer_capacity: SMALL_BUFFER,
            flush_interval_secs: 3,
            roll_size: 4 * MIB,
        }
    }
}

impl LoggerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.basename.trim().is_empty() {
            return Err(LogError::config("basename must not be empty"));
        }
        if self.log_dir.as_os_str().is_empty() {
            return Err(LogError::config("log_dir must not be empty"));
        }
        if self.max_record_len > self.buffer_capacity {
            return Err(LogError::config("max_record_len cannot exceed buffer_capacity"));
        }
        self.pipeline_config().validate()
    }

    /// `<log_dir>/<basename>`, the prefix of every rolled file.
    pub fn base_path(&self) -> PathBuf {
        self.log_dir.join(self.basename.trim())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_buffer_capacity(self.buffer_capacity)
            .with_flush_interval(Duration::from_secs(self.flush_interval_secs))
            .with_roll_size(self.roll_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rolling::GIB;

    #[test]
    fn test_level_aliases() {
        assert_eq!("DBG".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!(" Infomation ".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("ERR".parse::<Level>().unwrap(), Level::Error);
        assert!(matches!("verbose".parse::<Level>(), Err(LogError::InvalidLevel(_))));
        assert!(Level::Debug < Level::Error);
    }

    #[test]
    fn test_parse_full_config() {
        let config = LoggerConfig::from_toml_str(
            r#"
            log_dir = "/tmp/kaos"
            basename = " server "
            destination = " Both "
            console_level = "warn"
            file_level = "info"
            roll_size = 1048576
            flush_interval_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.destination, Destination::Both);
        assert_eq!(config.console_level, Level::Warn);
        assert_eq!(config.file_level, Level::Info);
        assert_eq!(config.base_path(), PathBuf::from("/tmp/kaos/server"));

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.roll.roll_size, MIB);
        assert_eq!(pipeline.flush_interval, Duration::from_secs(5));
        assert_eq!(pipeline.buffer_capacity, SMALL_BUFFER);
    }

    #[test]
    fn test_defaults_and_large_roll_size() {
        let config = LoggerConfig::from_toml_str("").unwrap();
        assert_eq!(config.pipeline_config().flush_interval, Duration::from_secs(3));
        assert_eq!(config.pipeline_config().roll.roll_size, 4 * MIB);

        let config = LoggerConfig::from_toml_str("roll_size = 1073741824").unwrap();
        assert_eq!(config.pipeline_config().roll.roll_size, GIB);
    }

    #[test]
    fn test_unknown_destination_disables_output() {
        let config = LoggerConfig::from_toml_str(r#"destination = "syslog""#).unwrap();
        assert_eq!(config.destination, Destination::None);
        assert!(!config.destination.console());
        assert!(!config.destination.file());
    }

    #[test]
    fn test_bad_level_rejected() {
        let result = LoggerConfig::from_toml_str(r#"file_level = "loud""#);
        assert!(matches!(result, Err(LogError::Config(_))));
    }

    #[test]
    fn test_validation() {
        assert!(LoggerConfig::from_toml_str(r#"basename = "  ""#).is_err());
        assert!(LoggerConfig::from_toml_str("max_record_len = 8192").is_err());
        assert!(LoggerConfig::from_toml_str("flush_interval_secs = 0").is_err());
    }
}
