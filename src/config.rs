//! Logger configuration.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::build::{Build, LoggerBuilder};
use crate::dispatch::DEFAULT_QUEUE_CAPACITY;
use crate::logger::Logger;
use crate::types::Facility;
use crate::{ErrorKind, Result};
use trackable::error::ErrorKindExt;

/// Configuration of a logger builder.
pub trait Config {
    /// Logger builder.
    type Builder: Build;

    /// Makes a logger builder associated with this configuration.
    fn try_to_builder(&self) -> Result<Self::Builder>;

    /// Builds a logger with this configuration.
    fn build_logger(&self) -> Result<Logger> {
        let builder = track!(self.try_to_builder())?;
        let logger = track!(builder.build())?;
        Ok(logger)
    }
}

/// The configuration of `LoggerBuilder`.
///
/// # Examples
///
/// ```
/// use logpost::LoggerConfig;
///
/// let config = LoggerConfig::from_toml(r#"
/// identity = "svc"
/// facility = "local5"
/// "#).unwrap();
/// assert_eq!(config.identity, "svc");
/// assert!(!config.debug_mode);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct LoggerConfig {
    /// Identity used for local file names and syslog tags.
    pub identity: String,

    /// Debug mode: terminal output with a verbose prefix, no syslog.
    #[serde(default)]
    pub debug_mode: bool,

    /// Capacity of each severity queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Syslog facility.
    #[serde(default)]
    pub facility: Facility,

    /// Directory the local log files are created in.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}
impl LoggerConfig {
    /// Creates a new `LoggerConfig` with default settings for `identity`.
    pub fn new(identity: &str) -> Self {
        LoggerConfig {
            identity: identity.to_string(),
            debug_mode: false,
            queue_capacity: default_queue_capacity(),
            facility: Facility::default(),
            directory: default_directory(),
        }
    }

    /// Parses a `LoggerConfig` from TOML text.
    pub fn from_toml(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| track!(ErrorKind::Invalid.cause(e)))
    }
}
impl Config for LoggerConfig {
    type Builder = LoggerBuilder;
    fn try_to_builder(&self) -> Result<Self::Builder> {
        let mut builder = LoggerBuilder::new(&self.identity);
        builder.debug_mode(self.debug_mode);
        builder.queue_capacity(self.queue_capacity);
        builder.facility(self.facility);
        builder.directory(&self.directory);
        Ok(builder)
    }
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = LoggerConfig::from_toml(r#"identity = "svc""#).unwrap();
        assert_eq!(config.identity, "svc");
        assert!(!config.debug_mode);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.facility, Facility::Local3);
        assert_eq!(config.directory, PathBuf::from("."));
    }

    #[test]
    fn full_config_round_trip() {
        let config = LoggerConfig::from_toml(
            r#"
            identity = "svc"
            debug_mode = true
            queue_capacity = 64
            facility = "local0"
            directory = "/var/log/svc"
            "#,
        )
        .unwrap();
        assert!(config.debug_mode);
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.facility, Facility::Local0);
        assert_eq!(config.directory, PathBuf::from("/var/log/svc"));
    }

    #[test]
    fn missing_identity_is_rejected() {
        assert!(LoggerConfig::from_toml("debug_mode = true").is_err());
    }
}
