//! Logger builder: the one-time lifecycle step that opens sinks,
//! allocates queues, and starts the consumer loops.
use std::path::{Path, PathBuf};

use crate::dispatch::DEFAULT_QUEUE_CAPACITY;
use crate::local::LocalSink;
use crate::logger::{self, Logger};
#[cfg(unix)]
use crate::syslog::SyslogSink;
use crate::types::Facility;
use crate::{ErrorKind, Result};
use trackable::error::ErrorKindExt;

/// This trait allows building `Logger`s.
pub trait Build {
    /// Builds a logger.
    fn build(&self) -> Result<Logger>;
}

/// A builder for the asynchronous logging pipeline.
///
/// Building opens the declared sinks, allocates the bounded queues, and
/// starts one consumer thread per destination. If a sink cannot be
/// opened, `build` fails; a process should treat that as fatal rather
/// than run with a partially configured logger.
///
/// In debug mode the syslog path is disabled entirely and local output
/// goes to stdout/stderr with a verbose line prefix. Otherwise local
/// output goes to the `{identity}_info` and `{identity}_err` files and
/// syslog gets first refusal on every line.
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    identity: String,
    debug_mode: bool,
    queue_capacity: usize,
    facility: Facility,
    directory: PathBuf,
}
impl LoggerBuilder {
    /// Makes a new `LoggerBuilder` instance.
    ///
    /// `identity` names the local files and the syslog tags.
    pub fn new(identity: &str) -> Self {
        LoggerBuilder {
            identity: identity.to_string(),
            debug_mode: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            facility: Facility::default(),
            directory: PathBuf::from("."),
        }
    }

    /// Sets debug mode: terminal output with a verbose prefix, no syslog.
    pub fn debug_mode(&mut self, debug_mode: bool) -> &mut Self {
        self.debug_mode = debug_mode;
        self
    }

    /// Sets the capacity of each severity queue.
    pub fn queue_capacity(&mut self, capacity: usize) -> &mut Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the syslog facility to send logs to.
    pub fn facility(&mut self, facility: Facility) -> &mut Self {
        self.facility = facility;
        self
    }

    /// Sets the directory the local log files are created in.
    pub fn directory<P: AsRef<Path>>(&mut self, directory: P) -> &mut Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    fn open_local_sink(&self) -> Result<LocalSink> {
        if self.debug_mode {
            Ok(LocalSink::terminal())
        } else {
            LocalSink::files(&self.directory, &self.identity)
                .map_err(|e| track!(ErrorKind::Other.cause(e), "identity={:?}", self.identity))
        }
    }

    #[cfg(unix)]
    fn open_syslog_sink(&self) -> Result<Option<SyslogSink>> {
        if self.debug_mode {
            Ok(None)
        } else {
            let sink = track!(SyslogSink::connect(&self.identity, self.facility))?;
            Ok(Some(sink))
        }
    }

    #[cfg(not(unix))]
    fn open_syslog_sink(&self) -> Result<Option<std::convert::Infallible>> {
        if self.debug_mode {
            Ok(None)
        } else {
            track_panic!(ErrorKind::Invalid, "syslog is not supported on this platform");
        }
    }
}
impl Build for LoggerBuilder {
    fn build(&self) -> Result<Logger> {
        let local = track!(self.open_local_sink())?;
        let syslog = track!(self.open_syslog_sink())?;
        logger::start(self.debug_mode, self.queue_capacity, syslog, local)
    }
}
