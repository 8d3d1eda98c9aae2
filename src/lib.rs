//! Bounded-buffer, best-effort asynchronous logging with a remote syslog
//! sink and a local file/terminal sink.
//!
//! Every log call renders one line on the caller's thread, then hands it
//! to a non-blocking dispatcher: outside of debug mode the line is offered
//! to a per-severity syslog queue with a 1ms bounded wait, falling back to
//! the matching local queue, and dropped if both are full. Two background
//! threads drain the queues into the sinks. Callers are never blocked for
//! more than about two milliseconds and never see an error; losing lines
//! under sustained overload is by design.
//!
//! # Examples
//!
//! Debug mode logs to stdout/stderr with a verbose prefix and never
//! touches syslog:
//!
//! ```
//! use logpost::{Build, LoggerBuilder};
//!
//! # fn main() -> Result<(), logpost::Error> {
//! let mut builder = LoggerBuilder::new("svc");
//! builder.debug_mode(true);
//!
//! let logger = builder.build()?;
//! logpost::info!(logger, "listening on ", 8080);
//! logpost::errorf!(logger, "lost {} peers", 3);
//! # Ok(())
//! # }
//! ```
//!
//! Outside of debug mode, lines go to the syslog daemon (tags
//! `svc_info`/`svc_err`) or, when the syslog queue is full, to the
//! `svc_info`/`svc_err` files:
//!
//! ```no_run
//! use logpost::{Build, Config, LoggerConfig};
//!
//! # fn main() -> Result<(), logpost::Error> {
//! let config = LoggerConfig::from_toml(r#"
//! identity = "svc"
//! facility = "local3"
//! directory = "/var/log/svc"
//! "#)?;
//!
//! let logger = config.build_logger()?;
//! logpost::infof!(logger, "started, pid={}", std::process::id());
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]
#[macro_use]
extern crate trackable;

pub use crate::build::{Build, LoggerBuilder};
pub use crate::config::{Config, LoggerConfig};
pub use crate::dispatch::DEFAULT_QUEUE_CAPACITY;
pub use crate::error::{Error, ErrorKind};
pub use crate::logger::Logger;

pub mod types;

mod build;
mod config;
mod consumer;
mod dispatch;
mod error;
mod format;
mod local;
mod logger;
mod syslog;

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
