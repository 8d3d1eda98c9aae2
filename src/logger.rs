//! The logger handle and its logging macros.
use std::fmt::{self, Display};
use std::panic::Location;
use std::sync::Arc;

use crate::consumer::{self, Forward};
use crate::dispatch::{self, Dispatcher};
use crate::format::{self, Concat};
use crate::local::LocalSink;
use crate::types::{Destination, Severity};
use crate::{ErrorKind, Result};
use trackable::error::ErrorKindExt;

/// A handle to a running logging pipeline.
///
/// Cheap to clone; all clones feed the same queues and consumer threads.
/// Every logging method returns immediately: a line is enqueued within
/// about two milliseconds or silently dropped. The consumer threads keep
/// draining until the last clone is gone.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}
struct Inner {
    debug_mode: bool,
    dispatcher: Dispatcher,
}

impl Logger {
    /// Logs the concatenation of `parts` at the info severity.
    #[track_caller]
    pub fn info(&self, parts: &[&dyn Display]) {
        self.log(
            Severity::Info,
            format_args!("{}", Concat(parts)),
            Location::caller(),
        );
    }

    /// Logs a formatted message at the info severity.
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments) {
        self.log(Severity::Info, args, Location::caller());
    }

    /// Logs the concatenation of `parts` at the debug severity.
    #[track_caller]
    pub fn debug(&self, parts: &[&dyn Display]) {
        self.log(
            Severity::Debug,
            format_args!("{}", Concat(parts)),
            Location::caller(),
        );
    }

    /// Logs a formatted message at the debug severity.
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments) {
        self.log(Severity::Debug, args, Location::caller());
    }

    /// Logs the concatenation of `parts` at the warning severity.
    #[track_caller]
    pub fn warning(&self, parts: &[&dyn Display]) {
        self.log(
            Severity::Warning,
            format_args!("{}", Concat(parts)),
            Location::caller(),
        );
    }

    /// Logs a formatted message at the warning severity.
    #[track_caller]
    pub fn warningf(&self, args: fmt::Arguments) {
        self.log(Severity::Warning, args, Location::caller());
    }

    /// Logs the concatenation of `parts` at the error severity.
    #[track_caller]
    pub fn error(&self, parts: &[&dyn Display]) {
        self.log(
            Severity::Error,
            format_args!("{}", Concat(parts)),
            Location::caller(),
        );
    }

    /// Logs a formatted message at the error severity.
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments) {
        self.log(Severity::Error, args, Location::caller());
    }

    /// Logs the concatenation of `parts` at the fatal severity.
    ///
    /// Despite the name this does not terminate the process; fatal is a
    /// severity label routed like any other.
    #[track_caller]
    pub fn fatal(&self, parts: &[&dyn Display]) {
        self.log(
            Severity::Fatal,
            format_args!("{}", Concat(parts)),
            Location::caller(),
        );
    }

    /// Logs a formatted message at the fatal severity. Does not terminate
    /// the process.
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments) {
        self.log(Severity::Fatal, args, Location::caller());
    }

    fn log(&self, severity: Severity, body: fmt::Arguments, caller: &'static Location<'static>) {
        let line = if self.inner.debug_mode {
            format::verbose_line(severity, body, caller)
        } else {
            format::line(severity, body)
        };
        self.inner.dispatcher.post(severity, line);
    }
}

/// Wires queues, sinks, and consumer threads into a `Logger`.
///
/// `syslog` is `None` in debug mode; then no syslog consumer is started
/// and the dispatcher goes straight to the local queue.
pub(crate) fn start<S>(
    debug_mode: bool,
    queue_capacity: usize,
    syslog: Option<S>,
    local: LocalSink,
) -> Result<Logger>
where
    S: Forward + 'static,
{
    let syslog = match syslog {
        Some(sink) => {
            let (tx, rx) = dispatch::queue_bank(queue_capacity);
            consumer::spawn(Destination::Syslog, rx, sink)
                .map_err(|e| track!(ErrorKind::Other.cause(e)))?;
            Some(tx)
        }
        None => None,
    };
    let (local_tx, local_rx) = dispatch::queue_bank(queue_capacity);
    consumer::spawn(Destination::Local, local_rx, local)
        .map_err(|e| track!(ErrorKind::Other.cause(e)))?;

    Ok(Logger {
        inner: Arc::new(Inner {
            debug_mode,
            dispatcher: Dispatcher::new(syslog, local_tx),
        }),
    })
}

/// Logs the given values, concatenated with no separator, at the info
/// severity.
#[macro_export]
macro_rules! info {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.info(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Logs a `format!`-style message at the info severity.
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)*) => {
        $logger.infof(format_args!($($arg)*))
    };
}

/// Logs the given values, concatenated with no separator, at the debug
/// severity.
#[macro_export]
macro_rules! debug {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.debug(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Logs a `format!`-style message at the debug severity.
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debugf(format_args!($($arg)*))
    };
}

/// Logs the given values, concatenated with no separator, at the warning
/// severity.
#[macro_export]
macro_rules! warning {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.warning(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Logs a `format!`-style message at the warning severity.
#[macro_export]
macro_rules! warningf {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warningf(format_args!($($arg)*))
    };
}

/// Logs the given values, concatenated with no separator, at the error
/// severity.
#[macro_export]
macro_rules! error {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.error(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Logs a `format!`-style message at the error severity.
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)*) => {
        $logger.errorf(format_args!($($arg)*))
    };
}

/// Logs the given values, concatenated with no separator, at the fatal
/// severity. Does not terminate the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.fatal(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Logs a `format!`-style message at the fatal severity. Does not
/// terminate the process.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)*) => {
        $logger.fatalf(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);
    impl SharedBuf {
        fn new() -> Self {
            SharedBuf(Arc::new(Mutex::new(Vec::new())))
        }
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }
    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct RecordingSyslog(Arc<Mutex<Vec<(Severity, String)>>>);
    impl Forward for RecordingSyslog {
        fn forward(&mut self, severity: Severity, line: &str) -> io::Result<()> {
            self.0.lock().unwrap().push((severity, line.to_string()));
            Ok(())
        }
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn debug_mode_writes_verbose_lines_and_skips_syslog() {
        let info = SharedBuf::new();
        let err = SharedBuf::new();
        let local = LocalSink::from_streams(Box::new(info.clone()), Box::new(err.clone()));
        let logger = start(true, 16, None::<Infallible>, local).unwrap();

        crate::error!(logger, "boom");
        assert!(wait_until(|| err.contents().contains("[ERROR]boom")));

        let line = err.contents();
        assert!(line.contains("logger.rs:"), "{}", line);
        // Verbose prefix starts with the date, `YYYY/MM/DD`.
        assert_eq!(line.as_bytes()[4], b'/');
        assert!(info.contents().is_empty());
    }

    #[test]
    fn non_debug_prefers_syslog_exclusively() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let info = SharedBuf::new();
        let err = SharedBuf::new();
        let local = LocalSink::from_streams(Box::new(info.clone()), Box::new(err.clone()));
        let logger = start(
            false,
            16,
            Some(RecordingSyslog(Arc::clone(&records))),
            local,
        )
        .unwrap();

        crate::info!(logger, "hello", 42);
        assert!(wait_until(|| records
            .lock()
            .unwrap()
            .contains(&(Severity::Info, "[INFO]hello42".to_string()))));

        // The line went to the syslog path only.
        thread::sleep(Duration::from_millis(50));
        assert!(info.contents().is_empty());
        assert!(err.contents().is_empty());
    }

    #[test]
    fn fatal_is_only_a_severity_label() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let local = LocalSink::from_streams(
            Box::new(SharedBuf::new()),
            Box::new(SharedBuf::new()),
        );
        let logger = start(
            false,
            16,
            Some(RecordingSyslog(Arc::clone(&records))),
            local,
        )
        .unwrap();

        crate::fatalf!(logger, "x={}", 1);
        assert!(wait_until(|| records
            .lock()
            .unwrap()
            .contains(&(Severity::Fatal, "[FATAL]x=1".to_string()))));
    }

    #[test]
    fn clones_share_one_pipeline() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let local = LocalSink::from_streams(
            Box::new(SharedBuf::new()),
            Box::new(SharedBuf::new()),
        );
        let logger = start(
            false,
            16,
            Some(RecordingSyslog(Arc::clone(&records))),
            local,
        )
        .unwrap();

        let clone = logger.clone();
        crate::warningf!(clone, "w{}", 0);
        crate::warningf!(logger, "w{}", 1);
        assert!(wait_until(|| records.lock().unwrap().len() == 2));
        let records = records.lock().unwrap();
        assert_eq!(records[0], (Severity::Warning, "[WARNING]w0".to_string()));
        assert_eq!(records[1], (Severity::Warning, "[WARNING]w1".to_string()));
    }
}
