//! The local sink driver: terminal streams in debug mode, append-only
//! files otherwise.
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::consumer::Forward;
use crate::types::Severity;

/// Writes each line to the severity-appropriate local stream.
///
/// Debug/Info/Warning share the info stream, Error/Fatal the err stream.
/// Only the single local consumer thread ever touches the streams, so no
/// locking is needed here.
pub(crate) struct LocalSink {
    info: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}
impl LocalSink {
    /// Debug-mode sink: stdout for the info stream, stderr for the err
    /// stream.
    pub(crate) fn terminal() -> Self {
        LocalSink {
            info: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Non-debug sink: `{identity}_info` and `{identity}_err` files under
    /// `dir`, created if absent and always appended to.
    pub(crate) fn files(dir: &Path, identity: &str) -> io::Result<Self> {
        let info = open_append(&dir.join(format!("{}_info", identity)))?;
        let err = open_append(&dir.join(format!("{}_err", identity)))?;
        Ok(LocalSink {
            info: Box::new(info),
            err: Box::new(err),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_streams(
        info: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        LocalSink { info, err }
    }
}
impl Forward for LocalSink {
    fn forward(&mut self, severity: Severity, line: &str) -> io::Result<()> {
        let stream = match severity {
            Severity::Debug | Severity::Info | Severity::Warning => &mut self.info,
            Severity::Error | Severity::Fatal => &mut self.err,
        };
        stream.write_all(line.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
