//! The remote syslog sink driver. Unix-like platforms only.
//!
//! Speaks the BSD syslog protocol directly over a Unix-domain socket
//! rather than going through the libc `syslog` API: POSIX supports only
//! one `openlog` identity per process, while this crate needs two logical
//! channels (`{identity}_info` and `{identity}_err`) with distinct tags.
#![cfg(unix)]

use chrono::Local;
use std::io;
use std::os::unix::net::{UnixDatagram, UnixStream};
use std::process;

use crate::consumer::Forward;
use crate::types::{Facility, Severity};
use crate::{ErrorKind, Result};
use trackable::error::ErrorKindExt;

/// Well-known syslogd socket paths, in the order they are tried.
const SOCKET_PATHS: &[&str] = &["/dev/log", "/var/run/syslog", "/var/run/log"];

/// Syslog level part of a priority value.
fn level(severity: Severity) -> u8 {
    match severity {
        Severity::Debug => 7,
        Severity::Info => 6,
        Severity::Warning => 4,
        Severity::Error => 3,
        Severity::Fatal => 2, // critical
    }
}

/// Forwards lines to the local syslog daemon on the severity-appropriate
/// channel: Debug/Info on the info channel, Warning/Error/Fatal on the
/// err channel.
pub(crate) struct SyslogSink {
    facility: Facility,
    info: Channel,
    err: Channel,
}
impl SyslogSink {
    /// Opens both channels. Fails if the syslog daemon is unreachable;
    /// the caller treats that as a fatal initialization error.
    pub(crate) fn connect(identity: &str, facility: Facility) -> Result<Self> {
        let info = Channel::open(format!("{}_info", identity))
            .map_err(|e| track!(ErrorKind::Other.cause(e)))?;
        let err = Channel::open(format!("{}_err", identity))
            .map_err(|e| track!(ErrorKind::Other.cause(e)))?;
        Ok(SyslogSink {
            facility,
            info,
            err,
        })
    }
}
impl Forward for SyslogSink {
    fn forward(&mut self, severity: Severity, line: &str) -> io::Result<()> {
        let priority = self.facility.code() | level(severity);
        let channel = match severity {
            Severity::Debug | Severity::Info => &mut self.info,
            Severity::Warning | Severity::Error | Severity::Fatal => &mut self.err,
        };
        channel.send(priority, line)
    }
}

/// One logical channel: a connection plus the tag stamped on its frames.
struct Channel {
    conn: Conn,
    tag: String,
}
impl Channel {
    fn open(tag: String) -> io::Result<Self> {
        Ok(Channel {
            conn: Conn::connect()?,
            tag,
        })
    }

    fn send(&mut self, priority: u8, msg: &str) -> io::Result<()> {
        let frame = frame(priority, &self.tag, process::id(), msg);
        if self.conn.send(frame.as_bytes()).is_ok() {
            return Ok(());
        }
        // One reconnect attempt, in case syslogd was restarted.
        self.conn = Conn::connect()?;
        self.conn.send(frame.as_bytes())
    }
}

/// Builds one BSD-style frame: `<pri>Mmm dd hh:mm:ss tag[pid]: msg`.
fn frame(priority: u8, tag: &str, pid: u32, msg: &str) -> String {
    format!(
        "<{}>{} {}[{}]: {}\n",
        priority,
        Local::now().format("%b %e %H:%M:%S"),
        tag,
        pid,
        msg
    )
}

enum Conn {
    Datagram(UnixDatagram),
    Stream(UnixStream),
}
impl Conn {
    fn connect() -> io::Result<Conn> {
        let mut last_err = None;
        for path in SOCKET_PATHS {
            match datagram(path) {
                Ok(socket) => return Ok(Conn::Datagram(socket)),
                Err(e) => last_err = Some(e),
            }
            match UnixStream::connect(path) {
                Ok(stream) => return Ok(Conn::Stream(stream)),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no syslog socket found")
        }))
    }

    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        match self {
            Conn::Datagram(socket) => socket.send(frame).map(|_| ()),
            Conn::Stream(stream) => io::Write::write_all(stream, frame),
        }
    }
}

fn datagram(path: &str) -> io::Result<UnixDatagram> {
    let socket = UnixDatagram::unbound()?;
    socket.connect(path)?;
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_the_severity_table() {
        assert_eq!(level(Severity::Debug), 7);
        assert_eq!(level(Severity::Info), 6);
        assert_eq!(level(Severity::Warning), 4);
        assert_eq!(level(Severity::Error), 3);
        assert_eq!(level(Severity::Fatal), 2);
    }

    #[test]
    fn frame_layout() {
        // local3.info = 19 * 8 + 6.
        let priority = Facility::Local3.code() | level(Severity::Info);
        let frame = frame(priority, "svc_info", 42, "[INFO]hello");
        assert!(frame.starts_with("<158>"), "{}", frame);
        assert!(frame.ends_with(" svc_info[42]: [INFO]hello\n"), "{}", frame);
    }

    #[test]
    fn sink_delivers_over_a_datagram_socket() {
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.sock");
        let server = UnixDatagram::bind(&path).unwrap();

        let conn = Conn::Datagram(datagram(path.to_str().unwrap()).unwrap());
        let mut sink = SyslogSink {
            facility: Facility::default(),
            info: Channel {
                conn,
                tag: "svc_info".to_string(),
            },
            err: Channel {
                conn: Conn::Datagram(datagram(path.to_str().unwrap()).unwrap()),
                tag: "svc_err".to_string(),
            },
        };

        sink.forward(Severity::Info, "[INFO]hello42").unwrap();
        sink.forward(Severity::Fatal, "[FATAL]boom").unwrap();

        let mut buf = [0u8; 1024];
        let n = server.recv(&mut buf).unwrap();
        let first = String::from_utf8_lossy(&buf[..n]).to_string();
        assert!(first.starts_with("<158>"), "{}", first);
        assert!(first.contains("svc_info["), "{}", first);
        assert!(first.ends_with("]: [INFO]hello42\n"), "{}", first);

        let n = server.recv(&mut buf).unwrap();
        let second = String::from_utf8_lossy(&buf[..n]).to_string();
        // local3.crit = 19 * 8 + 2.
        assert!(second.starts_with("<154>"), "{}", second);
        assert!(second.contains("svc_err["), "{}", second);
    }
}
