//! The bounded queue pair and the non-blocking dispatcher.
//!
//! Each destination owns one bounded FIFO per severity. The dispatcher
//! runs on the caller's thread and never waits more than [`ENQUEUE_WAIT`]
//! per queue; a line that fits nowhere is dropped without a trace.
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::time::Duration;

use crate::types::Severity;

/// The default capacity of each (severity, destination) queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Upper bound on a single enqueue attempt. A log call makes at most two
/// attempts, so the worst-case caller-side delay is about twice this.
pub(crate) const ENQUEUE_WAIT: Duration = Duration::from_millis(1);

/// The producer half of one destination's severity queues.
pub(crate) struct Producers {
    tx: Vec<Sender<String>>,
}
impl Producers {
    fn sender(&self, severity: Severity) -> &Sender<String> {
        &self.tx[severity.index()]
    }
}

/// Allocates one bounded queue per severity for a single destination.
pub(crate) fn queue_bank(capacity: usize) -> (Producers, Vec<Receiver<String>>) {
    let mut tx = Vec::with_capacity(Severity::ALL.len());
    let mut rx = Vec::with_capacity(Severity::ALL.len());
    for _ in Severity::ALL.iter() {
        let (s, r) = bounded(capacity);
        tx.push(s);
        rx.push(r);
    }
    (Producers { tx }, rx)
}

/// Routes one rendered line to the syslog queue, the local queue, or the
/// floor.
///
/// The syslog queues exist only outside of debug mode, so "skip syslog in
/// debug mode" falls out of the type rather than a flag check.
pub(crate) struct Dispatcher {
    syslog: Option<Producers>,
    local: Producers,
}
impl Dispatcher {
    pub(crate) fn new(syslog: Option<Producers>, local: Producers) -> Self {
        Dispatcher { syslog, local }
    }

    /// Non-blocking delivery: try the syslog queue, fall back to the local
    /// queue, otherwise drop. A line accepted by the syslog queue is never
    /// also sent locally.
    pub(crate) fn post(&self, severity: Severity, line: String) {
        let line = match &self.syslog {
            Some(queues) => {
                match queues.sender(severity).send_timeout(line, ENQUEUE_WAIT) {
                    Ok(()) => return,
                    Err(SendTimeoutError::Timeout(line))
                    | Err(SendTimeoutError::Disconnected(line)) => line,
                }
            }
            None => line,
        };
        let _ = self.local.sender(severity).send_timeout(line, ENQUEUE_WAIT);
    }
}
