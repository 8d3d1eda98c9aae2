//! The two perpetual consumer loops and their supervision harness.
//!
//! One thread drains the syslog queues and one drains the local queues.
//! A loop suspends while all of its queues are empty, drains whichever
//! queue is ready next, and only exits once every producer handle is
//! gone. A panic inside a sink driver is caught, reported on stderr (a
//! fallback channel distinct from the normal sinks), and the loop is
//! restarted.
use crossbeam_channel::{Receiver, Select};
use std::any::Any;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;

use crate::types::{Destination, Severity};

/// A sink driver fed by a consumer loop.
///
/// Errors are swallowed by the loop: delivery is fire-and-forget and a
/// failed write must never stall or kill the pipeline.
pub(crate) trait Forward: Send {
    fn forward(&mut self, severity: Severity, line: &str) -> io::Result<()>;
}

/// The syslog-less stand-in used where no syslog consumer exists.
impl Forward for std::convert::Infallible {
    fn forward(&mut self, _severity: Severity, _line: &str) -> io::Result<()> {
        match *self {}
    }
}

pub(crate) struct Consumer<F> {
    destination: Destination,
    queues: Vec<Receiver<String>>,
    sink: F,
}
impl<F: Forward> Consumer<F> {
    pub(crate) fn new(
        destination: Destination,
        queues: Vec<Receiver<String>>,
        sink: F,
    ) -> Self {
        Consumer {
            destination,
            queues,
            sink,
        }
    }

    /// Runs until all producers are gone, restarting after panics.
    pub(crate) fn run(mut self) {
        loop {
            let outcome = catch_unwind(AssertUnwindSafe(|| self.drain()));
            match outcome {
                Ok(()) => return,
                Err(cause) => {
                    eprintln!(
                        "logpost: {} consumer recovered from panic: {}",
                        self.destination.name(),
                        panic_message(&cause)
                    );
                }
            }
        }
    }

    fn drain(&mut self) {
        let mut open: Vec<usize> = (0..self.queues.len()).collect();
        while !open.is_empty() {
            let mut select = Select::new();
            for &queue in &open {
                select.recv(&self.queues[queue]);
            }
            let op = select.select();
            let slot = op.index();
            let queue = open[slot];
            match op.recv(&self.queues[queue]) {
                Ok(line) => {
                    let _ = self.sink.forward(Severity::ALL[queue], &line);
                }
                Err(_) => {
                    open.remove(slot);
                }
            }
        }
    }
}

/// Starts a consumer loop on its own named background thread.
pub(crate) fn spawn<F>(
    destination: Destination,
    queues: Vec<Receiver<String>>,
    sink: F,
) -> io::Result<()>
where
    F: Forward + 'static,
{
    thread::Builder::new()
        .name(format!("logpost-{}", destination.name()))
        .spawn(move || Consumer::new(destination, queues, sink).run())?;
    Ok(())
}

fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(message) = cause.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
