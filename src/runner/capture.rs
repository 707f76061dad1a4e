//! Background draining of a child's output pipes.
//!
//! Each pipe gets its own reader thread that appends into a shared buffer. The runner can then snapshot the
//! buffer after a bounded wait, which keeps whatever was printed before a kill and never blocks on a pipe that
//! an orphaned grandchild still holds open.

use std::io::{ErrorKind, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

const CHUNK_SIZE: usize = 4096;

/// Output collected from one pipe by a reader thread.
#[derive(Debug)]
pub struct StreamCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl StreamCapture {
    /// Start draining `pipe` on a new thread.
    pub fn spawn<R>(pipe: R, label: &'static str) -> Self
    where
        R: Read + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let sink = Arc::clone(&buffer);

        thread::spawn(move || {
            drain(pipe, &sink, label);
            let _ = tx.send(());
        });

        Self { buffer, done }
    }

    /// A capture for a stream that was never opened.
    pub fn empty() -> Self {
        let (tx, done) = mpsc::channel();
        let _ = tx.send(());
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
            done,
        }
    }

    /// Wait until `deadline` for the reader to hit EOF, then decode what was captured.
    ///
    /// Captures of one child share a deadline, so a pipe held open by a grandchild costs the grace period once.
    pub fn finish(self, deadline: Instant) -> String {
        match self.done.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("pipe still open at reader deadline");
            }
        }
        let bytes = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

fn drain<R: Read>(mut pipe: R, sink: &Mutex<Vec<u8>>, label: &str) {
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        match pipe.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => sink
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!(stream = label, error = %e, "stopped reading child output");
                break;
            }
        }
    }
}
