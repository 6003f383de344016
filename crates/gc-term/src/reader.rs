// SPDX-License-Identifier: MIT
//
// Stdin on a thread of its own.
//
// The event loop must wake for ticks even when no key is pressed, so it
// waits on a channel with a timeout instead of on `read()`. This thread
// feeds that channel with raw byte chunks. It only calls `read()` once
// `poll()` says input is ready, and checks its stop flag between polls,
// so `stop` returns within one poll period.
#![allow(unsafe_code)]

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const CHUNK: usize = 1024;

/// Longest the thread goes without looking at the stop flag.
const STOP_CHECK: Duration = Duration::from_millis(50);

/// Handle to the reader thread. Dropping it stops the thread.
pub struct StdinReader {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl StdinReader {
    /// Start reading. The receiver yields non-empty chunks and disconnects
    /// at EOF, on a read error, or after [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// Fails if the thread cannot be spawned.
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("stdin".into())
            .spawn(move || pump(&tx, &flag))?;
        Ok((
            Self {
                stop,
                thread: Some(thread),
            },
            rx,
        ))
    }

    /// Ask the thread to finish and wait for it. Safe to call twice.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pump(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    let mut stdin = io::stdin().lock();
    let mut buf = [0u8; CHUNK];
    while !stop.load(Ordering::Relaxed) {
        if !readable(STOP_CHECK) {
            continue;
        }
        match stdin.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    return;
                }
            }
        }
    }
}

/// Wait up to `timeout` for stdin to have input (or hang up).
#[cfg(unix)]
fn readable(timeout: Duration) -> bool {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let ms = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
    // SAFETY: one valid pollfd for the duration of the call.
    unsafe { libc::poll(&raw mut pfd, 1, ms) > 0 }
}

/// Without `poll`, block in `read` and let the stop flag be seen after.
#[cfg(not(unix))]
const fn readable(_timeout: Duration) -> bool {
    true
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let (mut reader, _rx) = StdinReader::spawn().unwrap();
        reader.stop();
        reader.stop();
    }

    #[test]
    fn channel_disconnects_after_stop() {
        let (reader, rx) = StdinReader::spawn().unwrap();
        drop(reader);
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(20)).is_err());
    }
}
