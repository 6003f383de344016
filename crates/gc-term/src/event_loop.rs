// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: stdin bytes in, whole frames out.
//
// The loop blocks on the reader channel with the app's poll interval as
// the timeout. Each wakeup does the same four things:
//
//   1. parse any bytes that arrived and hand the events to the app
//      (on timeout, a lone pending ESC is flushed as the Escape key)
//   2. pick up a resize flagged by SIGWINCH
//   3. ask the app whether time moved enough to need a repaint
//   4. if anything changed, let the app paint a fresh FrameBuffer and
//      write every cell of it
//
// Idle cost is one wakeup per poll interval and no output unless the app
// says the face changed.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::buffer::FrameBuffer;
use crate::input::{Event, Parser};
use crate::output::FrameWriter;
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the app wants after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// A full-screen application driven by [`EventLoop`].
///
/// Per wakeup the loop calls [`on_event`](App::on_event) for each parsed
/// event, [`on_resize`](App::on_resize) after SIGWINCH, then
/// [`on_tick`](App::on_tick), and finally [`paint`](App::paint) when any
/// of them reported a change.
pub trait App {
    /// Handle a key. Return [`Action::Quit`] to leave the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    fn on_resize(&mut self, _size: Size) {}

    /// Called on every wakeup. Return `true` if a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// How long the loop may block waiting for input.
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(50)
    }

    /// Build the frame for a viewport of `size`. The returned buffer is
    /// written in full.
    fn paint(&mut self, size: Size) -> FrameBuffer;

    /// Where to show the hardware cursor after painting, if anywhere.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, parser and frame writer for the lifetime of a run.
///
/// ```no_run
/// use gc_term::buffer::FrameBuffer;
/// use gc_term::event_loop::{Action, App, EventLoop};
/// use gc_term::input::{Event, KeyCode};
/// use gc_term::terminal::Size;
///
/// struct Blank;
///
/// impl App for Blank {
///     fn on_event(&mut self, event: &Event) -> Action {
///         let Event::Key(key) = event;
///         if key.code == KeyCode::Char('q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, size: Size) -> FrameBuffer {
///         FrameBuffer::new(size.cols, size.rows)
///     }
/// }
///
/// EventLoop::new().run(&mut Blank)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    writer: FrameWriter,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            writer: FrameWriter::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, run until the app quits, and restore the
    /// terminal even if the loop failed.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, the reader thread or frame
    /// output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = match StdinReader::spawn() {
            Ok((mut reader, rx)) => {
                let result = self.run_inner(app, &rx);
                reader.stop();
                result
            }
            Err(e) => Err(e),
        };

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let mut size = self.terminal.size();
        app.on_resize(size);
        let mut dirty = true;

        loop {
            let events = match rx.recv_timeout(app.poll_interval()) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) => {
                    if self.parser.has_pending() {
                        self.parser.flush()
                    } else {
                        Vec::new()
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            };

            for event in &events {
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
            }
            dirty |= !events.is_empty();

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                size = self.terminal.refresh_size();
                app.on_resize(size);
                dirty = true;
            }

            dirty |= app.on_tick();

            if dirty {
                let frame = app.paint(size);
                self.writer.render(&frame, app.cursor())?;
                dirty = false;
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent, Modifiers};

    struct MinimalApp;

    impl App for MinimalApp {
        fn paint(&mut self, size: Size) -> FrameBuffer {
            FrameBuffer::new(size.cols, size.rows)
        }
    }

    #[test]
    fn app_defaults() {
        let mut app = MinimalApp;
        let key = Event::Key(KeyEvent::new(KeyCode::Char('x'), Modifiers::empty()));
        assert_eq!(app.on_event(&key), Action::Continue);
        assert!(!app.on_tick());
        assert!(app.cursor().is_none());
        assert_eq!(app.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn paint_matches_requested_size() {
        let mut app = MinimalApp;
        let frame = app.paint(Size { cols: 12, rows: 5 });
        assert_eq!(frame.total_cells(), 60);
    }

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }

    #[test]
    fn event_loop_reports_size() {
        let event_loop = EventLoop::new();
        assert!(event_loop.size().cols > 0);
    }
}
