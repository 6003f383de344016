// SPDX-License-Identifier: MIT
//
// Terminal control: viewport size, raw mode, and taking over the screen.
//
// `Terminal::enter` puts stdin in raw mode and switches to the alternate
// screen with the cursor hidden; `leave` (or drop) undoes both. A panic
// hook does the same before the panic message prints, writing straight to
// fd 1 so it cannot block on a stdout lock held mid-frame.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::Once;

use crate::ansi;

/// Used when the size cannot be queried, e.g. output is not a terminal.
const FALLBACK_SIZE: Size = Size { cols: 80, rows: 24 };

// ─── Size ───────────────────────────────────────────────────────────────────

/// Viewport dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Whether both dimensions are at least those of `min`.
    #[inline]
    #[must_use]
    pub const fn fits(self, min: Self) -> bool {
        self.cols >= min.cols && self.rows >= min.rows
    }
}

/// Ask the kernel for the window size of stdout, then stdin.
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    [libc::STDOUT_FILENO, libc::STDIN_FILENO].into_iter().find_map(|fd| {
        // SAFETY: winsize is plain data; TIOCGWINSZ only writes into it.
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let ok = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) } == 0;
        (ok && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

#[cfg(unix)]
mod tty {
    use std::io;
    use std::sync::Mutex;

    /// Settings to put back if we panic, when the guard is out of reach.
    static SAVED: Mutex<Option<libc::termios>> = Mutex::new(None);

    /// Holds stdin in raw mode; the previous settings return on drop.
    pub struct RawMode {
        original: libc::termios,
    }

    impl RawMode {
        /// Switch stdin to raw mode. `Ok(None)` when stdin is not a tty.
        pub fn enable() -> io::Result<Option<Self>> {
            let fd = libc::STDIN_FILENO;
            // SAFETY: isatty only inspects the descriptor.
            if unsafe { libc::isatty(fd) } == 0 {
                return Ok(None);
            }

            // SAFETY: termios is plain data filled in by tcgetattr.
            let mut original: libc::termios = unsafe { std::mem::zeroed() };
            if unsafe { libc::tcgetattr(fd, &raw mut original) } != 0 {
                return Err(io::Error::last_os_error());
            }

            let mut settings = original;
            // SAFETY: cfmakeraw edits the struct it is given.
            unsafe { libc::cfmakeraw(&raw mut settings) };
            settings.c_cc[libc::VMIN] = 1;
            settings.c_cc[libc::VTIME] = 0;
            set(&settings)?;

            if let Ok(mut saved) = SAVED.lock() {
                *saved = Some(original);
            }
            Ok(Some(Self { original }))
        }
    }

    impl Drop for RawMode {
        fn drop(&mut self) {
            let _ = set(&self.original);
            if let Ok(mut saved) = SAVED.lock() {
                *saved = None;
            }
        }
    }

    fn set(termios: &libc::termios) -> io::Result<()> {
        // SAFETY: the pointer is valid for the duration of the call.
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    /// Panic path: restore whatever was saved, ignoring lock poisoning.
    pub fn restore_saved() {
        let saved = SAVED.lock().map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard);
        if let Some(original) = saved {
            let _ = set(&original);
        }
    }

    /// Panic path: write without touching `io::stdout`'s lock.
    pub fn write_raw(bytes: &[u8]) {
        // SAFETY: the slice outlives the call.
        let _ = unsafe { libc::write(libc::STDOUT_FILENO, bytes.as_ptr().cast(), bytes.len()) };
    }
}

#[cfg(not(unix))]
mod tty {
    use std::io::{self, Write};

    pub struct RawMode;

    impl RawMode {
        pub fn enable() -> io::Result<Option<Self>> {
            Ok(None)
        }
    }

    pub fn restore_saved() {}

    pub fn write_raw(bytes: &[u8]) {
        let mut out = io::stdout();
        let _ = out.write_all(bytes);
        let _ = out.flush();
    }
}

use tty::RawMode;

// ─── Panic Hook ─────────────────────────────────────────────────────────────

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            for seq in ansi::LEAVE_SCREEN {
                tty::write_raw(seq);
            }
            tty::restore_saved();
            previous(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The clock's hold on the terminal.
///
/// ```no_run
/// use gc_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... paint frames ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    size: Size,
    /// `Some` while entered and stdin is a tty.
    raw: Option<RawMode>,
    entered: bool,
}

impl Terminal {
    /// Query the size. Nothing on screen changes until [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: query_size().unwrap_or(FALLBACK_SIZE),
            raw: None,
            entered: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again, keeping the old one if that fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = query_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_entered(&self) -> bool {
        self.entered
    }

    /// Raw mode, alternate screen, hidden cursor, cleared screen.
    ///
    /// # Errors
    ///
    /// Fails if raw mode cannot be set or stdout cannot be written.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::write_all(&mut out, &ansi::ENTER_SCREEN)?;
        out.flush()?;

        self.entered = true;
        Ok(())
    }

    /// Give the screen back and restore the previous tty settings.
    ///
    /// # Errors
    ///
    /// Fails if stdout cannot be written.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;

        let mut out = io::stdout().lock();
        let written = ansi::write_all(&mut out, &ansi::LEAVE_SCREEN).and_then(|()| out.flush());
        drop(out);
        drop(self.raw.take());
        written
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fits_needs_both_dimensions() {
        let min = Size { cols: 6, rows: 4 };
        assert!(Size { cols: 6, rows: 4 }.fits(min));
        assert!(Size { cols: 200, rows: 60 }.fits(min));
        assert!(!Size { cols: 5, rows: 40 }.fits(min));
        assert!(!Size { cols: 60, rows: 3 }.fits(min));
    }

    #[test]
    fn new_terminal_has_a_size_and_is_not_entered() {
        let term = Terminal::new();
        assert!(term.size().cols > 0 && term.size().rows > 0);
        assert!(!term.is_entered());
    }

    #[test]
    fn leave_without_enter_writes_nothing() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        assert!(!term.is_entered());
    }

    #[test]
    fn refresh_keeps_a_size() {
        let mut term = Terminal::new();
        let before = term.size();
        let after = term.refresh_size();
        assert_eq!(after, term.size());
        if query_size().is_none() {
            assert_eq!(after, before);
        }
    }
}
