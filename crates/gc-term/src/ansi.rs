// SPDX-License-Identifier: MIT
//
// Escape sequences the clock emits.
//
// Fixed sequences are byte constants; anything parameterised is a writer
// function over `impl Write`. Positions are 0-indexed here and 1-indexed
// on the wire.

use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::CellColor;

// ─── Fixed Sequences ─────────────────────────────────────────────────────────

pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
/// SGR 0.
pub const RESET: &[u8] = b"\x1b[0m";
pub const ALT_SCREEN_ON: &[u8] = b"\x1b[?1049h";
pub const ALT_SCREEN_OFF: &[u8] = b"\x1b[?1049l";
/// Synchronized update (mode 2026). Ignored by terminals without it.
pub const SYNC_BEGIN: &[u8] = b"\x1b[?2026h";
pub const SYNC_END: &[u8] = b"\x1b[?2026l";

/// Written when the clock takes over the screen.
pub const ENTER_SCREEN: [&[u8]; 3] = [ALT_SCREEN_ON, CURSOR_HIDE, CLEAR_SCREEN];

/// Written when it gives the screen back. The screen switch goes last so
/// the reset and cursor apply to the main screen too.
pub const LEAVE_SCREEN: [&[u8]; 4] = [SYNC_END, RESET, CURSOR_SHOW, ALT_SCREEN_OFF];

/// Write a group of fixed sequences.
///
/// # Errors
///
/// Propagates the writer's error.
pub fn write_all(w: &mut impl Write, sequences: &[&[u8]]) -> io::Result<()> {
    sequences.iter().try_for_each(|seq| w.write_all(seq))
}

// ─── Parameterised ───────────────────────────────────────────────────────────

/// CUP to column `x`, row `y`.
///
/// # Errors
///
/// Propagates the writer's error.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// # Errors
///
/// Propagates the writer's error.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color.rgb() {
        Some((r, g, b)) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
        None => w.write_all(b"\x1b[39m"),
    }
}

/// # Errors
///
/// Propagates the writer's error.
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color.rgb() {
        Some((r, g, b)) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
        None => w.write_all(b"\x1b[49m"),
    }
}

/// One SGR sequence turning on every flag in `attr`. Empty sets write
/// nothing.
///
/// # Errors
///
/// Propagates the writer's error.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    let mut params = Attr::SGR.iter().filter(|(flag, _)| attr.contains(*flag));
    let Some((_, first)) = params.next() else {
        return Ok(());
    };
    write!(w, "\x1b[{first}")?;
    for (_, code) in params {
        write!(w, ";{code}")?;
    }
    w.write_all(b"m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cursor_is_one_based() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 79, 23)), "\x1b[24;80H");
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, 0)), "\x1b[1;65536H");
    }

    #[test]
    fn truecolor_and_default() {
        assert_eq!(emit(|w| fg(w, CellColor::Rgb(255, 0, 10))), "\x1b[38;2;255;0;10m");
        assert_eq!(emit(|w| bg(w, CellColor::Rgb(0, 0, 0))), "\x1b[48;2;0;0;0m");
        assert_eq!(emit(|w| fg(w, CellColor::Default)), "\x1b[39m");
        assert_eq!(emit(|w| bg(w, CellColor::Default)), "\x1b[49m");
    }

    #[test]
    fn attrs_share_one_sequence() {
        assert_eq!(emit(|w| attrs(w, Attr::BOLD)), "\x1b[1m");
        assert_eq!(emit(|w| attrs(w, Attr::BOLD | Attr::DIM)), "\x1b[1;2m");
        assert_eq!(emit(|w| attrs(w, Attr::empty())), "");
    }

    #[test]
    fn leaving_switches_screen_last() {
        let s = emit(|w| write_all(w, &LEAVE_SCREEN));
        assert!(s.starts_with("\x1b[?2026l"));
        assert!(s.ends_with("\x1b[?1049l"));
        assert_eq!(emit(|w| write_all(w, &ENTER_SCREEN)), "\x1b[?1049h\x1b[?25l\x1b[2J");
    }
}
