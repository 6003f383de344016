// SPDX-License-Identifier: MIT
//
// Frame output.
//
// Every paint rewrites the whole face: there is no diff against the
// previous frame. What keeps that cheap is the `Pen`, which remembers the
// cursor position, colors and attributes it last emitted and writes an
// escape only when the next cell needs a different one. A face is mostly
// long runs of one background, so the typical cell costs a single byte.
//
// A frame is encoded into one byte vector, wrapped in a synchronized
// update, and handed to the terminal in a single write.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::cell::{Attr, Cell};
use crate::color::CellColor;

const FRAME_CAPACITY: usize = 16 * 1024;

// ─── Pen ─────────────────────────────────────────────────────────────────────

/// Terminal state as of the last byte written.
#[derive(Debug, Default)]
struct Pen {
    /// Where the next printed character will land without a cursor move.
    next: Option<(u16, u16)>,
    fg: Option<CellColor>,
    bg: Option<CellColor>,
    attrs: Attr,
}

impl Pen {
    fn put(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: &Cell) {
        // The right half of a wide character that was just printed.
        if cell.is_continuation() && self.next == Some((x, y)) && x > 0 {
            self.next = Some((x.saturating_add(1), y));
            return;
        }
        if self.next != Some((x, y)) {
            ansi::cursor_to(out, x, y).ok();
        }
        self.style(out, cell);

        let ch = cell.character().unwrap_or(' ');
        let mut utf8 = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        // A wide character leaves the terminal cursor two columns on; its
        // placeholder cell accounts for the second.
        self.next = Some((x.saturating_add(1), y));
    }

    fn style(&mut self, out: &mut Vec<u8>, cell: &Cell) {
        if cell.attrs != self.attrs {
            if !self.attrs.is_empty() {
                // Attributes are only switched off by a full reset.
                out.extend_from_slice(ansi::RESET);
                self.fg = None;
                self.bg = None;
            }
            ansi::attrs(out, cell.attrs).ok();
            self.attrs = cell.attrs;
        }
        if self.fg != Some(cell.fg) {
            ansi::fg(out, cell.fg).ok();
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            ansi::bg(out, cell.bg).ok();
            self.bg = Some(cell.bg);
        }
    }
}

// ─── FrameWriter ─────────────────────────────────────────────────────────────

/// Encodes whole frames and writes them to the terminal.
pub struct FrameWriter {
    bytes: Vec<u8>,
}

impl FrameWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(FRAME_CAPACITY),
        }
    }

    /// Encode `frame` without writing it. `cursor` is where the terminal
    /// cursor is shown afterwards; `None` keeps it hidden.
    pub fn encode(&mut self, frame: &FrameBuffer, cursor: Option<(u16, u16)>) {
        self.bytes.clear();
        self.bytes.extend_from_slice(ansi::SYNC_BEGIN);
        self.bytes.extend_from_slice(ansi::CURSOR_HIDE);

        let mut pen = Pen::default();
        for (x, y, cell) in frame.iter() {
            pen.put(&mut self.bytes, x, y, cell);
        }

        self.bytes.extend_from_slice(ansi::RESET);
        if let Some((x, y)) = cursor {
            ansi::cursor_to(&mut self.bytes, x, y).ok();
            self.bytes.extend_from_slice(ansi::CURSOR_SHOW);
        }
        self.bytes.extend_from_slice(ansi::SYNC_END);
    }

    /// Encode `frame` and write it to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn render(&mut self, frame: &FrameBuffer, cursor: Option<(u16, u16)>) -> io::Result<()> {
        self.render_to(&mut io::stdout().lock(), frame, cursor)
    }

    /// Encode `frame` and write it to `w` in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn render_to(
        &mut self,
        w: &mut impl Write,
        frame: &FrameBuffer,
        cursor: Option<(u16, u16)>,
    ) -> io::Result<()> {
        self.encode(frame, cursor);
        w.write_all(&self.bytes)?;
        w.flush()
    }

    /// Bytes of the last encoded frame.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pen_output(cells: &[(u16, u16, Cell)]) -> String {
        let mut pen = Pen::default();
        let mut out = Vec::new();
        for (x, y, cell) in cells {
            pen.put(&mut out, *x, *y, cell);
        }
        String::from_utf8(out).unwrap()
    }

    fn encoded(frame: &FrameBuffer, cursor: Option<(u16, u16)>) -> String {
        let mut fw = FrameWriter::new();
        fw.encode(frame, cursor);
        String::from_utf8(fw.pending().to_vec()).unwrap()
    }

    #[test]
    fn runs_of_one_style_cost_one_byte_per_cell() {
        let cell = Cell::styled('#', CellColor::Rgb(1, 1, 1), CellColor::Rgb(2, 2, 2));
        assert_eq!(
            pen_output(&[(0, 0, cell), (1, 0, cell), (2, 0, cell)]),
            "\x1b[1;1H\x1b[38;2;1;1;1m\x1b[48;2;2;2;2m###"
        );
    }

    #[test]
    fn only_the_changed_color_is_emitted() {
        let bg = CellColor::Rgb(0, 0, 0);
        let out = pen_output(&[
            (0, 0, Cell::styled('a', CellColor::Rgb(9, 9, 9), bg)),
            (1, 0, Cell::styled('b', CellColor::Rgb(8, 8, 8), bg)),
        ]);
        assert!(out.ends_with("a\x1b[38;2;8;8;8mb"));
    }

    #[test]
    fn row_change_moves_cursor() {
        let out = pen_output(&[(0, 0, Cell::EMPTY), (0, 1, Cell::EMPTY)]);
        assert!(out.ends_with(" \x1b[2;1H "));
    }

    #[test]
    fn wide_char_placeholder_is_skipped() {
        let wide = pen_output(&[(0, 0, Cell::new('日'))]);
        let with_placeholder = pen_output(&[
            (0, 0, Cell::new('日')),
            (1, 0, Cell::continuation(CellColor::Default, CellColor::Default)),
        ]);
        assert_eq!(wide, with_placeholder);
    }

    #[test]
    fn dropping_attrs_resets_and_restores_colors() {
        let out = pen_output(&[
            (0, 0, Cell::new('!').with_attrs(Attr::BOLD)),
            (1, 0, Cell::new('b')),
        ]);
        assert!(out.ends_with("!\x1b[0m\x1b[39m\x1b[49mb"));
    }

    #[test]
    fn frame_is_wrapped_in_sync() {
        let mut frame = FrameBuffer::new(3, 2);
        frame.print(0, 0, "12:", CellColor::Default, CellColor::Default);
        frame.print(0, 1, "34 ", CellColor::Default, CellColor::Default);
        let s = encoded(&frame, None);
        assert!(s.starts_with("\x1b[?2026h\x1b[?25l"));
        assert!(s.contains("12:\x1b[2;1H34 "));
        assert!(s.ends_with("\x1b[0m\x1b[?2026l"));
    }

    #[test]
    fn identical_frames_encode_identically() {
        let frame = FrameBuffer::filled(2, 1, Cell::new('z'));
        let mut fw = FrameWriter::new();
        let mut first = Vec::new();
        let mut second = Vec::new();
        fw.render_to(&mut first, &frame, None).unwrap();
        fw.render_to(&mut second, &frame, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cursor_is_shown_where_requested() {
        let s = encoded(&FrameBuffer::new(4, 2), Some((2, 1)));
        assert!(s.ends_with("\x1b[2;3H\x1b[?25h\x1b[?2026l"));
    }
}
