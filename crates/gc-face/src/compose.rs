// SPDX-License-Identifier: MIT
//
// Compositor: paints every viewport cell of a face exactly once.
//
// Input is the glyphs, the placement the layout engine chose for them, and
// the style. Output is a viewport-sized FrameBuffer with nothing left
// unpainted, so the writer never has to clear the screen between frames.
//
// Design:
//
//   - A column lookup maps each viewport column to the glyph slot covering
//     it. The row-major pass then decides each cell in constant time.
//
//   - Inside a slot the local offset is split into (glyph cell, offset
//     within block) by the block pitch. Offsets that fall in the padding
//     between blocks are background.
//
//   - Pitch arithmetic is done in `u32`. Padding along an axis where a
//     glyph is one cell wide never counts toward the fit, so it can be as
//     large as `u16::MAX`.
//
//   - The fill string is indexed by the column within the block, so a
//     multi-character fill repeats across wide blocks.
//
//   - The date line is centered under the glyphs after one blank row, and
//     only when the layout kept rows for it.

use gc_term::buffer::FrameBuffer;
use gc_term::cell::Cell;
use gc_term::color::CellColor;
use gc_term::terminal::Size;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::StyleConfig;
use crate::glyph::{GlyphMatrix, GlyphRole};
use crate::layout::Placement;

/// Paint `glyphs` at `placement`, with an optional date line in the reserved
/// rows below the composition.
///
/// `glyphs[i]` is drawn in `placement.slots[i]`. Lit cells take the active
/// or colon colors by role, unlit cells the inactive ones, and everything
/// else the background. `date_line` is ignored unless the placement
/// reserved at least two rows and the text row is inside the viewport.
///
/// The result is always `viewport.cols × viewport.rows` cells.
#[must_use]
pub fn compose(
    glyphs: &[GlyphMatrix],
    placement: &Placement,
    style: &StyleConfig,
    viewport: Size,
    date_line: Option<&str>,
) -> FrameBuffer {
    let background = Cell::styled(' ', CellColor::Default, style.background.to_cell_color());
    let palette = Palette::new(style);

    let mut owner: Vec<Option<usize>> = vec![None; usize::from(viewport.cols)];
    for (i, slot) in placement.slots.iter().enumerate().take(glyphs.len()) {
        let start = usize::from(slot.x);
        let end = (start + usize::from(slot.width)).min(owner.len());
        for column in owner.iter_mut().take(end).skip(start) {
            *column = Some(i);
        }
    }

    // Blank row between the glyphs and the date text.
    let date_y = placement.y.saturating_add(placement.height).saturating_add(1);
    let date_row = date_line
        .filter(|_| placement.reserved >= 2 && date_y < viewport.rows)
        .map(|text| text_row(text, viewport.cols, style));

    let pitch_x = u32::from(placement.block_width) + u32::from(placement.pad_x);
    let pitch_y = u32::from(placement.block_height) + u32::from(placement.pad_y);

    FrameBuffer::from_fn(viewport.cols, viewport.rows, |x, y| {
        if y == date_y {
            if let Some(row) = &date_row {
                return row[usize::from(x)];
            }
        }

        let Some(i) = owner[usize::from(x)] else {
            return background;
        };
        let slot = placement.slots[i];
        if !slot.contains(x, y) {
            return background;
        }

        let (lx, ly) = (u32::from(x - slot.x), u32::from(y - slot.y));
        let (within_x, within_y) = (lx % pitch_x, ly % pitch_y);
        if within_x >= u32::from(placement.block_width)
            || within_y >= u32::from(placement.block_height)
        {
            return background;
        }

        let glyph = &glyphs[i];
        let lit = glyph.is_active(narrow(lx / pitch_x), narrow(ly / pitch_y));
        palette.cell(glyph.role(), lit, narrow(within_x))
    })
}

/// Paint `text` centered in `viewport`, truncated to its width.
///
/// Used by the date mode. The text sits on the middle row in the date
/// color; every other cell is background.
///
/// ```
/// use gc_face::compose::compose_text;
/// use gc_face::config::StyleConfig;
/// use gc_term::terminal::Size;
///
/// let frame = compose_text("Tue", &StyleConfig::default(), Size { cols: 7, rows: 3 });
/// assert_eq!(frame.row_text(1), "  Tue  ");
/// assert_eq!(frame.row_text(0), "       ");
/// ```
#[must_use]
pub fn compose_text(text: &str, style: &StyleConfig, viewport: Size) -> FrameBuffer {
    let background = Cell::styled(' ', CellColor::Default, style.background.to_cell_color());
    let row_y = viewport.rows / 2;
    let row = text_row(text, viewport.cols, style);

    FrameBuffer::from_fn(viewport.cols, viewport.rows, |x, y| {
        if y == row_y { row[usize::from(x)] } else { background }
    })
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Offsets inside a slot are bounded by its `u16` extent.
fn narrow(v: u32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

/// Colors and fills resolved once per frame.
struct Palette<'a> {
    active: (CellColor, CellColor, &'a str),
    colon: (CellColor, CellColor, &'a str),
    inactive: (CellColor, CellColor, &'a str),
}

impl<'a> Palette<'a> {
    fn new(style: &'a StyleConfig) -> Self {
        Self {
            active: (
                style.active_fg.to_cell_color(),
                style.active_bg.to_cell_color(),
                &style.fill_active,
            ),
            colon: (
                style.colon_fg.to_cell_color(),
                style.colon_bg.to_cell_color(),
                &style.fill_colon,
            ),
            inactive: (
                style.inactive_fg.to_cell_color(),
                style.inactive_bg.to_cell_color(),
                &style.fill_inactive,
            ),
        }
    }

    /// The cell for one block column, `offset` columns into its block.
    fn cell(&self, role: GlyphRole, lit: bool, offset: u16) -> Cell {
        let (fg, bg, fill) = match (lit, role) {
            (false, _) => self.inactive,
            (true, GlyphRole::Digit) => self.active,
            (true, GlyphRole::Colon) => self.colon,
        };
        Cell::styled(fill_char(fill, offset), fg, bg)
    }
}

/// The fill character for column `offset` of a block. Empty fills and
/// anything not exactly one column wide render as a space.
fn fill_char(fill: &str, offset: u16) -> char {
    let count = fill.chars().count();
    if count == 0 {
        return ' ';
    }
    fill.chars()
        .nth(usize::from(offset) % count)
        .filter(|c| c.width() == Some(1))
        .unwrap_or(' ')
}

/// One viewport-wide row holding `text` centered in the date color.
fn text_row(text: &str, cols: u16, style: &StyleConfig) -> Vec<Cell> {
    let bg = style.background.to_cell_color();
    let mut row = FrameBuffer::filled(cols, 1, Cell::styled(' ', CellColor::Default, bg));
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX).min(cols);
    row.print((cols - width) / 2, 0, text, style.date.to_cell_color(), bg);
    row.cells().to_vec()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
