// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D cell grid that a frame is painted into.
//
// Every character position of the viewport is one cell here. The face
// compositor fills a buffer, and `FrameWriter` turns it into escapes.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row's cells are
//     contiguous, so the writer's left-to-right scan is linear.
//
//   - The size is fixed at construction. A buffer never holds more or
//     fewer cells than `width × height`, and writes outside it are dropped
//     rather than grown into.
//
//   - `from_fn` is the main constructor: the compositor decides each cell
//     exactly once, in row-major order, with no second pass.
//
//   - Wide characters occupy two columns. The first cell holds the
//     character, the second is a continuation cell that the writer skips.
//     `print` creates both and never splits a pair at the right edge.

use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::color::CellColor;

/// A 2D buffer of terminal cells, sized to the viewport.
///
/// Indexing is `y * width + x`. Coordinates are `u16` like terminal
/// positions; accessors return `None` outside the buffer.
///
/// # Examples
///
/// ```
/// use gc_term::buffer::FrameBuffer;
/// use gc_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// assert_eq!(buf.total_cells(), 80 * 24);
///
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).unwrap().character(), Some('X'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with empty cells (space, default colors).
    ///
    /// A zero width or height gives a buffer with no cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Cell::EMPTY)
    }

    /// Create a buffer where every cell is `cell`.
    ///
    /// ```
    /// use gc_term::buffer::FrameBuffer;
    /// use gc_term::cell::Cell;
    ///
    /// let buf = FrameBuffer::filled(3, 2, Cell::new('.'));
    /// assert_eq!(buf.row_text(1), "...");
    /// ```
    #[must_use]
    pub fn filled(width: u16, height: u16, cell: Cell) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![cell; size],
        }
    }

    /// Build a buffer by asking `paint` for the cell at every position.
    ///
    /// Cells are produced in row-major order, each exactly once. `paint`
    /// gets `(x, y)` and may keep state between calls.
    ///
    /// ```
    /// use gc_term::buffer::FrameBuffer;
    /// use gc_term::cell::Cell;
    ///
    /// let buf = FrameBuffer::from_fn(4, 1, |x, _| Cell::new(if x % 2 == 0 { '#' } else { '.' }));
    /// assert_eq!(buf.row_text(0), "#.#.");
    /// ```
    #[must_use]
    pub fn from_fn(width: u16, height: u16, mut paint: impl FnMut(u16, u16) -> Cell) -> Self {
        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));
        for y in 0..height {
            for x in 0..width {
                cells.push(paint(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Buffer width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells (`width × height`).
    ///
    /// Always equals the product: nothing resizes a buffer in place.
    #[inline]
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Whether `(x, y)` is within the buffer.
    ///
    /// The right and bottom edges are exclusive.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Flat index of `(x, y)`. Callers check bounds first.
    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a cell reference, or `None` if out of bounds.
    ///
    /// A continuation cell is returned as is; check
    /// [`Cell::is_continuation`] to tell it from a printed character.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Replace the cell at `(x, y)`. Out-of-bounds writes are ignored.
    ///
    /// No wide-character bookkeeping happens here. Use [`print`](Self::print)
    /// for text.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells[idx] = cell;
        }
    }

    /// The raw cell slice, row-major.
    ///
    /// Its length is [`total_cells`](Self::total_cells).
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// A single row as a slice, `width` cells long. Returns `None` if `y`
    /// is out of bounds.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// Iterate cells with their `(x, y)` coordinates, in row-major order.
    ///
    /// ```
    /// use gc_term::buffer::FrameBuffer;
    ///
    /// let buf = FrameBuffer::new(2, 2);
    /// let coords: Vec<_> = buf.iter().map(|(x, y, _)| (x, y)).collect();
    /// assert_eq!(coords, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let w = usize::from(self.width).max(1);
        self.cells.iter().enumerate().map(move |(i, cell)| {
            // x < width and y < height, both u16.
            ((i % w) as u16, (i / w) as u16, cell)
        })
    }

    /// The characters of row `y` as a string (continuation cells skipped).
    ///
    /// Colors are dropped. Out-of-bounds rows give an empty string. Used by
    /// tests to compare whole rows at once.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|row| row.iter().filter_map(|c| c.character()).collect())
            .unwrap_or_default()
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Fill one row from `x` to the right edge with `cell`.
    ///
    /// Nothing happens when `y` is out of bounds or `x` is past the edge.
    pub fn fill_row(&mut self, y: u16, x: u16, cell: Cell) {
        for col in x..self.width {
            self.set(col, y, cell);
        }
    }

    /// Print `text` at `(x, y)` with the given colors, clipped at the right
    /// edge. Wide characters that would straddle the edge are dropped.
    ///
    /// Zero-width characters are skipped. A wide character writes its
    /// continuation cell in the column after it.
    ///
    /// Returns the column just past the last printed character. An
    /// out-of-bounds `y` prints nothing and returns `x`.
    ///
    /// ```
    /// use gc_term::buffer::FrameBuffer;
    /// use gc_term::color::CellColor;
    ///
    /// let mut buf = FrameBuffer::new(5, 1);
    /// let end = buf.print(1, 0, "ab日", CellColor::Default, CellColor::Default);
    /// assert_eq!(end, 5);
    /// assert_eq!(buf.row_text(0), " ab日");
    /// ```
    pub fn print(&mut self, x: u16, y: u16, text: &str, fg: CellColor, bg: CellColor) -> u16 {
        if y >= self.height {
            return x;
        }
        let mut col = x;
        for ch in text.chars() {
            let w = u16::try_from(ch.width().unwrap_or(0)).unwrap_or(0);
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > self.width {
                break;
            }
            self.set(col, y, Cell::styled(ch, fg, bg));
            if w == 2 {
                self.set(col + 1, y, Cell::continuation(fg, bg));
            }
            col += w;
        }
        col
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
