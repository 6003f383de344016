// SPDX-License-Identifier: MIT
//
// Cell: one character position of the clock's screen.
//
// A face is a grid of cells, each holding a character, two colors and an
// attribute set. A character two columns wide is stored in its first cell;
// the cell to its right becomes a placeholder (`'\0'`) that the writer
// never prints.

use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// SGR text attributes.
    ///
    /// ```
    /// use gc_term::cell::Attr;
    ///
    /// let warn = Attr::BOLD;
    /// assert!(warn.contains(Attr::BOLD));
    /// assert!(!warn.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1
        const BOLD = 0b01;
        /// SGR 2
        const DIM  = 0b10;
    }
}

impl Attr {
    /// SGR parameter for each flag, in emission order.
    pub(crate) const SGR: [(Self, u8); 2] = [(Self::BOLD, 1), (Self::DIM, 2)];
}

// ─── Cell ────────────────────────────────────────────────────────────────────

const PLACEHOLDER: char = '\0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character shown, or `'\0'` right of a wide character.
    pub ch: char,
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Cell {
    /// A space in the terminal's default colors.
    pub const EMPTY: Self = Self::styled(' ', CellColor::Default, CellColor::Default);

    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self::styled(ch, CellColor::Default, CellColor::Default)
    }

    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor) -> Self {
        Self {
            ch,
            fg,
            bg,
            attrs: Attr::empty(),
        }
    }

    /// The cell covered by the right half of a wide character.
    #[inline]
    #[must_use]
    pub const fn continuation(fg: CellColor, bg: CellColor) -> Self {
        Self::styled(PLACEHOLDER, fg, bg)
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == PLACEHOLDER
    }

    /// The printable character, `None` for a continuation cell.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.is_continuation() { None } else { Some(self.ch) }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_blank() {
        assert_eq!(Cell::default(), Cell::EMPTY);
        assert_eq!(Cell::EMPTY.character(), Some(' '));
        assert!(Cell::EMPTY.bg.is_default());
    }

    #[test]
    fn continuation_prints_nothing() {
        let cell = Cell::continuation(CellColor::Default, CellColor::Rgb(0, 0, 0));
        assert!(cell.is_continuation());
        assert_eq!(cell.character(), None);
        assert!(!Cell::new('日').is_continuation());
    }

    #[test]
    fn attrs_are_carried() {
        let cell = Cell::styled('>', CellColor::Rgb(255, 0, 0), CellColor::Default).with_attrs(Attr::BOLD);
        assert_eq!(cell.fg, CellColor::Rgb(255, 0, 0));
        assert_eq!(cell.attrs, Attr::BOLD);
    }

    #[test]
    fn sgr_table_covers_every_flag() {
        let all = Attr::SGR.iter().fold(Attr::empty(), |acc, (flag, _)| acc | *flag);
        assert_eq!(all, Attr::all());
    }
}
