// SPDX-License-Identifier: MIT
//
// Cell colors: the fully resolved color stored in every terminal cell.
//
// The clock's color math (hue wrapping, saturation and luminance clamping)
// lives in gc-face. By the time a color reaches a cell it is either an
// exact 24-bit RGB triple or the terminal's own default, which keeps the
// output writer's state comparison a plain `==`.

use std::fmt;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// A resolved terminal color, ready for ANSI output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,
}

impl CellColor {
    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// The RGB components, or `None` for [`CellColor::Default`].
    #[inline]
    #[must_use]
    pub const fn rgb(self) -> Option<(u8, u8, u8)> {
        match self {
            Self::Rgb(r, g, b) => Some((r, g, b)),
            Self::Default => None,
        }
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── ANSI Palette ────────────────────────────────────────────────────────────

pub mod ansi {
    //! The sixteen named ANSI colors.
    //!
    //! Terminals are free to remap these, so the values below are the
    //! widely-used xterm defaults. Names are what the config language
    //! accepts; `grey` is an alias for `bright-black`.

    /// Named ANSI-16 colors with their xterm RGB values.
    pub const NAMED: [(&str, (u8, u8, u8)); 16] = [
        ("black", (0, 0, 0)),
        ("red", (128, 0, 0)),
        ("green", (0, 128, 0)),
        ("yellow", (128, 128, 0)),
        ("blue", (0, 0, 128)),
        ("magenta", (128, 0, 128)),
        ("cyan", (0, 128, 128)),
        ("white", (192, 192, 192)),
        ("bright-black", (128, 128, 128)),
        ("bright-red", (255, 0, 0)),
        ("bright-green", (0, 255, 0)),
        ("bright-yellow", (255, 255, 0)),
        ("bright-blue", (0, 0, 255)),
        ("bright-magenta", (255, 0, 255)),
        ("bright-cyan", (0, 255, 255)),
        ("bright-white", (255, 255, 255)),
    ];

    /// Look up a named color (case-insensitive).
    #[must_use]
    pub fn named(name: &str) -> Option<(u8, u8, u8)> {
        let name = name.to_ascii_lowercase();
        let name = match name.as_str() {
            "grey" | "gray" => "bright-black",
            other => other,
        };
        NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, rgb)| rgb)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
