// SPDX-License-Identifier: MIT
//
// Glyph encoder: time fields to boolean matrices.
//
// Digital and icon faces look digits up in fixed tables, one row per byte
// with bit 0 as the rightmost column. The binary face has no tables: each
// field is a single column of its bits, most significant at the top.

use crate::config::{DisplayMode, FaceOptions};
use crate::layout::GlyphSize;
use crate::time::TimeSnapshot;

// ─── Tables ──────────────────────────────────────────────────────────────────

const DIGITAL_WIDTH: u16 = 3;
const ICON_WIDTH: u16 = 5;
const FACE_HEIGHT: u16 = 5;

#[rustfmt::skip]
const DIGITAL: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b001, 0b001, 0b001, 0b001, 0b001], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

#[rustfmt::skip]
const ICON: [[u8; 5]; 10] = [
    [0b01110, 0b10001, 0b10001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00110, 0b01000, 0b11111], // 2
    [0b11110, 0b00001, 0b01110, 0b00001, 0b11110], // 3
    [0b10010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b11110], // 5
    [0b01110, 0b10000, 0b11110, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b00100], // 7
    [0b01110, 0b10001, 0b01110, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b01111, 0b00001, 0b01110], // 9
];

const COLON: [u8; 5] = [0, 1, 0, 1, 0];

// ─── Types ───────────────────────────────────────────────────────────────────

/// What a glyph stands for. The compositor picks colors and fill by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphRole {
    Digit,
    Colon,
}

/// A fixed grid of active/inactive cells for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMatrix {
    width: u16,
    height: u16,
    cells: Vec<bool>,
    role: GlyphRole,
}

impl GlyphMatrix {
    /// Build from row bitmasks, bit `width - 1` being the leftmost column.
    fn from_rows(width: u16, rows: &[u8], role: GlyphRole) -> Self {
        let mut cells = Vec::with_capacity(usize::from(width) * rows.len());
        for &row in rows {
            for x in (0..width).rev() {
                cells.push((row >> x) & 1 == 1);
            }
        }
        Self {
            width,
            height: u16::try_from(rows.len()).unwrap_or(u16::MAX),
            cells,
            role,
        }
    }

    /// A single column holding `value` in `bits` rows, MSB at the top.
    fn column(value: u32, bits: u16) -> Self {
        let cells = (0..bits).rev().map(|bit| (value >> bit) & 1 == 1).collect();
        Self {
            width: 1,
            height: bits,
            cells,
            role: GlyphRole::Digit,
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn role(&self) -> GlyphRole {
        self.role
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> GlyphSize {
        GlyphSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Whether the cell at `(x, y)` is lit. Out of range is unlit.
    #[must_use]
    pub fn is_active(&self, x: u16, y: u16) -> bool {
        x < self.width
            && y < self.height
            && self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Rows rendered as `#` and `.`, for tests and debugging.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| if self.is_active(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Glyphs(Vec<GlyphMatrix>),
    Text(String),
}

// ─── Encoding ────────────────────────────────────────────────────────────────

/// Number of bits needed to hold every value up to `max`.
#[must_use]
pub const fn bit_width(max: u32) -> u16 {
    // At most 32, so the narrowing is exact.
    #[allow(clippy::cast_possible_truncation)]
    let bits = (u32::BITS - max.leading_zeros()) as u16;
    bits
}

/// The hour as shown: `0..=23`, or `1..=12` in 12-hour mode.
#[must_use]
pub const fn display_hour(hour: u32, hour_24: bool) -> u32 {
    if hour_24 {
        hour
    } else {
        match hour % 12 {
            0 => 12,
            h => h,
        }
    }
}

/// Encode `snapshot` for the face described by `options`.
#[must_use]
pub fn encode(snapshot: &TimeSnapshot, options: &FaceOptions) -> Encoded {
    let hour = display_hour(snapshot.hour, options.hour_24);
    let mut fields = vec![hour, snapshot.minute];
    if options.seconds {
        fields.push(snapshot.second);
    }

    match options.mode {
        DisplayMode::Date => Encoded::Text(snapshot.date.clone()),
        DisplayMode::Digital => Encoded::Glyphs(table_glyphs(&fields, &DIGITAL, DIGITAL_WIDTH)),
        DisplayMode::Icon => Encoded::Glyphs(table_glyphs(&fields, &ICON, ICON_WIDTH)),
        DisplayMode::Binary => {
            let hour_bits = bit_width(if options.hour_24 { 23 } else { 12 });
            let glyphs = fields
                .iter()
                .enumerate()
                .map(|(i, &value)| {
                    let bits = if i == 0 { hour_bits } else { bit_width(59) };
                    GlyphMatrix::column(value, bits)
                })
                .collect();
            Encoded::Glyphs(glyphs)
        }
    }
}

/// Two digits per field, a colon between fields.
fn table_glyphs(fields: &[u32], table: &[[u8; 5]; 10], width: u16) -> Vec<GlyphMatrix> {
    let mut glyphs = Vec::with_capacity(fields.len() * 3);
    for (i, &value) in fields.iter().enumerate() {
        if i > 0 {
            glyphs.push(GlyphMatrix::from_rows(1, &COLON, GlyphRole::Colon));
        }
        for digit in [value / 10 % 10, value % 10] {
            glyphs.push(GlyphMatrix::from_rows(
                width,
                &table[digit as usize],
                GlyphRole::Digit,
            ));
        }
    }
    debug_assert!(glyphs.iter().all(|g| g.height() == FACE_HEIGHT));
    glyphs
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(mode: DisplayMode) -> FaceOptions {
        FaceOptions {
            mode,
            ..FaceOptions::default()
        }
    }

    fn glyphs(encoded: Encoded) -> Vec<GlyphMatrix> {
        match encoded {
            Encoded::Glyphs(g) => g,
            Encoded::Text(t) => panic!("expected glyphs, got text {t:?}"),
        }
    }

    #[test]
    fn digital_full_time() {
        let g = glyphs(encode(
            &TimeSnapshot::from_hms(23, 59, 59),
            &options(DisplayMode::Digital),
        ));
        assert_eq!(g.len(), 8);
        let roles: Vec<_> = g.iter().map(GlyphMatrix::role).collect();
        assert_eq!(
            roles,
            vec![
                GlyphRole::Digit,
                GlyphRole::Digit,
                GlyphRole::Colon,
                GlyphRole::Digit,
                GlyphRole::Digit,
                GlyphRole::Colon,
                GlyphRole::Digit,
                GlyphRole::Digit,
            ]
        );
        assert_eq!(g[0].rows(), ["###", "..#", "###", "#..", "###"]);
        assert_eq!(g[1].rows(), ["###", "..#", "###", "..#", "###"]);
        assert_eq!(g[2].rows(), [".", "#", ".", "#", "."]);
        assert_eq!(g[3].rows(), ["###", "#..", "###", "..#", "###"]);
        assert_eq!(g[4].rows(), ["###", "#.#", "###", "..#", "###"]);
        assert_eq!(g[7], g[4]);
    }

    #[test]
    fn digital_without_seconds() {
        let opts = FaceOptions {
            seconds: false,
            ..options(DisplayMode::Digital)
        };
        let g = glyphs(encode(&TimeSnapshot::from_hms(7, 5, 0), &opts));
        assert_eq!(g.len(), 5);
        assert_eq!(g[0].rows(), ["###", "#.#", "#.#", "#.#", "###"]);
        assert_eq!(g[1].rows(), ["###", "..#", "..#", "..#", "..#"]);
    }

    #[test]
    fn twelve_hour_clock() {
        assert_eq!(display_hour(0, false), 12);
        assert_eq!(display_hour(12, false), 12);
        assert_eq!(display_hour(13, false), 1);
        assert_eq!(display_hour(23, false), 11);
        assert_eq!(display_hour(0, true), 0);
    }

    #[test]
    fn bit_widths() {
        assert_eq!(bit_width(23), 5);
        assert_eq!(bit_width(12), 4);
        assert_eq!(bit_width(59), 6);
        assert_eq!(bit_width(1), 1);
        assert_eq!(bit_width(0), 0);
    }

    #[test]
    fn binary_columns() {
        let g = glyphs(encode(
            &TimeSnapshot::from_hms(13, 42, 7),
            &options(DisplayMode::Binary),
        ));
        let heights: Vec<_> = g.iter().map(GlyphMatrix::height).collect();
        assert_eq!(heights, vec![5, 6, 6]);
        assert!(g.iter().all(|m| m.width() == 1 && m.role() == GlyphRole::Digit));
        assert_eq!(g[0].rows().concat(), "01101".replace('0', ".").replace('1', "#"));
        assert_eq!(g[1].rows().concat(), "101010".replace('0', ".").replace('1', "#"));
        assert_eq!(g[2].rows().concat(), "000111".replace('0', ".").replace('1', "#"));
    }

    #[test]
    fn binary_twelve_hour_uses_four_bits() {
        let opts = FaceOptions {
            hour_24: false,
            seconds: false,
            ..options(DisplayMode::Binary)
        };
        let g = glyphs(encode(&TimeSnapshot::from_hms(0, 0, 0), &opts));
        assert_eq!(g.len(), 2);
        assert_eq!(g[0].height(), 4);
        assert_eq!(g[0].rows().concat(), "##..");
    }

    #[test]
    fn icon_glyphs_are_five_wide() {
        let g = glyphs(encode(
            &TimeSnapshot::from_hms(10, 0, 0),
            &options(DisplayMode::Icon),
        ));
        assert_eq!(g.len(), 8);
        assert_eq!(g[0].size(), GlyphSize { width: 5, height: 5 });
        assert_eq!(g[2].size(), GlyphSize { width: 1, height: 5 });
        assert_eq!(g[0].rows(), ["..#..", ".##..", "..#..", "..#..", ".###."]);
    }

    #[test]
    fn icon_table_differs_from_digital() {
        for d in 0..10 {
            assert_ne!(DIGITAL[d], ICON[d], "digit {d}");
        }
    }

    #[test]
    fn date_mode_is_text() {
        let mut snap = TimeSnapshot::from_hms(1, 2, 3);
        snap.date = "Tue Mar 05 2024".into();
        assert_eq!(
            encode(&snap, &options(DisplayMode::Date)),
            Encoded::Text("Tue Mar 05 2024".into())
        );
    }

    #[test]
    fn out_of_range_is_inactive() {
        let g = GlyphMatrix::from_rows(3, &DIGITAL[8], GlyphRole::Digit);
        assert!(g.is_active(0, 0));
        assert!(!g.is_active(3, 0));
        assert!(!g.is_active(0, 5));
    }
}
