// SPDX-License-Identifier: MIT
//
// gc-face: Clock face engine for glyphclock.
//
// Pure functions from (viewport, time snapshot, configuration) to a full
// FrameBuffer. Nothing here touches the terminal or the clock; the binary
// supplies both.
//
//   TimeSnapshot ─→ glyph::encode ─→ layout::layout ─→ compose::compose ─→ FrameBuffer
//
// Configuration lives in one owned `ClockConfig`, mutated through
// `settings::execute`, `ClockConfig::adjust` and `ClockConfig::select`.

pub mod compose;
pub mod config;
pub mod error;
pub mod glyph;
pub mod hsl;
pub mod layout;
pub mod script;
pub mod settings;
pub mod time;
pub mod toggle;

use gc_term::buffer::FrameBuffer;
use gc_term::terminal::Size;

use crate::config::ClockConfig;
use crate::error::RenderError;
use crate::glyph::{Encoded, GlyphMatrix};
use crate::time::TimeSnapshot;

/// Rows kept under the glyphs for the date line: one blank, one text.
pub const DATE_LINE_ROWS: u16 = 2;

/// Render one frame of the clock face.
///
/// Date mode paints centered text. The glyph modes lay out and composite
/// the glyphs, with the date line below them when `face.show_date` is set
/// and it fits.
///
/// # Errors
///
/// Propagates [`RenderError`] from the layout engine. No partial frame is
/// ever returned.
pub fn render(
    viewport: Size,
    snapshot: &TimeSnapshot,
    config: &ClockConfig,
) -> Result<FrameBuffer, RenderError> {
    match glyph::encode(snapshot, &config.face) {
        Encoded::Text(text) => Ok(compose::compose_text(&text, &config.style, viewport)),
        Encoded::Glyphs(glyphs) => {
            let sizes: Vec<_> = glyphs.iter().map(GlyphMatrix::size).collect();
            let reserve = if config.face.show_date { DATE_LINE_ROWS } else { 0 };
            let placement = layout::layout(viewport, &sizes, &config.layout, reserve)?;
            let date = (placement.reserved > 0).then_some(snapshot.date.as_str());
            Ok(compose::compose(
                &glyphs,
                &placement,
                &config.style,
                viewport,
                date,
            ))
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayMode;
    use crate::settings::{Outcome, execute};
    use pretty_assertions::assert_eq;

    fn snapshot() -> TimeSnapshot {
        let mut snap = TimeSnapshot::from_hms(23, 59, 59);
        snap.date = "Sun Dec 31 2023".into();
        snap
    }

    fn size(cols: u16, rows: u16) -> Size {
        Size { cols, rows }
    }

    #[test]
    fn default_face_fills_viewport() {
        let frame = render(size(80, 24), &snapshot(), &ClockConfig::default()).unwrap();
        assert_eq!((frame.width(), frame.height()), (80, 24));
        assert_eq!(frame.total_cells(), 80 * 24);
        assert!((0..24).any(|y| frame.row_text(y).contains("Sun Dec 31 2023")));
    }

    #[test]
    fn every_mode_renders() {
        for mode in DisplayMode::ALL {
            let mut cfg = ClockConfig::default();
            cfg.face.mode = mode;
            let frame = render(size(100, 30), &snapshot(), &cfg).unwrap();
            assert_eq!(frame.total_cells(), 3000, "{mode:?}");
        }
    }

    #[test]
    fn date_mode_shows_text_only() {
        let mut cfg = ClockConfig::default();
        assert_eq!(execute(&mut cfg, "mode date"), Outcome::Nothing);
        let frame = render(size(40, 5), &snapshot(), &cfg).unwrap();
        assert_eq!(frame.row_text(2).trim(), "Sun Dec 31 2023");
    }

    #[test]
    fn hidden_date_is_not_drawn() {
        let mut cfg = ClockConfig::default();
        execute(&mut cfg, "set date off");
        let frame = render(size(80, 24), &snapshot(), &cfg).unwrap();
        assert!((0..24).all(|y| !frame.row_text(y).contains("Sun")));
    }

    #[test]
    fn fixed_layout_overflow_is_reported() {
        let mut cfg = ClockConfig::default();
        execute(&mut cfg, "set auto-size off");
        execute(&mut cfg, "block 9 9");
        assert_eq!(
            render(size(80, 24), &snapshot(), &cfg),
            Err(RenderError::ViewportTooSmall { cols: 80, rows: 24 })
        );
    }

    #[test]
    fn binary_mode_with_huge_padding_renders() {
        let mut cfg = ClockConfig::default();
        execute(&mut cfg, "mode binary");
        assert_eq!(execute(&mut cfg, "padding-x 65535"), Outcome::Nothing);
        let frame = render(size(80, 24), &snapshot(), &cfg).unwrap();
        assert_eq!(frame.total_cells(), 80 * 24);

        execute(&mut cfg, "set auto-size off");
        execute(&mut cfg, "block 1 1");
        let frame = render(size(80, 24), &snapshot(), &cfg).unwrap();
        assert_eq!(frame.total_cells(), 80 * 24);
    }
}
