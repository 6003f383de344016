// SPDX-License-Identifier: MIT
//
// Layout engine: where each glyph lands and how big its blocks are.
//
// Geometry: a glyph cell is a `block_w × block_h` block of terminal cells.
// `pad_*` separates neighbouring blocks inside one glyph and `border_*` frames
// each glyph on both sides, so adjacent glyphs sit `2 · border_x` apart.
//
//   width  = Σ (2·bx + w·bw + (w − 1)·px)
//   height = 2·by + h_max·bh + (h_max − 1)·py
//
// Shorter glyphs are bottom-aligned. Arithmetic is done in u32 so nothing can
// overflow before the fit check.

use gc_term::terminal::Size;
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::RenderError;

/// Largest relative ratio error an auto-sized candidate may have and still be
/// preferred for its area.
pub const RATIO_TOLERANCE: f64 = 0.25;

// ─── Types ───────────────────────────────────────────────────────────────────

/// Canonical size of one glyph matrix, in glyph cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphSize {
    pub width: u16,
    pub height: u16,
}

/// Interior rectangle of one placed glyph, in viewport cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphSlot {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl GlyphSlot {
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x - self.x) < self.width
            && (y - self.y) < self.height
    }
}

/// Result of [`layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Top-left corner of the composition.
    pub x: u16,
    pub y: u16,
    pub block_width: u16,
    pub block_height: u16,
    pub pad_x: u16,
    pub pad_y: u16,
    pub border_x: u16,
    pub border_y: u16,
    /// Size of the composition, excluding reserved rows.
    pub width: u16,
    pub height: u16,
    /// Rows kept free below the composition. Zero when they did not fit.
    pub reserved: u16,
    pub slots: Vec<GlyphSlot>,
}

// ─── Geometry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    bw: u32,
    bh: u32,
    px: u32,
    py: u32,
    bx: u32,
    by: u32,
}

impl Geometry {
    fn from_config(cfg: &LayoutConfig) -> Self {
        Self {
            bw: u32::from(cfg.block_width.max(1)),
            bh: u32::from(cfg.block_height.max(1)),
            px: u32::from(cfg.pad_x),
            py: u32::from(cfg.pad_y),
            bx: u32::from(cfg.border_x),
            by: u32::from(cfg.border_y),
        }
    }

    /// Extent of a `cells`-long run of blocks along one axis.
    const fn span(cells: u32, block: u32, pad: u32) -> u32 {
        if cells == 0 {
            0
        } else {
            cells * block + (cells - 1) * pad
        }
    }

    fn width(&self, glyphs: &[GlyphSize]) -> u32 {
        glyphs
            .iter()
            .map(|g| 2 * self.bx + Self::span(u32::from(g.width), self.bw, self.px))
            .sum()
    }

    fn interior_height(&self, h_max: u32) -> u32 {
        Self::span(h_max, self.bh, self.py)
    }

    fn height(&self, h_max: u32) -> u32 {
        2 * self.by + self.interior_height(h_max)
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Place `glyphs` in `viewport`.
///
/// `reserve_rows` extra rows are kept below the composition when they fit
/// (for the date line); otherwise the composition gets the whole viewport.
///
/// # Errors
///
/// [`RenderError::RatioDegenerate`] when the effective ratio has a zero
/// component, [`RenderError::ViewportTooSmall`] when nothing fits.
pub fn layout(
    viewport: Size,
    glyphs: &[GlyphSize],
    cfg: &LayoutConfig,
    reserve_rows: u16,
) -> Result<Placement, RenderError> {
    let (rx, ry) = if cfg.auto_ratio {
        (viewport.cols, viewport.rows)
    } else {
        (cfg.ratio_x, cfg.ratio_y)
    };
    if rx == 0 || ry == 0 {
        return Err(RenderError::RatioDegenerate { x: rx, y: ry });
    }

    let too_small = RenderError::ViewportTooSmall {
        cols: viewport.cols,
        rows: viewport.rows,
    };
    let cols = u32::from(viewport.cols);
    let rows = u32::from(viewport.rows);
    let reserve = u32::from(reserve_rows);
    let h_max = glyphs.iter().map(|g| u32::from(g.height)).max().unwrap_or(0);
    let stored = Geometry::from_config(cfg);

    let (geom, reserved) = if cfg.auto_size {
        let ratio = (u32::from(rx), u32::from(ry));
        let search = |geom: Geometry| {
            // Prefer keeping the reserved rows; give them up before giving up
            // on the stored padding.
            auto_size(glyphs, h_max, geom, cols, rows.saturating_sub(reserve), ratio)
                .map(|g| (g, reserve))
                .or_else(|| {
                    (reserve > 0)
                        .then(|| auto_size(glyphs, h_max, geom, cols, rows, ratio))
                        .flatten()
                        .map(|g| (g, 0))
                })
        };
        let compact = Geometry {
            px: 0,
            py: 0,
            bx: 0,
            by: 0,
            ..stored
        };
        search(stored)
            .or_else(|| {
                debug!("no fit with stored padding and margin, retrying without");
                search(compact)
            })
            .ok_or(too_small)?
    } else {
        let width = stored.width(glyphs);
        let height = stored.height(h_max);
        if width > cols || height > rows {
            return Err(too_small);
        }
        let reserved = if height + reserve <= rows { reserve } else { 0 };
        (stored, reserved)
    };

    Ok(place(viewport, glyphs, h_max, geom, reserved))
}

/// Search block sizes for the largest composition within tolerance of the
/// target ratio. When no block height admits one, fall back to the block
/// closest to the ratio, which may lie outside the tolerance.
#[allow(clippy::float_cmp)]
fn auto_size(
    glyphs: &[GlyphSize],
    h_max: u32,
    base: Geometry,
    cols: u32,
    rows: u32,
    (rx, ry): (u32, u32),
) -> Option<Geometry> {
    if glyphs.is_empty() || h_max == 0 {
        return None;
    }

    // width(bw) = fixed + bw · cells
    let cells: u32 = glyphs.iter().map(|g| u32::from(g.width)).sum();
    let fixed = Geometry { bw: 0, ..base }.width(glyphs);
    if cells == 0 || fixed + cells > cols {
        return None;
    }
    let max_bw = (cols - fixed) / cells;

    let mut within: Option<(u64, Geometry)> = None;
    let mut nearest: Option<(f64, u64, Geometry)> = None;

    for bh in 1..=rows {
        let geom = Geometry { bh, ..base };
        let height = geom.height(h_max);
        if height > rows {
            break;
        }
        let with_bw = |bw: u32| {
            let geom = Geometry { bw, ..geom };
            let area = u64::from(geom.width(glyphs)) * u64::from(height);
            (geom, ratio_error(geom.width(glyphs), height, rx, ry), area)
        };

        let target = f64::from(height) * f64::from(rx) / f64::from(ry);

        // Widest block with width ≤ target · (1 + tolerance). Neighbours
        // are checked exactly to absorb rounding in the division.
        let upper = (target * (1.0 + RATIO_TOLERANCE) - f64::from(fixed)) / f64::from(cells);
        let widest = clamp_block(upper, max_bw);
        let qualifying = [(widest + 1).min(max_bw), widest, widest.saturating_sub(1).max(1)]
            .into_iter()
            .map(with_bw)
            .find(|&(_, err, _)| err <= RATIO_TOLERANCE);
        if let Some((geom, _, area)) = qualifying {
            if within.is_none_or(|(best, _)| area >= best) {
                within = Some((area, geom));
            }
        }

        let ideal = (target - f64::from(fixed)) / f64::from(cells);
        let closest = [ideal.floor(), ideal.ceil()]
            .map(|bw| with_bw(clamp_block(bw, max_bw)))
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((geom, err, area)) = closest {
            let closer = nearest.is_none_or(|(best_err, best_area, _)| {
                err < best_err || (err == best_err && area > best_area)
            });
            if closer {
                nearest = Some((err, area, geom));
            }
        }
    }

    within
        .map(|(_, g)| g)
        .or_else(|| nearest.map(|(_, _, g)| g))
}

/// Relative distance of `width:height` from `rx:ry`.
fn ratio_error(width: u32, height: u32, rx: u32, ry: u32) -> f64 {
    let want = f64::from(height) * f64::from(rx);
    let have = f64::from(width) * f64::from(ry);
    (have - want).abs() / want
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_block(bw: f64, max_bw: u32) -> u32 {
    if bw.is_nan() || bw < 1.0 {
        1
    } else {
        (bw.min(f64::from(max_bw)) as u32).max(1)
    }
}

fn place(viewport: Size, glyphs: &[GlyphSize], h_max: u32, geom: Geometry, reserved: u32) -> Placement {
    let narrow = |v: u32| u16::try_from(v).unwrap_or(u16::MAX);

    let width = geom.width(glyphs);
    let height = geom.height(h_max);
    let x = u32::from(viewport.cols).saturating_sub(width) / 2;
    let y = u32::from(viewport.rows).saturating_sub(height + reserved) / 2;

    let interior = geom.interior_height(h_max);
    let mut cursor = x;
    let slots = glyphs
        .iter()
        .map(|g| {
            let w = Geometry::span(u32::from(g.width), geom.bw, geom.px);
            let h = Geometry::span(u32::from(g.height), geom.bh, geom.py);
            let slot = GlyphSlot {
                x: narrow(cursor + geom.bx),
                y: narrow(y + geom.by + (interior - h)),
                width: narrow(w),
                height: narrow(h),
            };
            cursor += 2 * geom.bx + w;
            slot
        })
        .collect();

    Placement {
        x: narrow(x),
        y: narrow(y),
        block_width: narrow(geom.bw),
        block_height: narrow(geom.bh),
        pad_x: narrow(geom.px),
        pad_y: narrow(geom.py),
        border_x: narrow(geom.bx),
        border_y: narrow(geom.by),
        width: narrow(width),
        height: narrow(height),
        reserved: narrow(reserved),
        slots,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
