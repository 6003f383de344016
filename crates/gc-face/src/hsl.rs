// SPDX-License-Identifier: MIT
//
// HSL colors: the value type behind every color slot on the clock face.
//
// Colors are stored as hue (degrees, wrapping in [0, 360)), saturation and
// luminance (percent, clamped to [0, 100]) so the adjustment keys can walk
// around the color wheel in half-degree steps. They are resolved to 24-bit
// RGB only when a frame is painted.
//
// Canonical serialization: `#rrggbb` when that hex string parses back to the
// exact same triple, otherwise `hsl(h,s,l)` using Rust's shortest
// round-trip float formatting. Either way `parse(key(c)) == c`.

use std::fmt;

use gc_term::color::{CellColor, ansi};

use crate::error::ConfigError;

/// Which side of a cell a color paints. Only affects [`HslColor::style_sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorKind {
    #[default]
    Fg,
    Bg,
}

/// A hue/saturation/luminance color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    hue: f64,
    sat: f64,
    lum: f64,
    kind: ColorKind,
}

// ─── Construction ────────────────────────────────────────────────────────────

impl HslColor {
    /// Build a color, wrapping the hue and clamping saturation/luminance.
    /// Non-finite components become 0.
    #[must_use]
    pub fn new(hue: f64, sat: f64, lum: f64, kind: ColorKind) -> Self {
        Self {
            hue: wrap_hue(hue),
            sat: clamp_percent(sat),
            lum: clamp_percent(lum),
            kind,
        }
    }

    /// Build a color from 8-bit RGB components.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8, kind: ColorKind) -> Self {
        let (hue, sat, lum) = rgb_to_hsl(r, g, b);
        Self::new(hue, sat, lum, kind)
    }

    /// Parse a color spec: an ANSI color name (`red`, `bright-blue`, `grey`),
    /// `#rgb`, `#rrggbb` (the `#` is optional) or `hsl(h,s,l)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidColorSpec`] for anything else.
    pub fn parse(spec: &str, kind: ColorKind) -> Result<Self, ConfigError> {
        let trimmed = spec.trim();
        let invalid = || ConfigError::InvalidColorSpec(spec.to_owned());

        if let Some((r, g, b)) = ansi::named(trimmed) {
            return Ok(Self::from_rgb8(r, g, b, kind));
        }
        if let Some(body) = trimmed
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_hsl_triple(body)
                .map(|(h, s, l)| Self::new(h, s, l, kind))
                .ok_or_else(invalid);
        }
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        parse_hex(hex)
            .map(|(r, g, b)| Self::from_rgb8(r, g, b, kind))
            .ok_or_else(invalid)
    }

    /// The same color painting the other side of a cell.
    #[inline]
    #[must_use]
    pub const fn with_kind(self, kind: ColorKind) -> Self {
        Self { kind, ..self }
    }
}

// ─── Accessors ───────────────────────────────────────────────────────────────

impl HslColor {
    #[inline]
    #[must_use]
    pub const fn hue(&self) -> f64 {
        self.hue
    }

    #[inline]
    #[must_use]
    pub const fn sat(&self) -> f64 {
        self.sat
    }

    #[inline]
    #[must_use]
    pub const fn lum(&self) -> f64 {
        self.lum
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ColorKind {
        self.kind
    }
}

// ─── Stepping ────────────────────────────────────────────────────────────────

impl HslColor {
    /// Add `delta` degrees to the hue, wrapping modulo 360.
    pub fn step_hue(&mut self, delta: f64) {
        self.hue = wrap_hue(self.hue + delta);
    }

    /// Add `delta` to the saturation, clamped to `[0, 100]`.
    pub fn step_sat(&mut self, delta: f64) {
        self.sat = clamp_percent(self.sat + delta);
    }

    /// Add `delta` to the luminance, clamped to `[0, 100]`.
    pub fn step_lum(&mut self, delta: f64) {
        self.lum = clamp_percent(self.lum + delta);
    }
}

// ─── Output ──────────────────────────────────────────────────────────────────

impl HslColor {
    /// Resolve to 8-bit RGB.
    #[must_use]
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        hsl_to_rgb(self.hue, self.sat, self.lum)
    }

    #[must_use]
    pub fn to_cell_color(&self) -> CellColor {
        let (r, g, b) = self.to_rgb8();
        CellColor::Rgb(r, g, b)
    }

    /// Canonical string form, accepted by [`HslColor::parse`].
    #[must_use]
    pub fn key(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        if Self::from_rgb8(r, g, b, self.kind) == *self {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("hsl({},{},{})", self.hue, self.sat, self.lum)
        }
    }

    /// The SGR sequence selecting this color as foreground or background.
    #[must_use]
    pub fn style_sequence(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        let plane = match self.kind {
            ColorKind::Fg => 38,
            ColorKind::Bg => 48,
        };
        format!("\x1b[{plane};2;{r};{g};{b}m")
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

fn wrap_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// RGB → (hue degrees, saturation %, luminance %).
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;

    if d == 0.0 {
        return (0.0, 0.0, l * 100.0);
    }

    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    #[allow(clippy::float_cmp)]
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s * 100.0, l * 100.0)
}

/// (hue degrees, saturation %, luminance %) → RGB.
fn hsl_to_rgb(hue: f64, sat: f64, lum: f64) -> (u8, u8, u8) {
    let s = sat / 100.0;
    let l = lum / 100.0;

    if s == 0.0 {
        let v = to_byte(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0f64.mul_add(l, -q);
    let h = hue / 360.0;

    (
        to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_channel(p, q, h)),
        to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        ((q - p) * 6.0).mul_add(t, p)
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        ((q - p) * (2.0 / 3.0 - t)).mul_add(6.0, p)
    } else {
        p
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(channel: f64) -> u8 {
    // Clamped to [0, 255] before the cast.
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some((digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Some((pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

fn parse_hsl_triple(body: &str) -> Option<(f64, f64, f64)> {
    let mut parts = body.split(',').map(|p| p.trim().parse::<f64>().ok());
    let h = parts.next()??;
    let s = parts.next()??;
    let l = parts.next()??;
    if parts.next().is_some() || !(h.is_finite() && s.is_finite() && l.is_finite()) {
        return None;
    }
    Some((h, s, l))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
