// SPDX-License-Identifier: MIT
//
// Toggle selector: which part of the configuration the direction keys move.
//
// Dispatch is a two-level lookup: the selected state picks a target (a layout
// pair or a color slot), the direction picks an axis and a signed step. The
// result is an `Adjustment` value that knows how to apply itself and what to
// report on the status line.

use crate::config::{ClockConfig, ColorSlot, LayoutConfig};

/// Hue step in degrees for one key press. Saturation and luminance use the
/// same step in percent.
pub const COLOR_STEP: f64 = 0.5;

// ─── ToggleState ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToggleState {
    #[default]
    Block,
    Padding,
    Margin,
    Ratio,
    ActiveFg,
    ActiveBg,
    InactiveFg,
    InactiveBg,
    ColonFg,
    ColonBg,
    Date,
    Background,
}

impl ToggleState {
    pub const ALL: [Self; 12] = [
        Self::Block,
        Self::Padding,
        Self::Margin,
        Self::Ratio,
        Self::ActiveFg,
        Self::ActiveBg,
        Self::InactiveFg,
        Self::InactiveBg,
        Self::ColonFg,
        Self::ColonBg,
        Self::Date,
        Self::Background,
    ];

    /// Command spelling: `active-fg`, `colon-bg`, ...
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self.target() {
            Target::Layout(field) => field.name(),
            Target::Color(slot) => slot.name(),
        }
    }

    /// Accepts both `-` and `_` as the word separator.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.replace('_', "-");
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    const fn target(self) -> Target {
        match self {
            Self::Block => Target::Layout(LayoutField::Block),
            Self::Padding => Target::Layout(LayoutField::Padding),
            Self::Margin => Target::Layout(LayoutField::Margin),
            Self::Ratio => Target::Layout(LayoutField::Ratio),
            Self::ActiveFg => Target::Color(ColorSlot::ActiveFg),
            Self::ActiveBg => Target::Color(ColorSlot::ActiveBg),
            Self::InactiveFg => Target::Color(ColorSlot::InactiveFg),
            Self::InactiveBg => Target::Color(ColorSlot::InactiveBg),
            Self::ColonFg => Target::Color(ColorSlot::ColonFg),
            Self::ColonBg => Target::Color(ColorSlot::ColonBg),
            Self::Date => Target::Color(ColorSlot::Date),
            Self::Background => Target::Color(ColorSlot::Background),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Layout(LayoutField),
    Color(ColorSlot),
}

// ─── Directions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    DecX,
    IncX,
    DecY,
    IncY,
    DecLum,
    IncLum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    const fn suffix(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

/// A pair of `u16` layout values moved together by one toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutField {
    Block,
    Padding,
    Margin,
    Ratio,
}

impl LayoutField {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Padding => "padding",
            Self::Margin => "margin",
            Self::Ratio => "ratio",
        }
    }

    /// Smallest value a decrement may reach.
    #[must_use]
    pub const fn floor(self) -> u16 {
        match self {
            Self::Block | Self::Ratio => 1,
            Self::Padding | Self::Margin => 0,
        }
    }

    /// The component of `layout` addressed by this field and `axis`.
    pub fn component(self, layout: &mut LayoutConfig, axis: Axis) -> &mut u16 {
        match (self, axis) {
            (Self::Block, Axis::X) => &mut layout.block_width,
            (Self::Block, Axis::Y) => &mut layout.block_height,
            (Self::Padding, Axis::X) => &mut layout.pad_x,
            (Self::Padding, Axis::Y) => &mut layout.pad_y,
            (Self::Margin, Axis::X) => &mut layout.border_x,
            (Self::Margin, Axis::Y) => &mut layout.border_y,
            (Self::Ratio, Axis::X) => &mut layout.ratio_x,
            (Self::Ratio, Axis::Y) => &mut layout.ratio_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Hue,
    Sat,
    Lum,
}

impl Channel {
    const fn name(self) -> &'static str {
        match self {
            Self::Hue => "hue",
            Self::Sat => "sat",
            Self::Lum => "lum",
        }
    }
}

// ─── Adjustment ──────────────────────────────────────────────────────────────

/// One resolved key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    Layout {
        field: LayoutField,
        axis: Axis,
        increase: bool,
    },
    Color {
        slot: ColorSlot,
        channel: Channel,
        delta: f64,
    },
}

/// Resolve `direction` against the selected state. Luminance on a layout
/// state has no meaning and yields `None`.
#[must_use]
pub const fn adjustment(state: ToggleState, direction: Direction) -> Option<Adjustment> {
    match state.target() {
        Target::Layout(field) => {
            let (axis, increase) = match direction {
                Direction::DecX => (Axis::X, false),
                Direction::IncX => (Axis::X, true),
                Direction::DecY => (Axis::Y, false),
                Direction::IncY => (Axis::Y, true),
                Direction::DecLum | Direction::IncLum => return None,
            };
            Some(Adjustment::Layout {
                field,
                axis,
                increase,
            })
        }
        Target::Color(slot) => {
            let (channel, delta) = match direction {
                Direction::DecX => (Channel::Hue, -COLOR_STEP),
                Direction::IncX => (Channel::Hue, COLOR_STEP),
                Direction::DecY => (Channel::Sat, -COLOR_STEP),
                Direction::IncY => (Channel::Sat, COLOR_STEP),
                Direction::DecLum => (Channel::Lum, -COLOR_STEP),
                Direction::IncLum => (Channel::Lum, COLOR_STEP),
            };
            Some(Adjustment::Color {
                slot,
                channel,
                delta,
            })
        }
    }
}

impl Adjustment {
    /// Mutate `config` and return the status text.
    pub fn apply(self, config: &mut ClockConfig) -> String {
        match self {
            Self::Layout {
                field,
                axis,
                increase,
            } => {
                let value = field.component(&mut config.layout, axis);
                *value = if increase {
                    value.saturating_add(1)
                } else {
                    value.saturating_sub(1).max(field.floor())
                };
                format!("{}-{} {}", field.name(), axis.suffix(), value)
            }
            Self::Color {
                slot,
                channel,
                delta,
            } => {
                let mut color = config.color(slot);
                match channel {
                    Channel::Hue => color.step_hue(delta),
                    Channel::Sat => color.step_sat(delta),
                    Channel::Lum => color.step_lum(delta),
                }
                config.set_color(slot, color);
                let value = match channel {
                    Channel::Hue => color.hue(),
                    Channel::Sat => color.sat(),
                    Channel::Lum => color.lum(),
                };
                format!("{} {value}", channel.name())
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hsl::{ColorKind, HslColor};
    use pretty_assertions::assert_eq;

    fn press(cfg: &mut ClockConfig, dir: Direction) -> Option<String> {
        cfg.adjust(dir)
    }

    #[test]
    fn names_accept_both_separators() {
        assert_eq!(ToggleState::from_name("active-fg"), Some(ToggleState::ActiveFg));
        assert_eq!(ToggleState::from_name("colon_bg"), Some(ToggleState::ColonBg));
        assert_eq!(ToggleState::from_name("margin"), Some(ToggleState::Margin));
        assert_eq!(ToggleState::from_name("border"), None);
        for state in ToggleState::ALL {
            assert_eq!(ToggleState::from_name(state.name()), Some(state));
        }
    }

    #[test]
    fn block_adjusts_and_floors_at_one() {
        let mut cfg = ClockConfig::default();
        cfg.layout.block_width = 2;
        assert_eq!(press(&mut cfg, Direction::IncX).as_deref(), Some("block-x 3"));
        assert_eq!(press(&mut cfg, Direction::DecX).as_deref(), Some("block-x 2"));
        assert_eq!(press(&mut cfg, Direction::DecX).as_deref(), Some("block-x 1"));
        assert_eq!(press(&mut cfg, Direction::DecX).as_deref(), Some("block-x 1"));
        assert_eq!(cfg.layout.block_width, 1);
    }

    #[test]
    fn padding_floors_at_zero() {
        let mut cfg = ClockConfig::default();
        cfg.select(ToggleState::Padding);
        cfg.layout.pad_y = 0;
        assert_eq!(press(&mut cfg, Direction::DecY).as_deref(), Some("padding-y 0"));
        assert_eq!(press(&mut cfg, Direction::IncY).as_deref(), Some("padding-y 1"));
    }

    #[test]
    fn margin_moves_border() {
        let mut cfg = ClockConfig::default();
        cfg.select(ToggleState::Margin);
        let before = cfg.layout.border_x;
        assert_eq!(
            press(&mut cfg, Direction::IncX),
            Some(format!("margin-x {}", before + 1))
        );
        assert_eq!(cfg.layout.border_x, before + 1);
    }

    #[test]
    fn ratio_never_reaches_zero() {
        let mut cfg = ClockConfig::default();
        cfg.select(ToggleState::Ratio);
        for _ in 0..5 {
            press(&mut cfg, Direction::DecY);
        }
        assert_eq!(cfg.layout.ratio_y, 1);
    }

    #[test]
    fn increments_saturate() {
        let mut cfg = ClockConfig::default();
        cfg.layout.block_height = u16::MAX;
        assert_eq!(
            press(&mut cfg, Direction::IncY),
            Some(format!("block-y {}", u16::MAX))
        );
    }

    #[test]
    fn lum_on_layout_state_is_noop() {
        let mut cfg = ClockConfig::default();
        let before = cfg.clone();
        assert_eq!(press(&mut cfg, Direction::IncLum), None);
        assert_eq!(cfg, before);
    }

    #[test]
    fn color_hue_steps_are_reversible() {
        let mut cfg = ClockConfig::default();
        cfg.select(ToggleState::ActiveFg);
        let start = cfg.style.active_fg.hue();
        for _ in 0..7 {
            press(&mut cfg, Direction::IncX);
        }
        for _ in 0..7 {
            press(&mut cfg, Direction::DecX);
        }
        assert!((cfg.style.active_fg.hue() - start).abs() < 1e-9);
    }

    #[test]
    fn color_status_reports_channel() {
        let mut cfg = ClockConfig::default();
        cfg.select(ToggleState::Date);
        cfg.set_color(ColorSlot::Date, HslColor::new(120.0, 50.0, 50.0, ColorKind::Fg));
        assert_eq!(press(&mut cfg, Direction::IncX).as_deref(), Some("hue 120.5"));
        assert_eq!(press(&mut cfg, Direction::DecY).as_deref(), Some("sat 49.5"));
        assert_eq!(press(&mut cfg, Direction::IncLum).as_deref(), Some("lum 50.5"));
    }

    #[test]
    fn lum_clamps() {
        let mut cfg = ClockConfig::default();
        cfg.select(ToggleState::ColonBg);
        cfg.set_color(ColorSlot::ColonBg, HslColor::new(10.0, 50.0, 100.0, ColorKind::Bg));
        assert_eq!(press(&mut cfg, Direction::IncLum).as_deref(), Some("lum 100"));
    }

    #[test]
    fn background_mirrors_onto_page() {
        let mut cfg = ClockConfig::default();
        cfg.select(ToggleState::Background);
        press(&mut cfg, Direction::IncX);
        press(&mut cfg, Direction::DecLum);
        assert_eq!(cfg.ui.background, cfg.style.background);
    }

    #[test]
    fn every_state_answers_planar_directions() {
        for state in ToggleState::ALL {
            for dir in [Direction::DecX, Direction::IncX, Direction::DecY, Direction::IncY] {
                assert!(adjustment(state, dir).is_some(), "{state:?} {dir:?}");
            }
        }
    }
}
