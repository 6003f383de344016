// SPDX-License-Identifier: MIT
//
// Clock configuration: one owned value passed to every render and command.
//
// Nothing in this crate holds configuration behind a global. The binary owns
// a `ClockConfig`, mutates it between frames (keys, prompt commands, config
// scripts) and hands a shared reference to `render`.

use crate::hsl::{ColorKind, HslColor};
use crate::toggle::{Direction, ToggleState};

// ─── Display Mode ────────────────────────────────────────────────────────────

/// How the time is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Formatted date text, no glyphs.
    Date,
    #[default]
    Digital,
    Binary,
    Icon,
}

impl DisplayMode {
    pub const ALL: [Self; 4] = [Self::Date, Self::Digital, Self::Binary, Self::Icon];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Digital => "digital",
            Self::Binary => "binary",
            Self::Icon => "icon",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

// ─── Sections ────────────────────────────────────────────────────────────────

/// What the face shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceOptions {
    pub mode: DisplayMode,
    pub hour_24: bool,
    pub seconds: bool,
    /// Date line under the glyphs.
    pub show_date: bool,
}

impl Default for FaceOptions {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Digital,
            hour_24: true,
            seconds: true,
            show_date: true,
        }
    }
}

/// Cell geometry of the glyph composition.
///
/// Each glyph cell is a `block_width × block_height` block of terminal cells.
/// `pad_*` separates blocks inside a glyph, `border_*` frames every glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub block_width: u16,
    pub block_height: u16,
    pub pad_x: u16,
    pub pad_y: u16,
    pub border_x: u16,
    pub border_y: u16,
    pub ratio_x: u16,
    pub ratio_y: u16,
    pub auto_size: bool,
    pub auto_ratio: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            block_width: 2,
            block_height: 1,
            pad_x: 0,
            pad_y: 0,
            border_x: 1,
            border_y: 1,
            ratio_x: 2,
            ratio_y: 1,
            auto_size: true,
            auto_ratio: false,
        }
    }
}

/// Colors and fill characters of the face itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    pub active_fg: HslColor,
    pub active_bg: HslColor,
    pub inactive_fg: HslColor,
    pub inactive_bg: HslColor,
    pub colon_fg: HslColor,
    pub colon_bg: HslColor,
    pub date: HslColor,
    pub background: HslColor,
    pub fill_active: String,
    pub fill_inactive: String,
    pub fill_colon: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            active_fg: hex(0x4f, 0xea, 0xe7, ColorKind::Fg),
            active_bg: hex(0x4f, 0xea, 0xe7, ColorKind::Bg),
            inactive_fg: hex(0x26, 0x26, 0x26, ColorKind::Fg),
            inactive_bg: hex(0x26, 0x26, 0x26, ColorKind::Bg),
            colon_fg: hex(0xff, 0x87, 0x2f, ColorKind::Fg),
            colon_bg: hex(0xff, 0x87, 0x2f, ColorKind::Bg),
            date: hex(0x9e, 0x9e, 0x9e, ColorKind::Fg),
            background: hex(0x12, 0x12, 0x12, ColorKind::Bg),
            fill_active: " ".into(),
            fill_inactive: " ".into(),
            fill_colon: " ".into(),
        }
    }
}

/// Colors of the page around the face: status line and prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiStyle {
    pub text: HslColor,
    pub prompt: HslColor,
    pub success: HslColor,
    pub error: HslColor,
    /// Page background, kept in step with [`StyleConfig::background`].
    pub background: HslColor,
}

impl Default for UiStyle {
    fn default() -> Self {
        Self {
            text: hex(0xe0, 0xe0, 0xe0, ColorKind::Fg),
            prompt: hex(0x4f, 0xea, 0xe7, ColorKind::Fg),
            success: hex(0x7f, 0xd9, 0x62, ColorKind::Fg),
            error: hex(0xff, 0x57, 0x57, ColorKind::Fg),
            background: hex(0x12, 0x12, 0x12, ColorKind::Bg),
        }
    }
}

/// Timing of the interactive loop, in milliseconds. All ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rates {
    /// How long the loop waits for input before checking the clock.
    pub input_ms: u64,
    /// Minimum interval between clock redraws.
    pub refresh_ms: u64,
    /// How long a status message stays on screen.
    pub status_ms: u64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            input_ms: 50,
            refresh_ms: 500,
            status_ms: 5000,
        }
    }
}

/// Inputs of the time source. Validated by the commands that set them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSettings {
    /// strftime format of the date text.
    pub datefmt: String,
    /// POSIX locale name, empty for the C locale.
    pub locale: String,
    /// Empty for local time, `UTC`, or a fixed `±HH:MM` offset.
    pub timezone: String,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            datefmt: "%a %b %d %Y".into(),
            locale: String::new(),
            timezone: String::new(),
        }
    }
}

fn hex(r: u8, g: u8, b: u8, kind: ColorKind) -> HslColor {
    HslColor::from_rgb8(r, g, b, kind)
}

// ─── Color Slots ─────────────────────────────────────────────────────────────

/// Every named color in the configuration, as addressed by `style <slot>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    ActiveFg,
    ActiveBg,
    InactiveFg,
    InactiveBg,
    ColonFg,
    ColonBg,
    Date,
    Background,
    Text,
    Prompt,
    Success,
    Error,
}

impl ColorSlot {
    pub const ALL: [Self; 12] = [
        Self::ActiveFg,
        Self::ActiveBg,
        Self::InactiveFg,
        Self::InactiveBg,
        Self::ColonFg,
        Self::ColonBg,
        Self::Date,
        Self::Background,
        Self::Text,
        Self::Prompt,
        Self::Success,
        Self::Error,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ActiveFg => "active-fg",
            Self::ActiveBg => "active-bg",
            Self::InactiveFg => "inactive-fg",
            Self::InactiveBg => "inactive-bg",
            Self::ColonFg => "colon-fg",
            Self::ColonBg => "colon-bg",
            Self::Date => "date",
            Self::Background => "background",
            Self::Text => "text",
            Self::Prompt => "prompt",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Whether the slot paints backgrounds.
    #[must_use]
    pub const fn kind(self) -> ColorKind {
        match self {
            Self::ActiveBg | Self::InactiveBg | Self::ColonBg | Self::Background => ColorKind::Bg,
            _ => ColorKind::Fg,
        }
    }
}

// ─── ClockConfig ─────────────────────────────────────────────────────────────

/// The complete, owned clock configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClockConfig {
    pub face: FaceOptions,
    pub layout: LayoutConfig,
    pub style: StyleConfig,
    pub ui: UiStyle,
    pub rates: Rates,
    pub time: TimeSettings,
    pub toggle: ToggleState,
}

impl ClockConfig {
    /// The color stored in `slot`.
    #[must_use]
    pub const fn color(&self, slot: ColorSlot) -> HslColor {
        match slot {
            ColorSlot::ActiveFg => self.style.active_fg,
            ColorSlot::ActiveBg => self.style.active_bg,
            ColorSlot::InactiveFg => self.style.inactive_fg,
            ColorSlot::InactiveBg => self.style.inactive_bg,
            ColorSlot::ColonFg => self.style.colon_fg,
            ColorSlot::ColonBg => self.style.colon_bg,
            ColorSlot::Date => self.style.date,
            ColorSlot::Background => self.ui.background,
            ColorSlot::Text => self.ui.text,
            ColorSlot::Prompt => self.ui.prompt,
            ColorSlot::Success => self.ui.success,
            ColorSlot::Error => self.ui.error,
        }
    }

    /// Store `color` in `slot`. `background` sets the page and the face
    /// background together.
    pub fn set_color(&mut self, slot: ColorSlot, color: HslColor) {
        let color = color.with_kind(slot.kind());
        match slot {
            ColorSlot::ActiveFg => self.style.active_fg = color,
            ColorSlot::ActiveBg => self.style.active_bg = color,
            ColorSlot::InactiveFg => self.style.inactive_fg = color,
            ColorSlot::InactiveBg => self.style.inactive_bg = color,
            ColorSlot::ColonFg => self.style.colon_fg = color,
            ColorSlot::ColonBg => self.style.colon_bg = color,
            ColorSlot::Date => self.style.date = color,
            ColorSlot::Background => {
                self.ui.background = color;
                self.style.background = color;
            }
            ColorSlot::Text => self.ui.text = color,
            ColorSlot::Prompt => self.ui.prompt = color,
            ColorSlot::Success => self.ui.success = color,
            ColorSlot::Error => self.ui.error = color,
        }
    }

    /// Make `state` the target of subsequent adjustments.
    pub const fn select(&mut self, state: ToggleState) {
        self.toggle = state;
    }

    /// Apply `direction` to the selected state. Returns the status text, or
    /// `None` when the state has no such axis.
    pub fn adjust(&mut self, direction: Direction) -> Option<String> {
        crate::toggle::adjustment(self.toggle, direction).map(|adj| adj.apply(self))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mode_names_round_trip() {
        for mode in DisplayMode::ALL {
            assert_eq!(DisplayMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(DisplayMode::from_name("analog"), None);
    }

    #[test]
    fn defaults_hold_invariants() {
        let cfg = ClockConfig::default();
        assert!(cfg.layout.block_width >= 1 && cfg.layout.block_height >= 1);
        assert!(cfg.layout.ratio_x > 0 && cfg.layout.ratio_y > 0);
        assert_eq!(cfg.toggle, ToggleState::Block);
        assert_eq!(cfg.ui.background, cfg.style.background);
        assert!(cfg.rates.input_ms >= 1 && cfg.rates.status_ms >= 1);
    }

    #[test]
    fn background_slot_sets_both() {
        let mut cfg = ClockConfig::default();
        let blue = HslColor::parse("blue", ColorKind::Fg).unwrap();
        cfg.set_color(ColorSlot::Background, blue);
        assert_eq!(cfg.ui.background, cfg.style.background);
        assert_eq!(cfg.style.background.kind(), ColorKind::Bg);
        assert_eq!(cfg.color(ColorSlot::Background).to_rgb8(), (0, 0, 128));
    }

    #[test]
    fn slot_kind_is_enforced() {
        let mut cfg = ClockConfig::default();
        let red = HslColor::parse("red", ColorKind::Fg).unwrap();
        cfg.set_color(ColorSlot::ColonBg, red);
        assert_eq!(cfg.style.colon_bg.kind(), ColorKind::Bg);
    }

    #[test]
    fn slot_names_are_unique() {
        for (i, a) in ColorSlot::ALL.iter().enumerate() {
            for b in &ColorSlot::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
