// SPDX-License-Identifier: MIT
//
// Settings: the command language shared by the prompt and config scripts.
//
// Every configurable field has one `Setting` descriptor. A line is tokenized,
// matched against the table by name (`style` and `set` take the following
// word as part of the name), and then either read back in canonical form or
// validated and applied. Validation happens before any field is touched, so
// a rejected command never leaves the configuration half-changed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::{ClockConfig, ColorSlot, DisplayMode};
use crate::error::ConfigError;
use crate::hsl::HslColor;
use crate::time::{parse_locale, parse_zone, validate_format};
use crate::toggle::{Axis, LayoutField, ToggleState};

/// Words that end the session.
pub const QUIT_WORDS: [&str; 5] = ["q", "Q", "quit", "Quit", "exit"];

/// A single-quoted string with backslash escapes, or a run of non-space.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'((?:[^'\\]|\\.)*)'|(\S+)").expect("token pattern is valid"));

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of [`execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Applied, or an empty line.
    Nothing,
    /// A bare name was read back; the canonical command that restores it.
    Reply(String),
    Quit,
    /// Rejected. The configuration is unchanged.
    Failed(ConfigError),
}

// ─── Descriptors ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rate {
    Input,
    Refresh,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    All,
    Active,
    Inactive,
    Colon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Date,
    Seconds,
    Hour24,
    AutoSize,
    AutoRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Rate(Rate),
    Locale,
    Timezone,
    DateFormat,
    Fill(Fill),
    Mode,
    Toggle,
    Pair(LayoutField),
    Component(LayoutField, Axis),
    Color(ColorSlot),
    Flag(Flag),
}

/// One named, readable and writable configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    name: &'static str,
    field: Field,
}

const fn setting(name: &'static str, field: Field) -> Setting {
    Setting { name, field }
}

/// Every command the interpreter knows.
pub static SETTINGS: &[Setting] = &[
    setting("rate-input", Field::Rate(Rate::Input)),
    setting("rate-refresh", Field::Rate(Rate::Refresh)),
    setting("rate-status", Field::Rate(Rate::Status)),
    setting("locale", Field::Locale),
    setting("timezone", Field::Timezone),
    setting("date", Field::DateFormat),
    setting("fill", Field::Fill(Fill::All)),
    setting("fill-active", Field::Fill(Fill::Active)),
    setting("fill-inactive", Field::Fill(Fill::Inactive)),
    setting("fill-colon", Field::Fill(Fill::Colon)),
    setting("mode", Field::Mode),
    setting("toggle", Field::Toggle),
    setting("block", Field::Pair(LayoutField::Block)),
    setting("block-x", Field::Component(LayoutField::Block, Axis::X)),
    setting("block-y", Field::Component(LayoutField::Block, Axis::Y)),
    setting("padding", Field::Pair(LayoutField::Padding)),
    setting("padding-x", Field::Component(LayoutField::Padding, Axis::X)),
    setting("padding-y", Field::Component(LayoutField::Padding, Axis::Y)),
    setting("margin", Field::Pair(LayoutField::Margin)),
    setting("margin-x", Field::Component(LayoutField::Margin, Axis::X)),
    setting("margin-y", Field::Component(LayoutField::Margin, Axis::Y)),
    setting("ratio", Field::Pair(LayoutField::Ratio)),
    setting("ratio-x", Field::Component(LayoutField::Ratio, Axis::X)),
    setting("ratio-y", Field::Component(LayoutField::Ratio, Axis::Y)),
    setting("style active-fg", Field::Color(ColorSlot::ActiveFg)),
    setting("style active-bg", Field::Color(ColorSlot::ActiveBg)),
    setting("style inactive-fg", Field::Color(ColorSlot::InactiveFg)),
    setting("style inactive-bg", Field::Color(ColorSlot::InactiveBg)),
    setting("style colon-fg", Field::Color(ColorSlot::ColonFg)),
    setting("style colon-bg", Field::Color(ColorSlot::ColonBg)),
    setting("style date", Field::Color(ColorSlot::Date)),
    setting("style text", Field::Color(ColorSlot::Text)),
    setting("style background", Field::Color(ColorSlot::Background)),
    setting("style prompt", Field::Color(ColorSlot::Prompt)),
    setting("style success", Field::Color(ColorSlot::Success)),
    setting("style error", Field::Color(ColorSlot::Error)),
    setting("set date", Field::Flag(Flag::Date)),
    setting("set seconds", Field::Flag(Flag::Seconds)),
    setting("set hour-24", Field::Flag(Flag::Hour24)),
    setting("set auto-size", Field::Flag(Flag::AutoSize)),
    setting("set auto-ratio", Field::Flag(Flag::AutoRatio)),
];

/// Find a setting by its full name (`block-x`, `style date`, `set seconds`).
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Setting> {
    SETTINGS.iter().find(|s| s.name == name)
}

impl Setting {
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of values the setter takes.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self.field {
            Field::Pair(_) => 2,
            _ => 1,
        }
    }

    /// The current value, formatted so `"{name} {value}"` sets it again.
    #[must_use]
    pub fn get(&self, cfg: &ClockConfig) -> String {
        match self.field {
            Field::Rate(rate) => rate_value(cfg, rate).to_string(),
            Field::Locale => quote(&cfg.time.locale),
            Field::Timezone => quote(&cfg.time.timezone),
            Field::DateFormat => quote(&cfg.time.datefmt),
            Field::Fill(Fill::All | Fill::Active) => quote(&cfg.style.fill_active),
            Field::Fill(Fill::Inactive) => quote(&cfg.style.fill_inactive),
            Field::Fill(Fill::Colon) => quote(&cfg.style.fill_colon),
            Field::Mode => cfg.face.mode.name().into(),
            Field::Toggle => cfg.toggle.name().into(),
            Field::Pair(field) => {
                let mut layout = cfg.layout;
                let x = *field.component(&mut layout, Axis::X);
                let y = *field.component(&mut layout, Axis::Y);
                format!("{x} {y}")
            }
            Field::Component(field, axis) => {
                let mut layout = cfg.layout;
                field.component(&mut layout, axis).to_string()
            }
            Field::Color(slot) => cfg.color(slot).key(),
            Field::Flag(flag) => on_off(flag_value(cfg, flag)).into(),
        }
    }

    /// Validate `args` and store them.
    ///
    /// # Errors
    ///
    /// Any validation failure; `cfg` is untouched in that case.
    pub fn set(&self, cfg: &mut ClockConfig, args: &[String]) -> Result<(), ConfigError> {
        let first = args
            .first()
            .ok_or_else(|| ConfigError::MissingValue(self.name.into()))?;

        match self.field {
            Field::Rate(rate) => {
                let ms = parse_number::<u64>(self.name, first)?;
                if ms == 0 {
                    return Err(invalid_number(self.name, first));
                }
                match rate {
                    Rate::Input => cfg.rates.input_ms = ms,
                    Rate::Refresh => cfg.rates.refresh_ms = ms,
                    Rate::Status => cfg.rates.status_ms = ms,
                }
            }
            Field::Locale => {
                parse_locale(first)?;
                cfg.time.locale.clone_from(first);
            }
            Field::Timezone => {
                parse_zone(first)?;
                cfg.time.timezone.clone_from(first);
            }
            Field::DateFormat => {
                validate_format(first)?;
                cfg.time.datefmt.clone_from(first);
            }
            Field::Fill(fill) => {
                let style = &mut cfg.style;
                match fill {
                    Fill::All => {
                        style.fill_active.clone_from(first);
                        style.fill_inactive.clone_from(first);
                        style.fill_colon.clone_from(first);
                    }
                    Fill::Active => style.fill_active.clone_from(first),
                    Fill::Inactive => style.fill_inactive.clone_from(first),
                    Fill::Colon => style.fill_colon.clone_from(first),
                }
            }
            Field::Mode => {
                cfg.face.mode = DisplayMode::from_name(first).ok_or_else(|| invalid("mode", first))?;
            }
            Field::Toggle => {
                let state = ToggleState::from_name(first).ok_or_else(|| invalid("toggle", first))?;
                cfg.select(state);
            }
            Field::Pair(field) => {
                let second = args
                    .get(1)
                    .ok_or_else(|| ConfigError::MissingValue(self.name.into()))?;
                let x = layout_value(self.name, field, first)?;
                let y = layout_value(self.name, field, second)?;
                *field.component(&mut cfg.layout, Axis::X) = x;
                *field.component(&mut cfg.layout, Axis::Y) = y;
            }
            Field::Component(field, axis) => {
                *field.component(&mut cfg.layout, axis) = layout_value(self.name, field, first)?;
            }
            Field::Color(slot) => {
                let color = HslColor::parse(first, slot.kind())?;
                cfg.set_color(slot, color);
            }
            Field::Flag(flag) => {
                let value = parse_bool(first).ok_or_else(|| invalid(self.name, first))?;
                match flag {
                    Flag::Date => cfg.face.show_date = value,
                    Flag::Seconds => cfg.face.seconds = value,
                    Flag::Hour24 => cfg.face.hour_24 = value,
                    Flag::AutoSize => cfg.layout.auto_size = value,
                    Flag::AutoRatio => cfg.layout.auto_ratio = value,
                }
            }
        }
        Ok(())
    }
}

const fn rate_value(cfg: &ClockConfig, rate: Rate) -> u64 {
    match rate {
        Rate::Input => cfg.rates.input_ms,
        Rate::Refresh => cfg.rates.refresh_ms,
        Rate::Status => cfg.rates.status_ms,
    }
}

const fn flag_value(cfg: &ClockConfig, flag: Flag) -> bool {
    match flag {
        Flag::Date => cfg.face.show_date,
        Flag::Seconds => cfg.face.seconds,
        Flag::Hour24 => cfg.face.hour_24,
        Flag::AutoSize => cfg.layout.auto_size,
        Flag::AutoRatio => cfg.layout.auto_ratio,
    }
}

// ─── Execute ─────────────────────────────────────────────────────────────────

/// Run one command line against `cfg`.
pub fn execute(cfg: &mut ClockConfig, line: &str) -> Outcome {
    let tokens = tokenize(line);
    let Some(head) = tokens.first() else {
        return Outcome::Nothing;
    };
    if tokens.len() == 1 && QUIT_WORDS.contains(&head.as_str()) {
        return Outcome::Quit;
    }

    let (name, args) = match head.as_str() {
        "style" | "set" if tokens.len() >= 2 => (format!("{head} {}", tokens[1]), &tokens[2..]),
        _ => (head.clone(), &tokens[1..]),
    };
    let unknown = || ConfigError::UnknownCommand(line.trim().into());

    let Some(setting) = lookup(&name) else {
        debug!(command = line, "unknown command");
        return Outcome::Failed(unknown());
    };
    if args.is_empty() {
        return Outcome::Reply(format!("{} {}", setting.name, setting.get(cfg)));
    }
    if args.len() > setting.arity() {
        return Outcome::Failed(unknown());
    }

    match setting.set(cfg, args) {
        Ok(()) => Outcome::Nothing,
        Err(e) => {
            debug!(command = line, error = %e, "command rejected");
            Outcome::Failed(e)
        }
    }
}

/// Split a command line into unquoted, unescaped words.
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    TOKEN
        .captures_iter(line)
        .filter_map(|caps| match (caps.get(1), caps.get(2)) {
            (Some(quoted), _) => Some(unescape(quoted.as_str())),
            (None, Some(bare)) => Some(bare.as_str().to_owned()),
            (None, None) => None,
        })
        .collect()
}

/// Single-quote `value`, escaping what [`tokenize`] would interpret.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ─── Value Parsing ───────────────────────────────────────────────────────────

/// `true|false|t|f|1|0|on|off`.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "t" | "1" | "on" => Some(true),
        "false" | "f" | "0" | "off" => Some(false),
        _ => None,
    }
}

#[must_use]
pub const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid_number(field, value))
}

fn layout_value(name: &str, field: LayoutField, value: &str) -> Result<u16, ConfigError> {
    let n = parse_number::<u16>(name, value)?;
    match field {
        LayoutField::Ratio if n == 0 => Err(ConfigError::RatioDegenerate(name.into())),
        LayoutField::Block if n == 0 => Err(invalid_number(name, value)),
        _ => Ok(n),
    }
}

fn invalid_number(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidNumericField {
        field: field.into(),
        value: value.into(),
    }
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        value: value.into(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
