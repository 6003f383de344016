// SPDX-License-Identifier: MIT
//
// Time source: turns "now" into the immutable snapshot a frame is drawn from.
//
// The zone, locale and date format come from `TimeSettings`. Each is
// validated when it is set, so building a `TimeSource` from a live
// configuration does not fail in practice.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, Datelike, FixedOffset, Local, Locale, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::config::TimeSettings;
use crate::error::ConfigError;

// ─── TimeSnapshot ────────────────────────────────────────────────────────────

/// One instant, broken down for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSnapshot {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
    /// Date text in the configured format and locale.
    pub date: String,
}

impl TimeSnapshot {
    /// A snapshot at `hour:minute:second` on 1970-01-01 with empty date text.
    #[must_use]
    pub const fn from_hms(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            year: 1970,
            month: 1,
            day: 1,
            weekday: Weekday::Thu,
            date: String::new(),
        }
    }
}

// ─── Zone ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Local,
    Utc,
    Fixed(FixedOffset),
    /// An IANA zone such as `America/New_York`, with its DST rules.
    Named(Tz),
}

/// Parse a timezone setting: empty for local time, `UTC`/`Z`, a fixed
/// offset written `±HH:MM`, `±HHMM` or `±HH`, or an IANA zone name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for anything else.
pub fn parse_zone(spec: &str) -> Result<Zone, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        field: "timezone".into(),
        value: spec.into(),
    };

    let spec_trimmed = spec.trim();
    if spec_trimmed.is_empty() {
        return Ok(Zone::Local);
    }
    if spec_trimmed.eq_ignore_ascii_case("utc") || spec_trimmed == "Z" {
        return Ok(Zone::Utc);
    }

    let (sign, rest) = match spec_trimmed.as_bytes()[0] {
        b'+' => (1, &spec_trimmed[1..]),
        b'-' => (-1, &spec_trimmed[1..]),
        _ => return spec_trimmed.parse::<Tz>().map(Zone::Named).map_err(|_| invalid()),
    };
    if !rest.is_ascii() {
        return Err(invalid());
    }
    let (hh, mm) = match rest.len() {
        2 => (rest, "00"),
        4 => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return Err(invalid()),
    };
    if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = hh.parse().map_err(|_| invalid())?;
    let minutes: i32 = mm.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .map(Zone::Fixed)
        .ok_or_else(invalid)
}

// ─── Locale ──────────────────────────────────────────────────────────────────

/// Parse a POSIX locale name such as `fr_FR` or `de_DE.UTF-8`. Empty means
/// the default (C) locale.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for names chrono does not know.
pub fn parse_locale(name: &str) -> Result<Option<Locale>, ConfigError> {
    let base = name.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return Ok(None);
    }
    Locale::try_from(base)
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            field: "locale".into(),
            value: name.into(),
        })
}

// ─── Format ──────────────────────────────────────────────────────────────────

/// Reject strftime strings chrono cannot format.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the `date` field.
pub fn validate_format(fmt: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidValue {
            field: "date".into(),
            value: fmt.into(),
        });
    }
    Ok(())
}

// ─── TimeSource ──────────────────────────────────────────────────────────────

/// Produces [`TimeSnapshot`]s for one set of time settings.
#[derive(Debug, Clone)]
pub struct TimeSource {
    zone: Zone,
    locale: Option<Locale>,
    datefmt: String,
}

impl TimeSource {
    #[must_use]
    pub const fn new(zone: Zone, locale: Option<Locale>, datefmt: String) -> Self {
        Self {
            zone,
            locale,
            datefmt,
        }
    }

    /// Build a source from configuration settings.
    ///
    /// # Errors
    ///
    /// Returns the first setting that fails to parse.
    pub fn from_settings(settings: &TimeSettings) -> Result<Self, ConfigError> {
        validate_format(&settings.datefmt)?;
        Ok(Self::new(
            parse_zone(&settings.timezone)?,
            parse_locale(&settings.locale)?,
            settings.datefmt.clone(),
        ))
    }

    #[inline]
    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Capture the current instant.
    #[must_use]
    pub fn snapshot(&self) -> TimeSnapshot {
        self.snapshot_at(Utc::now())
    }

    /// Capture `now` in the configured zone.
    #[must_use]
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> TimeSnapshot {
        match self.zone {
            Zone::Local => self.capture(&now.with_timezone(&Local)),
            Zone::Utc => self.capture(&now),
            Zone::Fixed(offset) => self.capture(&now.with_timezone(&offset)),
            Zone::Named(tz) => self.capture(&now.with_timezone(&tz)),
        }
    }

    fn capture<Tz>(&self, at: &DateTime<Tz>) -> TimeSnapshot
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut date = String::new();
        let written = match self.locale {
            Some(locale) => write!(date, "{}", at.format_localized(&self.datefmt, locale)),
            None => write!(date, "{}", at.format(&self.datefmt)),
        };
        if written.is_err() {
            tracing::warn!(format = %self.datefmt, "date format failed");
            date.clear();
        }

        TimeSnapshot {
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
            year: at.year(),
            month: at.month(),
            day: at.day(),
            weekday: at.weekday(),
            date,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn instant() -> DateTime<Utc> {
        // Tuesday 2024-03-05 21:07:09 UTC
        Utc.with_ymd_and_hms(2024, 3, 5, 21, 7, 9).unwrap()
    }

    #[test]
    fn zone_forms() {
        assert_eq!(parse_zone("").unwrap(), Zone::Local);
        assert_eq!(parse_zone("UTC").unwrap(), Zone::Utc);
        assert_eq!(parse_zone("Z").unwrap(), Zone::Utc);
        assert_eq!(
            parse_zone("+05:30").unwrap(),
            Zone::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!(
            parse_zone("-0800").unwrap(),
            Zone::Fixed(FixedOffset::west_opt(8 * 3600).unwrap())
        );
        assert_eq!(
            parse_zone("+02").unwrap(),
            Zone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap())
        );
    }

    #[test]
    fn named_zone_follows_daylight_saving() {
        let zone = parse_zone("America/New_York").unwrap();
        assert_eq!(zone, Zone::Named(chrono_tz::America::New_York));
        let source = TimeSource::new(zone, None, "%Y-%m-%d %Z".into());

        let summer = source.snapshot_at(Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap());
        assert_eq!(summer.hour, 8);
        assert_eq!(summer.date, "2024-07-01 EDT");

        let winter = source.snapshot_at(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
        assert_eq!(winter.hour, 7);
        assert_eq!(winter.date, "2024-01-15 EST");
    }

    #[test]
    fn zone_rejects_garbage() {
        for bad in ["Mars/Olympus", "+25:00", "+05:61", "+5", "05:00", "+0:530", "+ab:cd"] {
            assert!(parse_zone(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn locale_forms() {
        assert_eq!(parse_locale("").unwrap(), None);
        assert_eq!(parse_locale("C").unwrap(), None);
        assert_eq!(parse_locale("fr_FR").unwrap(), Some(Locale::fr_FR));
        assert_eq!(parse_locale("de_DE.UTF-8").unwrap(), Some(Locale::de_DE));
        assert!(parse_locale("xx_YY").is_err());
    }

    #[test]
    fn format_validation() {
        assert!(validate_format("%a %b %d %Y").is_ok());
        assert!(validate_format("plain text").is_ok());
        assert!(validate_format("%Q").is_err());
    }

    #[test]
    fn snapshot_in_utc() {
        let source = TimeSource::new(Zone::Utc, None, "%Y-%m-%d %a".into());
        let snap = source.snapshot_at(instant());
        assert_eq!((snap.hour, snap.minute, snap.second), (21, 7, 9));
        assert_eq!((snap.year, snap.month, snap.day), (2024, 3, 5));
        assert_eq!(snap.weekday, Weekday::Tue);
        assert_eq!(snap.date, "2024-03-05 Tue");
    }

    #[test]
    fn fixed_offset_crosses_midnight() {
        let zone = parse_zone("+05:00").unwrap();
        let snap = TimeSource::new(zone, None, "%d".into()).snapshot_at(instant());
        assert_eq!((snap.hour, snap.minute), (2, 7));
        assert_eq!(snap.day, 6);
        assert_eq!(snap.date, "06");
    }

    #[test]
    fn localized_date_text() {
        let source = TimeSource::new(Zone::Utc, Some(Locale::fr_FR), "%A".into());
        assert_eq!(source.snapshot_at(instant()).date, "mardi");
    }

    #[test]
    fn from_settings_validates() {
        let mut settings = TimeSettings::default();
        assert!(TimeSource::from_settings(&settings).is_ok());
        settings.timezone = "nowhere".into();
        assert!(TimeSource::from_settings(&settings).is_err());
    }
}
