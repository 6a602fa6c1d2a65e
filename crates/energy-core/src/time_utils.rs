//! Calendar keys, navigation and display-timezone handling.
//!
//! Day keys are plain calendar dates; week keys are the Monday that starts
//! the ISO week. Navigation never mutates a date in place: every helper
//! computes a new key from the current one.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Weekday};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{EnergyError, Result};

/// Format used for every period key.
pub const KEY_FORMAT: &str = "%Y-%m-%d";

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Converts offset-bearing timestamps into naive display-time values.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneHandler {
    display_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// If `tz_name` is not recognised, falls back to UTC and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { display_tz: tz }
    }

    /// Strict variant of [`TimezoneHandler::new`].
    pub fn try_new(tz_name: &str) -> Result<Self> {
        tz_name
            .parse::<Tz>()
            .map(|display_tz| Self { display_tz })
            .map_err(|_| EnergyError::InvalidTimezone(tz_name.to_string()))
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// Wall-clock time of `dt` in the display timezone.
    pub fn to_display<O: chrono::TimeZone>(&self, dt: &DateTime<O>) -> NaiveDateTime {
        dt.with_timezone(&self.display_tz).naive_local()
    }

    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }
}

impl Default for TimezoneHandler {
    fn default() -> Self {
        Self { display_tz: Tz::UTC }
    }
}

// ── Period keys ───────────────────────────────────────────────────────────────

/// Daily bucket key: the calendar date of `ts`.
pub fn daily_key(ts: &NaiveDateTime) -> NaiveDate {
    ts.date()
}

/// Weekly bucket key: the Monday starting the week that contains `ts`.
pub fn weekly_key(ts: &NaiveDateTime) -> NaiveDate {
    week_start(ts.date())
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Parse a `yyyy-MM-dd` key.
pub fn parse_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), KEY_FORMAT)
        .map_err(|_| EnergyError::InvalidKey(s.to_string()))
}

/// Render a key as `yyyy-MM-dd`.
pub fn format_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

// ── Navigation ────────────────────────────────────────────────────────────────

/// `key` moved by `days` calendar days (negative moves backwards).
///
/// Saturates at the calendar bounds chrono supports.
pub fn shift_days(key: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        key.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        key.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(key)
}

pub fn next_day(key: NaiveDate) -> NaiveDate {
    shift_days(key, 1)
}

pub fn previous_day(key: NaiveDate) -> NaiveDate {
    shift_days(key, -1)
}

/// Monday of the following week, whatever day `key` is.
pub fn next_week(key: NaiveDate) -> NaiveDate {
    shift_days(week_start(key), 7)
}

/// Monday of the preceding week, whatever day `key` is.
pub fn previous_week(key: NaiveDate) -> NaiveDate {
    shift_days(week_start(key), -7)
}

/// The seven calendar days starting at `week_start`.
pub fn days_of_week(week_start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..7).map(move |offset| shift_days(week_start, offset))
}

// ── 12-hour / 24-hour format detection ───────────────────────────────────────

/// Timezone prefixes whose users conventionally read a 12-hour clock.
const TWELVE_HOUR_ZONES: &[&str] = &[
    "america/",
    "australia/",
    "pacific/auckland",
    "asia/manila",
    "asia/kolkata",
    "asia/calcutta",
    "asia/karachi",
    "asia/dhaka",
    "africa/cairo",
    "asia/riyadh",
];

/// Decide whether to use 12-hour clock display.
///
/// An explicit `"12h"` / `"24h"` wins; otherwise the timezone (or the
/// system timezone) decides.
pub fn detect_time_format(timezone: Option<&str>, explicit: Option<&str>) -> bool {
    if let Some(fmt) = explicit {
        match fmt.to_lowercase().as_str() {
            "12h" => return true,
            "24h" => return false,
            _ => {}
        }
    }

    let tz = timezone
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| get_system_timezone().to_lowercase());

    TWELVE_HOUR_ZONES.iter().any(|prefix| tz.starts_with(prefix))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
