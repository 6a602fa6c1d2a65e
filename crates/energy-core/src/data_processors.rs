use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::{CANONICAL_UNIT, DEFAULT_DURATION_SECONDS};
use crate::time_utils::TimezoneHandler;

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses the `datetime` column of interval files into display-time values.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampProcessor {
    timezone: TimezoneHandler,
}

impl TimestampProcessor {
    pub fn new(timezone: TimezoneHandler) -> Self {
        Self { timezone }
    }

    /// Attempt to parse an ISO 8601 style date-time.
    ///
    /// Handles:
    /// * naive forms (`T` or space separator, optional seconds and
    ///   fraction) which are taken as display time unchanged;
    /// * RFC 3339 forms with `Z` or a numeric offset, converted into the
    ///   display timezone;
    /// * a bare date, taken as midnight.
    ///
    /// Returns `None` for empty input or anything that is not a valid
    /// calendar value (e.g. `2024-02-30`).
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(self.timezone.to_display(&dt));
        }

        const NAIVE_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        // Offset forms with a space separator, e.g. "2024-01-01 00:15:00+01:00".
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Some(self.timezone.to_display(&dt));
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }

        None
    }
}

// ── UnitNormalizer ────────────────────────────────────────────────────────────

/// Canonical unit and divisor for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUnit {
    pub unit: String,
    pub divide_by: f64,
}

/// Maps the `unit` column onto the canonical unit.
pub struct UnitNormalizer;

impl UnitNormalizer {
    /// `"Wh"` in any case becomes `"kWh"` with a divisor of 1000. Any
    /// other unit is kept as given with a divisor of 1; a missing or blank
    /// unit reads as `"kWh"`.
    pub fn normalize(raw: Option<&str>) -> NormalizedUnit {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.eq_ignore_ascii_case("wh") {
            return NormalizedUnit {
                unit: CANONICAL_UNIT.to_string(),
                divide_by: 1000.0,
            };
        }
        NormalizedUnit {
            unit: if trimmed.is_empty() {
                CANONICAL_UNIT.to_string()
            } else {
                trimmed.to_string()
            },
            divide_by: 1.0,
        }
    }
}

// ── ValueExtractor ────────────────────────────────────────────────────────────

/// A numeric field after leniency rules were applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedValue<T> {
    pub value: T,
    /// `true` when the raw field was missing or unusable and the default
    /// was substituted.
    pub defaulted: bool,
}

/// Lenient parsing of numeric columns.
pub struct ValueExtractor;

impl ValueExtractor {
    /// Parse an energy quantity.
    ///
    /// Missing, non-numeric, negative and non-finite values read as `0`.
    /// Decimal input such as `"500.7"` is kept as-is rather than truncated.
    pub fn quantity(raw: Option<&str>) -> ExtractedValue<f64> {
        let parsed = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0);

        match parsed {
            Some(value) => ExtractedValue {
                value,
                defaulted: false,
            },
            None => {
                if let Some(s) = raw.filter(|s| !s.trim().is_empty()) {
                    debug!("ValueExtractor: unusable quantity \"{}\", using 0", s);
                }
                ExtractedValue {
                    value: 0.0,
                    defaulted: true,
                }
            }
        }
    }

    /// Parse the sampling duration in whole seconds.
    ///
    /// Missing or unparsable values read as [`DEFAULT_DURATION_SECONDS`].
    pub fn duration(raw: Option<&str>) -> ExtractedValue<u32> {
        match raw.map(str::trim).and_then(|s| s.parse::<u32>().ok()) {
            Some(value) => ExtractedValue {
                value,
                defaulted: false,
            },
            None => ExtractedValue {
                value: DEFAULT_DURATION_SECONDS,
                defaulted: true,
            },
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
