//! Text helpers for presenting energy quantities.

use chrono::NaiveDate;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use energy_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.prec$}", value.abs(), prec = decimals);
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::new();
    // A value that rounds to zero is never shown as "-0.0".
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Approximate energy total as shown on summary tiles.
///
/// ```
/// use energy_core::formatting::format_kwh;
///
/// assert_eq!(format_kwh(12.345), "~12.3 kWh");
/// ```
pub fn format_kwh(kwh: f64) -> String {
    format!("~{} kWh", format_number(kwh, 1))
}

/// Signed one-decimal delta, always carrying an explicit sign.
///
/// ```
/// use energy_core::formatting::format_diff;
///
/// assert_eq!(format_diff(1.26), "+1.3");
/// assert_eq!(format_diff(-0.5), "-0.5");
/// assert_eq!(format_diff(0.0), "+0.0");
/// assert_eq!(format_diff(-0.04), "+0.0");
/// ```
pub fn format_diff(kwh: f64) -> String {
    let magnitude = format_number(kwh.abs(), 1);
    // The sign follows the rounded value.
    let negative = kwh < 0.0 && magnitude.chars().any(|c| matches!(c, '1'..='9'));
    let sign = if negative { '-' } else { '+' };
    format!("{}{}", sign, magnitude)
}

/// Axis label for an hour of the day.
///
/// `twelve_hour` renders `"12AM"`, `"3PM"`; otherwise `"00:00"`, `"15:00"`.
pub fn format_hour(hour: u32, twelve_hour: bool) -> String {
    if !twelve_hour {
        return format!("{:02}:00", hour);
    }
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let h = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}{}", h, suffix)
}

/// Heading for a single day, e.g. `"Jan 1, 2024"`.
pub fn format_day_heading(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Heading for a week starting at `week_start`, e.g. `"Jan 1 - Jan 7, 2024"`.
pub fn format_week_heading(week_start: NaiveDate) -> String {
    let end = crate::time_utils::shift_days(week_start, 6);
    format!("{} - {}", week_start.format("%b %-d"), format_day_heading(end))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
        assert_eq!(format_number(100.0, 0), "100");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_negative_rounding_to_zero() {
        assert_eq!(format_number(-0.01, 1), "0.0");
    }

    // ── format_kwh / format_diff ─────────────────────────────────────────────

    #[test]
    fn test_format_kwh() {
        assert_eq!(format_kwh(0.0), "~0.0 kWh");
        assert_eq!(format_kwh(1.0), "~1.0 kWh");
        assert_eq!(format_kwh(1_500.04), "~1,500.0 kWh");
    }

    #[test]
    fn test_format_diff_signs() {
        assert_eq!(format_diff(2.0), "+2.0");
        assert_eq!(format_diff(-2.26), "-2.3");
        assert_eq!(format_diff(-0.0), "+0.0");
    }

    #[test]
    fn test_format_diff_rounds_before_sign() {
        assert_eq!(format_diff(-0.04), "+0.0");
        assert_eq!(format_diff(-0.06), "-0.1");
        assert_eq!(format_diff(-1234.56), "-1,234.6");
    }

    // ── format_hour ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_hour_twelve_hour() {
        assert_eq!(format_hour(0, true), "12AM");
        assert_eq!(format_hour(3, true), "3AM");
        assert_eq!(format_hour(12, true), "12PM");
        assert_eq!(format_hour(23, true), "11PM");
    }

    #[test]
    fn test_format_hour_twenty_four_hour() {
        assert_eq!(format_hour(0, false), "00:00");
        assert_eq!(format_hour(15, false), "15:00");
    }

    // ── headings ─────────────────────────────────────────────────────────────

    #[test]
    fn test_format_day_heading() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_day_heading(date), "Jan 1, 2024");
    }

    #[test]
    fn test_format_week_heading() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 29).unwrap();
        assert_eq!(format_week_heading(date), "Jan 29 - Feb 4, 2024");
    }
}
