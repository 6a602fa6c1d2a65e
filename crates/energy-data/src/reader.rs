//! CSV interval-data loading.
//!
//! Reads header-delimited meter exports (`datetime`, `duration`, `unit`,
//! `consumption`, `generation`) and converts every usable row into an
//! [`EnergyInterval`] in the canonical unit. Bad rows are reported and
//! skipped; only a source that cannot be read as a table at all fails.

use std::fmt;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use energy_core::data_processors::{TimestampProcessor, UnitNormalizer, ValueExtractor};
use energy_core::error::{EnergyError, Result};
use energy_core::models::EnergyInterval;
use serde::Serialize;
use tracing::warn;

// ── Public types ──────────────────────────────────────────────────────────────

/// Why a row was left out of the parsed sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The `datetime` field is absent or blank.
    MissingDatetime,
    /// The `datetime` field is not a valid calendar date-time.
    InvalidDatetime(String),
    /// The row itself could not be decoded (e.g. invalid UTF-8).
    UnreadableRow(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingDatetime => write!(f, "missing datetime"),
            SkipReason::InvalidDatetime(raw) => write!(f, "invalid datetime \"{}\"", raw),
            SkipReason::UnreadableRow(msg) => write!(f, "unreadable row: {}", msg),
        }
    }
}

/// A row dropped by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the source, header included.
    pub line: u64,
    pub reason: SkipReason,
}

/// Result of reading one source.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Parsed intervals in source order.
    pub intervals: Vec<EnergyInterval>,
    /// Rows that were dropped, in source order.
    pub skipped: Vec<SkippedRow>,
    /// Number of numeric fields that fell back to their default.
    pub defaulted_values: usize,
    /// Data rows seen (excluding the header).
    pub rows_read: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse interval rows from CSV text with naive timestamps kept as-is.
///
/// Shorthand for [`parse_intervals`] with a UTC display timezone.
pub fn parse(text: &str) -> Result<Vec<EnergyInterval>> {
    parse_intervals(text, &TimestampProcessor::default()).map(|outcome| outcome.intervals)
}

/// Parse interval rows from CSV text.
pub fn parse_intervals(text: &str, timestamps: &TimestampProcessor) -> Result<ParseOutcome> {
    read_intervals(text.as_bytes(), timestamps)
}

/// Parse interval rows from any reader.
///
/// Fails with [`EnergyError::SourceRead`] when there is no header row or the
/// underlying reader errors; every other problem is handled per row.
pub fn read_intervals<R: Read>(source: R, timestamps: &TimestampProcessor) -> Result<ParseOutcome> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| EnergyError::SourceRead(format!("cannot read header row: {}", e)))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    if columns.datetime.is_none() {
        warn!("Header has no datetime column; every row will be skipped");
    }

    let mut outcome = ParseOutcome::default();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                if let csv::ErrorKind::Io(io_err) = e.kind() {
                    return Err(EnergyError::SourceRead(format!(
                        "read failed near line {}: {}",
                        line, io_err
                    )));
                }
                outcome.rows_read += 1;
                skip_row(&mut outcome, line, SkipReason::UnreadableRow(e.to_string()));
                continue;
            }
        };

        outcome.rows_read += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        match columns.map_row(&record, timestamps) {
            Ok((interval, defaulted)) => {
                outcome.defaulted_values += defaulted;
                outcome.intervals.push(interval);
            }
            Err(reason) => skip_row(&mut outcome, line, reason),
        }
    }

    Ok(outcome)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn skip_row(outcome: &mut ParseOutcome, line: u64, reason: SkipReason) {
    warn!(line, reason = %reason, "skipping interval row");
    outcome.skipped.push(SkippedRow { line, reason });
}

/// Positions of the recognised columns in the header.
#[derive(Debug, Default)]
struct ColumnIndex {
    datetime: Option<usize>,
    duration: Option<usize>,
    unit: Option<usize>,
    consumption: Option<usize>,
    generation: Option<usize>,
}

impl ColumnIndex {
    /// Match header names case-insensitively; unknown columns are ignored.
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(EnergyError::SourceRead(
                "input has no header row".to_string(),
            ));
        }

        let mut index = ColumnIndex::default();
        for (i, name) in headers.iter().enumerate() {
            let name = name.trim_start_matches('\u{feff}').trim().to_lowercase();
            let slot = match name.as_str() {
                "datetime" => &mut index.datetime,
                "duration" => &mut index.duration,
                "unit" => &mut index.unit,
                "consumption" => &mut index.consumption,
                "generation" => &mut index.generation,
                _ => continue,
            };
            // First occurrence wins for duplicated headers.
            slot.get_or_insert(i);
        }
        Ok(index)
    }

    fn field<'r>(&self, record: &'r StringRecord, column: Option<usize>) -> Option<&'r str> {
        column.and_then(|i| record.get(i))
    }

    /// Map one record to an interval plus the number of defaulted fields.
    fn map_row(
        &self,
        record: &StringRecord,
        timestamps: &TimestampProcessor,
    ) -> std::result::Result<(EnergyInterval, usize), SkipReason> {
        let raw_datetime = self
            .field(record, self.datetime)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SkipReason::MissingDatetime)?;

        let timestamp = timestamps
            .parse(raw_datetime)
            .ok_or_else(|| SkipReason::InvalidDatetime(raw_datetime.to_string()))?;

        let unit = UnitNormalizer::normalize(self.field(record, self.unit));
        let consumption = ValueExtractor::quantity(self.field(record, self.consumption));
        let generation = ValueExtractor::quantity(self.field(record, self.generation));
        let duration = ValueExtractor::duration(self.field(record, self.duration));

        let defaulted = [consumption.defaulted, generation.defaulted, duration.defaulted]
            .into_iter()
            .filter(|d| *d)
            .count();

        Ok((
            EnergyInterval {
                timestamp,
                duration_seconds: duration.value,
                unit: unit.unit,
                consumption: consumption.value / unit.divide_by,
                generation: generation.value / unit.divide_by,
            },
            defaulted,
        ))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use energy_core::time_utils::TimezoneHandler;

    const HEADER: &str = "datetime,duration,unit,consumption,generation";

    fn csv(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    fn outcome(rows: &[&str]) -> ParseOutcome {
        parse_intervals(&csv(rows), &TimestampProcessor::default()).unwrap()
    }

    // ── unit normalisation ────────────────────────────────────────────────────

    #[test]
    fn test_watt_hours_divided_by_thousand() {
        let out = outcome(&[
            "2024-01-01T00:15:00,900,Wh,500,0",
            "2024-01-01T00:45:00,900,Wh,500,0",
        ]);
        assert_eq!(out.intervals.len(), 2);
        for interval in &out.intervals {
            assert!((interval.consumption - 0.5).abs() < 1e-12);
            assert_eq!(interval.generation, 0.0);
            assert_eq!(interval.unit, "kWh");
        }
    }

    #[test]
    fn test_lowercase_wh_and_generation_normalised() {
        let out = outcome(&["2024-01-01T12:00:00,900,wh,250,1750"]);
        let interval = &out.intervals[0];
        assert!((interval.consumption - 0.25).abs() < 1e-12);
        assert!((interval.generation - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_kwh_values_unchanged() {
        let out = outcome(&["2024-01-01T12:00:00,900,kWh,2,3"]);
        assert_eq!(out.intervals[0].consumption, 2.0);
        assert_eq!(out.intervals[0].generation, 3.0);
        assert_eq!(out.intervals[0].unit, "kWh");
    }

    #[test]
    fn test_missing_unit_column_defaults_to_kwh() {
        let text = "datetime,consumption,generation\n2024-01-01T12:00:00,4,1";
        let out = parse_intervals(text, &TimestampProcessor::default()).unwrap();
        let interval = &out.intervals[0];
        assert_eq!(interval.unit, "kWh");
        assert_eq!(interval.consumption, 4.0);
        assert_eq!(interval.duration_seconds, 900);
    }

    // ── row skipping ──────────────────────────────────────────────────────────

    #[test]
    fn test_empty_and_invalid_datetime_rows_dropped() {
        let out = outcome(&[
            ",900,Wh,100,0",
            "not-a-date,900,Wh,100,0",
            "2024-01-01T01:00:00,900,Wh,100,0",
            "   ,900,Wh,100,0",
            "2024-01-01T02:00:00,900,Wh,200,0",
        ]);

        assert_eq!(out.rows_read, 5);
        assert_eq!(out.intervals.len(), 2);
        assert_eq!(out.intervals[0].timestamp.hour(), 1);
        assert_eq!(out.intervals[1].timestamp.hour(), 2);

        assert_eq!(out.skipped.len(), 3);
        assert_eq!(out.skipped[0].reason, SkipReason::MissingDatetime);
        assert_eq!(out.skipped[0].line, 2);
        assert_eq!(
            out.skipped[1].reason,
            SkipReason::InvalidDatetime("not-a-date".to_string())
        );
        assert_eq!(out.skipped[2].reason, SkipReason::MissingDatetime);
    }

    #[test]
    fn test_impossible_calendar_date_dropped() {
        let out = outcome(&["2023-02-29T00:00:00,900,kWh,1,0"]);
        assert!(out.intervals.is_empty());
        assert_eq!(out.skipped.len(), 1);
    }

    #[test]
    fn test_missing_consumption_defaults_to_zero() {
        let out = outcome(&["2024-01-01T03:00:00,900,kWh,,0.4"]);
        assert_eq!(out.intervals.len(), 1);
        assert_eq!(out.intervals[0].consumption, 0.0);
        assert!((out.intervals[0].generation - 0.4).abs() < 1e-12);
        assert_eq!(out.defaulted_values, 1);
    }

    #[test]
    fn test_short_row_reads_missing_fields_as_absent() {
        let out = outcome(&["2024-01-01T03:00:00,600"]);
        let interval = &out.intervals[0];
        assert_eq!(interval.duration_seconds, 600);
        assert_eq!(interval.consumption, 0.0);
        assert_eq!(interval.generation, 0.0);
        assert_eq!(interval.unit, "kWh");
        assert_eq!(out.defaulted_values, 2);
    }

    #[test]
    fn test_non_numeric_values_and_duration_default() {
        let out = outcome(&["2024-01-01T03:00:00,abc,kWh,n/a,-1"]);
        let interval = &out.intervals[0];
        assert_eq!(interval.duration_seconds, 900);
        assert_eq!(interval.consumption, 0.0);
        assert_eq!(interval.generation, 0.0);
        assert_eq!(out.defaulted_values, 3);
    }

    #[test]
    fn test_order_preserved_for_unsorted_input() {
        let out = outcome(&[
            "2024-01-02T00:00:00,900,kWh,1,0",
            "2024-01-01T00:00:00,900,kWh,2,0",
            "2024-01-03T00:00:00,900,kWh,3,0",
        ]);
        let values: Vec<f64> = out.intervals.iter().map(|i| i.consumption).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_no_datetime_column_skips_everything() {
        let text = "time,consumption\n2024-01-01T00:00:00,1\n2024-01-01T01:00:00,2";
        let out = parse_intervals(text, &TimestampProcessor::default()).unwrap();
        assert!(out.intervals.is_empty());
        assert_eq!(out.skipped.len(), 2);
    }

    // ── header handling ───────────────────────────────────────────────────────

    #[test]
    fn test_header_case_whitespace_bom_and_extra_columns() {
        let text = "\u{feff}DateTime , Meter ,CONSUMPTION,Generation,Unit\n\
                    2024-01-01 05:00:00,X1,1000,0,WH";
        let out = parse_intervals(text, &TimestampProcessor::default()).unwrap();
        assert_eq!(out.intervals.len(), 1);
        assert!((out.intervals[0].consumption - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_offset_timestamps_use_display_timezone() {
        let processor = TimestampProcessor::new(TimezoneHandler::new("Europe/Amsterdam"));
        let text = format!("{}\n2024-01-01T22:30:00Z,900,kWh,1,0", HEADER);
        let out = parse_intervals(&text, &processor).unwrap();
        let ts = out.intervals[0].timestamp;
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(ts.hour(), 23);
    }

    // ── source failures ───────────────────────────────────────────────────────

    #[test]
    fn test_empty_input_is_source_error() {
        let err = parse_intervals("", &TimestampProcessor::default()).unwrap_err();
        assert!(matches!(err, EnergyError::SourceRead(_)));
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let out = parse_intervals(HEADER, &TimestampProcessor::default()).unwrap();
        assert!(out.intervals.is_empty());
        assert_eq!(out.rows_read, 0);
    }

    #[test]
    fn test_invalid_utf8_row_skipped() {
        let mut bytes = format!("{}\n", HEADER).into_bytes();
        bytes.extend_from_slice(b"2024-01-01T00:00:00,900,\xff\xfe,1,0\n");
        bytes.extend_from_slice(b"2024-01-01T01:00:00,900,kWh,2,0\n");

        let out = read_intervals(bytes.as_slice(), &TimestampProcessor::default()).unwrap();
        assert_eq!(out.intervals.len(), 1);
        assert_eq!(out.intervals[0].consumption, 2.0);
        assert!(matches!(
            out.skipped[0].reason,
            SkipReason::UnreadableRow(_)
        ));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let text = format!(
            "{}\n\n2024-01-01T00:00:00,900,kWh,1,0\n\n\n2024-01-01T01:00:00,900,kWh,2,0\n",
            HEADER
        );
        let out = parse_intervals(&text, &TimestampProcessor::default()).unwrap();
        assert_eq!(out.intervals.len(), 2);
        assert_eq!(out.rows_read, 2);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_long_row_extra_fields_ignored() {
        let out = outcome(&["2024-01-01T00:00:00,900,Wh,500,250,extra,more"]);
        assert_eq!(out.intervals.len(), 1);
        assert!(out.skipped.is_empty());
        assert!((out.intervals[0].consumption - 0.5).abs() < 1e-12);
        assert!((out.intervals[0].generation - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_blank_header_is_source_error() {
        let err = parse_intervals("   \n", &TimestampProcessor::default()).unwrap_err();
        assert!(matches!(err, EnergyError::SourceRead(_)));
    }

    #[test]
    fn test_parse_shorthand() {
        let intervals = parse(&csv(&["2024-01-01T00:15:00,900,Wh,500,0"])).unwrap();
        assert_eq!(intervals.len(), 1);
    }
}
