//! Parse-then-aggregate pipeline producing an immutable [`Dataset`].

use std::io::Read;
use std::time::Instant;

use chrono::NaiveDate;
use energy_core::data_processors::TimestampProcessor;
use energy_core::error::Result;
use energy_core::models::{DailyBucket, EnergyInterval, Grouping, HourlyBucket, Insights};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{AggregateData, EnergyAggregator};
use crate::buckets::{hourly_buckets, weekly_buckets};
use crate::insights::insights;
use crate::reader::{read_intervals, SkippedRow};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside a dataset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadMetadata {
    /// Data rows seen in the source.
    pub rows_read: usize,
    /// Rows dropped by the reader.
    pub skipped_rows: Vec<SkippedRow>,
    /// Numeric fields that fell back to their default.
    pub defaulted_values: usize,
    /// Wall-clock seconds spent parsing.
    pub parse_time_seconds: f64,
    /// Wall-clock seconds spent aggregating.
    pub aggregate_time_seconds: f64,
}

/// One loaded interval file and everything derived from it.
///
/// Built once by [`analyze`]; never updated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    intervals: Vec<EnergyInterval>,
    aggregates: AggregateData,
    metadata: LoadMetadata,
}

impl Dataset {
    /// Build a dataset from already parsed intervals.
    pub fn from_intervals(intervals: Vec<EnergyInterval>) -> Self {
        let aggregates = EnergyAggregator::build_aggregates(&intervals);
        Self {
            intervals,
            aggregates,
            metadata: LoadMetadata::default(),
        }
    }

    /// Intervals in source order.
    pub fn intervals(&self) -> &[EnergyInterval] {
        &self.intervals
    }

    pub fn aggregates(&self) -> &AggregateData {
        &self.aggregates
    }

    pub fn metadata(&self) -> &LoadMetadata {
        &self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Sorted keys for `grouping`.
    pub fn keys(&self, grouping: Grouping) -> &[NaiveDate] {
        match grouping {
            Grouping::Daily => &self.aggregates.daily_keys,
            Grouping::Weekly => &self.aggregates.weekly_keys,
        }
    }

    pub fn hourly_buckets(&self, date: NaiveDate) -> [HourlyBucket; 24] {
        hourly_buckets(&self.intervals, date)
    }

    pub fn weekly_buckets(&self, week_start: NaiveDate) -> [DailyBucket; 7] {
        weekly_buckets(
            week_start,
            &self.aggregates.daily_consumption,
            &self.aggregates.daily_generation,
        )
    }

    pub fn insights(&self, grouping: Grouping, key: NaiveDate) -> Insights {
        insights(grouping, key, &self.aggregates)
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline over CSV text.
///
/// 1. Parse rows into intervals, skipping malformed ones.
/// 2. Build daily and weekly aggregates.
/// 3. Return the [`Dataset`] with load metadata.
///
/// Fails only when the text cannot be read as a table.
pub fn analyze(text: &str, timestamps: &TimestampProcessor) -> Result<Dataset> {
    analyze_reader(text.as_bytes(), timestamps)
}

/// Same as [`analyze`] over raw bytes.
///
/// Rows that are not valid UTF-8 are skipped individually.
pub fn analyze_reader<R: Read>(source: R, timestamps: &TimestampProcessor) -> Result<Dataset> {
    let parse_start = Instant::now();
    let outcome = read_intervals(source, timestamps)?;
    let parse_time = parse_start.elapsed().as_secs_f64();

    let aggregate_start = Instant::now();
    let aggregates = EnergyAggregator::build_aggregates(&outcome.intervals);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    debug!(
        "Analysed {} intervals into {} days / {} weeks ({} rows skipped)",
        outcome.intervals.len(),
        aggregates.daily_keys.len(),
        aggregates.weekly_keys.len(),
        outcome.skipped.len(),
    );

    Ok(Dataset {
        intervals: outcome.intervals,
        aggregates,
        metadata: LoadMetadata {
            rows_read: outcome.rows_read,
            skipped_rows: outcome.skipped,
            defaulted_values: outcome.defaulted_values,
            parse_time_seconds: parse_time,
            aggregate_time_seconds: aggregate_time,
        },
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
