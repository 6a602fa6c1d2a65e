//! Daily and weekly totals over a parsed interval sequence.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use energy_core::models::EnergyInterval;
use energy_core::time_utils::{daily_key, weekly_key};
use serde::Serialize;

/// Period key → summed quantity, iterated in chronological order.
pub type TotalsMap = BTreeMap<NaiveDate, f64>;

// ── AggregateData ─────────────────────────────────────────────────────────────

/// Totals for every day and every Monday-aligned week in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateData {
    pub daily_consumption: TotalsMap,
    pub daily_generation: TotalsMap,
    pub weekly_consumption: TotalsMap,
    pub weekly_generation: TotalsMap,
    /// Distinct day keys, ascending.
    pub daily_keys: Vec<NaiveDate>,
    /// Distinct week-start keys, ascending.
    pub weekly_keys: Vec<NaiveDate>,
}

impl AggregateData {
    /// Accumulate a single interval into all four maps.
    fn add_interval(&mut self, interval: &EnergyInterval) {
        let day = daily_key(&interval.timestamp);
        let week = weekly_key(&interval.timestamp);

        *self.daily_consumption.entry(day).or_default() += interval.consumption;
        *self.daily_generation.entry(day).or_default() += interval.generation;
        *self.weekly_consumption.entry(week).or_default() += interval.consumption;
        *self.weekly_generation.entry(week).or_default() += interval.generation;
    }

    pub fn is_empty(&self) -> bool {
        self.daily_keys.is_empty()
    }

    pub fn day_consumption(&self, day: NaiveDate) -> f64 {
        self.daily_consumption.get(&day).copied().unwrap_or(0.0)
    }

    pub fn day_generation(&self, day: NaiveDate) -> f64 {
        self.daily_generation.get(&day).copied().unwrap_or(0.0)
    }

    pub fn week_consumption(&self, week_start: NaiveDate) -> f64 {
        self.weekly_consumption.get(&week_start).copied().unwrap_or(0.0)
    }

    pub fn week_generation(&self, week_start: NaiveDate) -> f64 {
        self.weekly_generation.get(&week_start).copied().unwrap_or(0.0)
    }
}

// ── EnergyAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups intervals by calendar period.
pub struct EnergyAggregator;

impl EnergyAggregator {
    /// Build every aggregate map and key list in a single pass.
    ///
    /// The result does not depend on the order of `intervals` beyond
    /// floating-point rounding.
    pub fn build_aggregates(intervals: &[EnergyInterval]) -> AggregateData {
        let mut data = AggregateData::default();
        for interval in intervals {
            data.add_interval(interval);
        }

        // BTreeMap keys are already sorted ascending.
        data.daily_keys = data.daily_consumption.keys().copied().collect();
        data.weekly_keys = data.weekly_consumption.keys().copied().collect();
        data
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
