//! Fixed-size, chart-ready bucket arrays for a single day or week.

use chrono::{NaiveDate, Timelike};
use energy_core::models::{DailyBucket, EnergyInterval, HourlyBucket};
use energy_core::time_utils::days_of_week;

use crate::aggregator::TotalsMap;

/// Hour-of-day totals for `target_date`.
///
/// Always returns 24 buckets, hours `0..=23` in order; hours without data
/// stay at zero. Intervals on other dates are ignored.
pub fn hourly_buckets(intervals: &[EnergyInterval], target_date: NaiveDate) -> [HourlyBucket; 24] {
    let mut buckets: [HourlyBucket; 24] = std::array::from_fn(|hour| HourlyBucket {
        hour: hour as u32,
        ..HourlyBucket::default()
    });

    for interval in intervals.iter().filter(|i| i.date() == target_date) {
        let bucket = &mut buckets[interval.timestamp.hour() as usize];
        bucket.consumption += interval.consumption;
        bucket.generation += interval.generation;
        bucket.net_consumption += interval.net_consumption();
    }

    buckets
}

/// Per-day totals for the seven days starting at `week_start`.
///
/// `week_start` is expected to be a Monday key; the walk simply covers
/// `week_start ..= week_start + 6`. Days missing from the maps read as zero.
pub fn weekly_buckets(
    week_start: NaiveDate,
    daily_consumption: &TotalsMap,
    daily_generation: &TotalsMap,
) -> [DailyBucket; 7] {
    let mut days = days_of_week(week_start);
    std::array::from_fn(|_| {
        // `days_of_week` yields exactly seven dates.
        let day = days.next().unwrap_or(week_start);
        let consumption = daily_consumption.get(&day).copied().unwrap_or(0.0);
        let generation = daily_generation.get(&day).copied().unwrap_or(0.0);
        DailyBucket {
            day,
            consumption,
            generation,
            net_consumption: consumption - generation,
        }
    })
}
