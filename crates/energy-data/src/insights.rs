//! Period totals and comparison metrics for the selected day or week.
//!
//! Everything here is a read-only view over [`AggregateData`].

use chrono::NaiveDate;
use energy_core::models::{ComparisonMetrics, Grouping, Insights, PeriodSummary};
use energy_core::time_utils::{days_of_week, week_start};

use crate::aggregator::{AggregateData, TotalsMap};

/// Deltas of the selected period's consumption.
///
/// * `Daily`: vs. the preceding day present in the data, and vs. the
///   day's week total divided by seven.
/// * `Weekly`: vs. the preceding week present in the data, and vs. the
///   mean of every weekly total in the dataset.
///
/// `diff_vs_previous_period` is `None` when `current_key` is the earliest
/// key for its grouping or is not a key at all.
pub fn comparison_metrics(
    grouping: Grouping,
    current_key: NaiveDate,
    data: &AggregateData,
) -> ComparisonMetrics {
    match grouping {
        Grouping::Daily => {
            let current = data.day_consumption(current_key);
            let previous = preceding_key(&data.daily_keys, current_key)
                .map(|key| data.day_consumption(key));
            let week_average = data.week_consumption(week_start(current_key)) / 7.0;

            ComparisonMetrics {
                diff_vs_previous_period: previous.map(|p| current - p),
                diff_vs_rolling_average: current - week_average,
            }
        }
        Grouping::Weekly => {
            let current = data.week_consumption(current_key);
            let previous = preceding_key(&data.weekly_keys, current_key)
                .map(|key| data.week_consumption(key));

            ComparisonMetrics {
                diff_vs_previous_period: previous.map(|p| current - p),
                diff_vs_rolling_average: current - mean(&data.weekly_consumption),
            }
        }
    }
}

/// Consumption and generation totals for the selected period.
///
/// Weekly totals are summed from the seven daily totals starting at `key`.
pub fn period_summary(grouping: Grouping, key: NaiveDate, data: &AggregateData) -> PeriodSummary {
    match grouping {
        Grouping::Daily => PeriodSummary::new(data.day_consumption(key), data.day_generation(key)),
        Grouping::Weekly => {
            let (consumption, generation) = days_of_week(key).fold((0.0, 0.0), |(c, g), day| {
                (c + data.day_consumption(day), g + data.day_generation(day))
            });
            PeriodSummary::new(consumption, generation)
        }
    }
}

/// Summary, metrics and labels for one selected period.
pub fn insights(grouping: Grouping, key: NaiveDate, data: &AggregateData) -> Insights {
    let metrics = comparison_metrics(grouping, key, data);
    Insights {
        grouping,
        key,
        summary: period_summary(grouping, key, data),
        previous_label: metrics
            .diff_vs_previous_period
            .map(|_| grouping.previous_label().to_string()),
        average_label: grouping.average_label().to_string(),
        metrics,
    }
}

/// Key immediately before `current` in the sorted `keys`, if `current` is
/// present and not the first.
fn preceding_key(keys: &[NaiveDate], current: NaiveDate) -> Option<NaiveDate> {
    match keys.binary_search(&current) {
        Ok(index) if index > 0 => Some(keys[index - 1]),
        _ => None,
    }
}

fn mean(totals: &TotalsMap) -> f64 {
    if totals.is_empty() {
        return 0.0;
    }
    totals.values().sum::<f64>() / totals.len() as f64
}
