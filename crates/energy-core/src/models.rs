use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Canonical energy unit every reading is normalised to.
pub const CANONICAL_UNIT: &str = "kWh";

/// Sampling interval assumed when a row carries no usable duration.
pub const DEFAULT_DURATION_SECONDS: u32 = 900;

/// A single meter sample read from an interval-data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyInterval {
    /// Wall-clock time of the sample in the display timezone.
    pub timestamp: NaiveDateTime,
    /// Nominal length of the sampling window in seconds.
    #[serde(default = "default_duration")]
    pub duration_seconds: u32,
    /// Unit of `consumption` / `generation` after normalisation.
    pub unit: String,
    /// Energy drawn from the grid during the window.
    #[serde(default)]
    pub consumption: f64,
    /// Solar energy produced during the window.
    #[serde(default)]
    pub generation: f64,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECONDS
}

impl EnergyInterval {
    /// Consumption minus generation for this sample.
    pub fn net_consumption(&self) -> f64 {
        self.consumption - self.generation
    }

    /// Calendar date the sample falls on.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// How periods are grouped for navigation and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    #[default]
    Daily,
    Weekly,
}

impl Grouping {
    /// Label for the previous-period comparison.
    pub fn previous_label(self) -> &'static str {
        match self {
            Grouping::Daily => "than yesterday",
            Grouping::Weekly => "than last week",
        }
    }

    /// Label for the average comparison.
    pub fn average_label(self) -> &'static str {
        match self {
            Grouping::Daily => "than average this week",
            Grouping::Weekly => "than average this month",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grouping::Daily => "daily",
            Grouping::Weekly => "weekly",
        }
    }
}

impl std::str::FromStr for Grouping {
    type Err = crate::error::EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Grouping::Daily),
            "weekly" | "week" => Ok(Grouping::Weekly),
            other => Err(crate::error::EnergyError::Config(format!(
                "unknown grouping \"{}\"",
                other
            ))),
        }
    }
}

/// Totals for one hour of a day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlyBucket {
    /// Hour of day, `0..=23`.
    pub hour: u32,
    pub consumption: f64,
    pub generation: f64,
    pub net_consumption: f64,
}

/// Totals for one calendar day of a week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub day: NaiveDate,
    pub consumption: f64,
    pub generation: f64,
    pub net_consumption: f64,
}

/// Consumption deltas for the selected period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    /// Difference to the preceding period present in the data; `None`
    /// when the selected period is the earliest one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_vs_previous_period: Option<f64>,
    /// Difference to the average used as a baseline for the grouping.
    pub diff_vs_rolling_average: f64,
}

/// Consumption and generation totals for the selected period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub total_consumption: f64,
    pub total_generation: f64,
    pub net_consumption: f64,
}

impl PeriodSummary {
    pub fn new(total_consumption: f64, total_generation: f64) -> Self {
        Self {
            total_consumption,
            total_generation,
            net_consumption: total_consumption - total_generation,
        }
    }
}

/// Everything an insights panel shows for one selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub grouping: Grouping,
    /// Day key (daily) or Monday week-start key (weekly).
    pub key: NaiveDate,
    pub summary: PeriodSummary,
    pub metrics: ComparisonMetrics,
    /// Present only when `metrics.diff_vs_previous_period` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_label: Option<String>,
    pub average_label: String,
}
