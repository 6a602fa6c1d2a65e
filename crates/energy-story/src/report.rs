//! Plain-text and JSON rendering of the selected period.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use energy_core::formatting::{
    format_day_heading, format_diff, format_hour, format_kwh, format_number, format_week_heading,
};
use energy_core::models::{DailyBucket, Grouping, HourlyBucket, Insights};
use energy_core::palette::Palette;
use energy_data::analysis::Dataset;
use energy_runtime::selection::Selection;
use serde::Serialize;

/// Snapshot of one selected period, ready to print or serialise.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source: PathBuf,
    pub grouping: Grouping,
    pub key: NaiveDate,
    pub has_previous: bool,
    pub has_next: bool,
    /// 24 entries for a daily report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<Vec<HourlyBucket>>,
    /// 7 entries for a weekly report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<Vec<DailyBucket>>,
    pub insights: Insights,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

impl Report {
    /// Build the report for `selection`, or `None` if the dataset has no keys.
    pub fn build(dataset: &Dataset, selection: Selection, source: &Path) -> Option<Self> {
        let key = selection.current_key(dataset)?;
        let (hourly, daily) = match selection.grouping {
            Grouping::Daily => (Some(dataset.hourly_buckets(key).to_vec()), None),
            Grouping::Weekly => (None, Some(dataset.weekly_buckets(key).to_vec())),
        };

        Some(Self {
            source: source.to_path_buf(),
            grouping: selection.grouping,
            key,
            has_previous: selection.has_previous(),
            has_next: selection.has_next(dataset),
            hourly,
            daily,
            insights: dataset.insights(selection.grouping, key),
            rows_read: dataset.metadata().rows_read,
            rows_skipped: dataset.metadata().skipped_rows.len(),
        })
    }

    pub fn heading(&self) -> String {
        match self.grouping {
            Grouping::Daily => format_day_heading(self.key),
            Grouping::Weekly => format_week_heading(self.key),
        }
    }

    /// Human-readable rendering. Trend colours are shown as hex tags.
    pub fn render_text(&self, palette: &Palette, twelve_hour: bool) -> String {
        let summary = &self.insights.summary;
        let mut lines = vec![
            format!("{} ({})", self.heading(), self.grouping.as_str()),
            format!(
                "Consumption {}  Generation {}  Net {}",
                format_kwh(summary.total_consumption),
                format_kwh(summary.total_generation),
                format_kwh(summary.net_consumption),
            ),
            String::new(),
            format!("{:<8} {:>12} {:>12}", "", "Consumption", "Generation"),
        ];

        if let Some(hourly) = &self.hourly {
            lines.extend(hourly.iter().map(|b| {
                bucket_row(&format_hour(b.hour, twelve_hour), b.consumption, b.generation)
            }));
        }
        if let Some(daily) = &self.daily {
            lines.extend(daily.iter().map(|b| {
                bucket_row(&b.day.format("%a %-d").to_string(), b.consumption, b.generation)
            }));
        }

        lines.push(String::new());
        let metrics = &self.insights.metrics;
        if let (Some(diff), Some(label)) = (
            metrics.diff_vs_previous_period,
            self.insights.previous_label.as_deref(),
        ) {
            lines.push(insight_line(diff, label, palette));
        }
        lines.push(insight_line(
            metrics.diff_vs_rolling_average,
            &self.insights.average_label,
            palette,
        ));

        if self.rows_skipped > 0 {
            lines.push(format!(
                "({} of {} rows skipped)",
                self.rows_skipped, self.rows_read
            ));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

fn bucket_row(label: &str, consumption: f64, generation: f64) -> String {
    format!(
        "{:<8} {:>12} {:>12}",
        label,
        format_number(consumption, 2),
        format_number(generation, 2)
    )
}

fn insight_line(diff: f64, label: &str, palette: &Palette) -> String {
    format!(
        "{} kWh {} [{}]",
        format_diff(diff),
        label,
        palette.trend_color(diff)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_core::data_processors::TimestampProcessor;
    use energy_data::analysis::analyze;

    const DATA: &str = "datetime,duration,unit,consumption,generation\n\
                        2024-01-01T00:15:00,900,Wh,500,0\n\
                        2024-01-01T00:45:00,900,Wh,500,0\n\
                        2024-01-02T13:00:00,900,kWh,3,0.5\n";

    fn dataset() -> Dataset {
        analyze(DATA, &TimestampProcessor::default()).unwrap()
    }

    #[test]
    fn test_daily_report() {
        let ds = dataset();
        let selection = Selection::latest(&ds, Grouping::Daily);
        let report = Report::build(&ds, selection, Path::new("x.csv")).unwrap();

        assert_eq!(report.key, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(report.hourly.as_ref().map(Vec::len), Some(24));
        assert!(report.daily.is_none());
        assert!(report.has_previous);
        assert!(!report.has_next);

        let text = report.render_text(&Palette::default(), true);
        assert!(text.starts_with("Jan 2, 2024 (daily)\n"));
        assert!(text.contains("Consumption ~3.0 kWh  Generation ~0.5 kWh  Net ~2.5 kWh"));
        assert!(text.contains("1PM"));
        assert!(text.contains("+2.0 kWh than yesterday [#dc2626]"));
    }

    #[test]
    fn test_weekly_report() {
        let ds = dataset();
        let selection = Selection::latest(&ds, Grouping::Weekly);
        let report = Report::build(&ds, selection, Path::new("x.csv")).unwrap();

        assert_eq!(report.daily.as_ref().map(Vec::len), Some(7));
        assert!(!report.has_previous);

        let text = report.render_text(&Palette::default(), false);
        assert!(text.starts_with("Jan 1 - Jan 7, 2024 (weekly)\n"));
        assert!(!text.contains("than last week"));
        assert!(text.contains("than average this month"));
        assert!(text.contains("Mon 1"));
    }

    #[test]
    fn test_report_json_shape() {
        let ds = dataset();
        let selection = Selection::latest(&ds, Grouping::Daily).previous();
        let report = Report::build(&ds, selection, Path::new("x.csv")).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["grouping"], "daily");
        assert_eq!(json["key"], "2024-01-01");
        assert!(json.get("daily").is_none());
        assert_eq!(json["hourly"].as_array().unwrap().len(), 24);
        assert!(json["insights"].get("previous_label").is_none());
    }

    #[test]
    fn test_report_on_empty_dataset() {
        let ds = Dataset::from_intervals(Vec::new());
        let selection = Selection::latest(&ds, Grouping::Daily);
        assert!(Report::build(&ds, selection, Path::new("x.csv")).is_none());
    }
}
