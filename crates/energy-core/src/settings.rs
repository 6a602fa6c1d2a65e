use clap::Parser;
use std::path::PathBuf;

use crate::error::{EnergyError, Result};
use crate::models::Grouping;
use crate::palette::Palette;

/// Interval data file loaded when `--file` is not given.
pub const DEFAULT_DATA_FILE: &str = "high-winter-interval-data.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Daily and weekly energy usage report from interval meter data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "energy-story",
    about = "Daily and weekly energy usage report from interval meter data",
    version
)]
pub struct Settings {
    /// Interval data CSV file
    #[arg(long, short = 'f', default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Grouping of the reported period
    #[arg(long, default_value = "daily", value_parser = ["daily", "weekly"])]
    pub view: String,

    /// Day (yyyy-MM-dd) to report on; defaults to the most recent one
    #[arg(long)]
    pub date: Option<String>,

    /// Display timezone for timestamps carrying an offset (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Time format
    #[arg(long, default_value = "auto", value_parser = ["12h", "24h", "auto"])]
    pub time_format: String,

    /// Colour palette
    #[arg(long, default_value = "default", value_parser = ["default", "high-contrast"])]
    pub palette: String,

    /// Report output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub output: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse CLI arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.time_format == "auto" {
            let is_12h = crate::time_utils::detect_time_format(Some(&settings.timezone), None);
            settings.time_format = if is_12h {
                "12h".to_string()
            } else {
                "24h".to_string()
            };
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    pub fn grouping(&self) -> Grouping {
        self.view.parse().unwrap_or_default()
    }

    /// The `--date` selection, if one was given.
    pub fn selected_date(&self) -> Result<Option<chrono::NaiveDate>> {
        self.date
            .as_deref()
            .map(crate::time_utils::parse_key)
            .transpose()
    }

    pub fn twelve_hour(&self) -> bool {
        self.time_format == "12h"
    }

    pub fn palette(&self) -> Palette {
        Palette::by_name(&self.palette)
    }

    pub fn json_output(&self) -> bool {
        self.output == "json"
    }

    /// Check values clap cannot validate on its own.
    pub fn validate(&self) -> Result<()> {
        if !crate::time_utils::TimezoneHandler::validate_timezone(&self.timezone) {
            return Err(EnergyError::InvalidTimezone(self.timezone.clone()));
        }
        self.selected_date()?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["energy-story"]);

        assert_eq!(settings.file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(settings.view, "daily");
        assert!(settings.date.is_none());
        assert_eq!(settings.timezone, "auto");
        assert_eq!(settings.time_format, "auto");
        assert_eq!(settings.palette, "default");
        assert_eq!(settings.output, "text");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_explicit_values() {
        let settings = Settings::parse_from([
            "energy-story",
            "--file",
            "/tmp/meter.csv",
            "--view",
            "weekly",
            "--date",
            "2024-01-03",
            "--output",
            "json",
        ]);
        assert_eq!(settings.file, PathBuf::from("/tmp/meter.csv"));
        assert_eq!(settings.grouping(), Grouping::Weekly);
        assert!(settings.json_output());
        assert_eq!(
            settings.selected_date().unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 3)
        );
    }

    #[test]
    fn test_settings_rejects_unknown_view() {
        assert!(Settings::try_parse_from(["energy-story", "--view", "monthly"]).is_err());
    }

    #[test]
    fn test_load_resolves_auto_values() {
        let settings = Settings::load_from_args(["energy-story", "--timezone", "America/Denver"]);
        assert_eq!(settings.timezone, "America/Denver");
        assert_eq!(settings.time_format, "12h");
        assert!(settings.twelve_hour());

        let settings = Settings::load_from_args(["energy-story", "--timezone", "Europe/Paris"]);
        assert_eq!(settings.time_format, "24h");
    }

    #[test]
    fn test_load_auto_timezone_is_resolved() {
        let settings = Settings::load_from_args(["energy-story"]);
        assert_ne!(settings.timezone, "auto");
        assert_ne!(settings.time_format, "auto");
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let settings = Settings::load_from_args(["energy-story", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_validate_rejects_bad_date_and_timezone() {
        let settings = Settings::load_from_args([
            "energy-story",
            "--timezone",
            "UTC",
            "--date",
            "yesterday",
        ]);
        assert!(matches!(settings.validate(), Err(EnergyError::InvalidKey(_))));

        let settings = Settings::load_from_args(["energy-story", "--timezone", "Nowhere/Land"]);
        assert!(matches!(
            settings.validate(),
            Err(EnergyError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_palette_selection() {
        let settings = Settings::parse_from(["energy-story", "--palette", "high-contrast"]);
        assert_eq!(settings.palette(), Palette::high_contrast());
    }
}
