mod bootstrap;
mod report;

use anyhow::{anyhow, Context, Result};
use energy_core::data_processors::TimestampProcessor;
use energy_core::settings::Settings;
use energy_core::time_utils::{format_key, TimezoneHandler};
use energy_runtime::data_manager::DataManager;
use energy_runtime::selection::Selection;

use crate::report::Report;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Energy Story v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, View: {}, Timezone: {}",
        settings.file.display(),
        settings.view,
        settings.timezone
    );

    settings.validate()?;

    let timezone = TimezoneHandler::try_new(&settings.timezone)?;
    let mut manager = DataManager::new(TimestampProcessor::new(timezone));
    let dataset = manager
        .load_file(&settings.file)
        .await
        .with_context(|| format!("loading {}", settings.file.display()))?;

    let grouping = settings.grouping();
    let latest = Selection::latest(dataset, grouping);
    let selection = match settings.selected_date()? {
        Some(date) => latest.select_date(dataset, date).ok_or_else(|| {
            anyhow!("no {} data for {}", grouping.as_str(), format_key(date))
        })?,
        None => latest,
    };

    let Some(report) = Report::build(dataset, selection, &settings.file) else {
        tracing::warn!("no intervals found in {}", settings.file.display());
        println!("No energy data in {}", settings.file.display());
        return Ok(());
    };

    if settings.json_output() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text(&settings.palette(), settings.twelve_hour()));
    }

    Ok(())
}
