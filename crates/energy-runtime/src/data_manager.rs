//! Dataset lifecycle for the host application.
//!
//! [`DataManager`] owns the currently displayed [`Dataset`]. Every load
//! builds a fresh dataset from scratch; a failed load leaves the previous
//! one in place and records the error so the host can show it.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use energy_core::data_processors::TimestampProcessor;
use energy_core::error::{EnergyError, Result};
use energy_data::analysis::{analyze, analyze_reader, Dataset};

// ── DataManager ───────────────────────────────────────────────────────────────

/// Holder of the current dataset.
///
/// # Example
/// ```no_run
/// use energy_core::data_processors::TimestampProcessor;
/// use energy_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new(TimestampProcessor::default());
/// if let Ok(dataset) = mgr.load_text("datetime,consumption\n2024-01-01T00:00:00,1") {
///     println!("days: {}", dataset.aggregates().daily_keys.len());
/// }
/// ```
#[derive(Debug)]
pub struct DataManager {
    /// Parser configuration applied to every load.
    timestamps: TimestampProcessor,
    /// Most recently loaded dataset.
    dataset: Option<Dataset>,
    /// Where the current dataset came from, when it was a file.
    source: Option<PathBuf>,
    /// When the current dataset was loaded.
    loaded_at: Option<Instant>,
    /// Human-readable description of the last load error.
    last_error: Option<String>,
}

impl DataManager {
    pub fn new(timestamps: TimestampProcessor) -> Self {
        Self {
            timestamps,
            dataset: None,
            source: None,
            loaded_at: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Replace the current dataset with one built from `text`.
    ///
    /// On failure the previous dataset is kept and the error is both
    /// recorded and returned.
    pub fn load_text(&mut self, text: &str) -> Result<&Dataset> {
        self.install(analyze(text, &self.timestamps), None)
    }

    /// Read `path` and replace the current dataset with its contents.
    ///
    /// Rows that are not valid UTF-8 are skipped like any other bad row.
    pub async fn load_file(&mut self, path: &Path) -> Result<&Dataset> {
        let result = match tokio::fs::read(path).await {
            Ok(bytes) => analyze_reader(bytes.as_slice(), &self.timestamps),
            Err(source) => Err(EnergyError::FileRead {
                path: path.to_path_buf(),
                source,
            }),
        };
        self.install(result, Some(path.to_path_buf()))
    }

    /// The current dataset, if any load has succeeded.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// File the current dataset was read from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Age of the current dataset, or `None` if nothing has been loaded.
    pub fn dataset_age(&self) -> Option<Duration> {
        self.loaded_at.map(|ts| ts.elapsed())
    }

    /// Human-readable description of the last load error, or `None`.
    ///
    /// Cleared by the next successful load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Drop the current dataset.
    pub fn clear(&mut self) {
        self.dataset = None;
        self.source = None;
        self.loaded_at = None;
        tracing::debug!("dataset cleared");
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn install(&mut self, result: Result<Dataset>, source: Option<PathBuf>) -> Result<&Dataset> {
        match result {
            Ok(dataset) => {
                tracing::info!(
                    intervals = dataset.intervals().len(),
                    skipped = dataset.metadata().skipped_rows.len(),
                    days = dataset.aggregates().daily_keys.len(),
                    "dataset loaded"
                );
                self.last_error = None;
                self.source = source;
                self.loaded_at = Some(Instant::now());
                Ok(self.dataset.insert(dataset))
            }
            Err(e) => {
                tracing::warn!(error = %e, "load failed; keeping previous dataset");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self::new(TimestampProcessor::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
