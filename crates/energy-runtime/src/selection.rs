//! Period navigation over a loaded dataset.
//!
//! A [`Selection`] is a small value: every navigation step returns a new
//! selection instead of mutating shared state, so the host can keep the
//! previous one around for undo or redraw comparisons.

use chrono::NaiveDate;
use energy_core::models::Grouping;
use energy_core::time_utils::week_start;
use energy_data::analysis::Dataset;
use serde::Serialize;

/// Currently selected period: a grouping plus a position in its key list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub grouping: Grouping,
    pub index: usize,
}

impl Selection {
    /// Most recent period for `grouping`. Index 0 on an empty dataset.
    pub fn latest(dataset: &Dataset, grouping: Grouping) -> Self {
        Self {
            grouping,
            index: dataset.keys(grouping).len().saturating_sub(1),
        }
    }

    /// Key of the selected period, `None` when the dataset has no keys.
    pub fn current_key(&self, dataset: &Dataset) -> Option<NaiveDate> {
        dataset.keys(self.grouping).get(self.index).copied()
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self, dataset: &Dataset) -> bool {
        self.index + 1 < dataset.keys(self.grouping).len()
    }

    /// One period back; stays put at the first key.
    pub fn previous(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
            ..self
        }
    }

    /// One period forward; stays put at the last key.
    pub fn next(self, dataset: &Dataset) -> Self {
        if self.has_next(dataset) {
            Self {
                index: self.index + 1,
                ..self
            }
        } else {
            self
        }
    }

    /// Jump to the period containing `date`.
    ///
    /// Returns `None` when that period has no data.
    pub fn select_date(self, dataset: &Dataset, date: NaiveDate) -> Option<Self> {
        let key = match self.grouping {
            Grouping::Daily => date,
            Grouping::Weekly => week_start(date),
        };
        let index = dataset.keys(self.grouping).binary_search(&key).ok()?;
        Some(Self { index, ..self })
    }

    /// Switch grouping while staying on the same stretch of time.
    ///
    /// Daily to weekly selects the week containing the current day.
    /// Weekly to daily selects the first day with data in the current
    /// week, or the nearest later day if that week has none.
    pub fn with_grouping(self, dataset: &Dataset, grouping: Grouping) -> Self {
        if grouping == self.grouping {
            return self;
        }
        let Some(current) = self.current_key(dataset) else {
            return Self { grouping, index: 0 };
        };

        let keys = dataset.keys(grouping);
        let target = match grouping {
            Grouping::Daily => current,
            Grouping::Weekly => week_start(current),
        };
        let index = keys
            .partition_point(|key| *key < target)
            .min(keys.len().saturating_sub(1));
        Self { grouping, index }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
