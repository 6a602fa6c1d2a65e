//! Colours handed to whichever caller renders charts or insight tiles.
//!
//! There is no process-wide styling state: callers build a [`Palette`]
//! (usually [`Palette::default`]) and pass it along explicitly.

use serde::{Deserialize, Serialize};

/// Whether a comparison delta means more or less energy was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// More consumption than the baseline.
    Worse,
    /// Equal or less consumption than the baseline.
    Better,
}

impl Trend {
    pub fn from_diff(diff: f64) -> Self {
        if diff > 0.0 {
            Trend::Worse
        } else {
            Trend::Better
        }
    }
}

/// Hex colours used for consumption/generation series and trend tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub consumption: String,
    pub generation: String,
    pub worse: String,
    pub better: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            consumption: "#3b82f6".to_string(),
            generation: "#f59e0b".to_string(),
            worse: "#dc2626".to_string(),
            better: "#16a34a".to_string(),
        }
    }
}

impl Palette {
    /// High-contrast variant for monochrome-ish terminals and print.
    pub fn high_contrast() -> Self {
        Self {
            consumption: "#000000".to_string(),
            generation: "#7f7f7f".to_string(),
            worse: "#ff0000".to_string(),
            better: "#00aa00".to_string(),
        }
    }

    /// Resolve a palette by name, falling back to the default.
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "high-contrast" | "contrast" => Self::high_contrast(),
            _ => Self::default(),
        }
    }

    pub fn trend_color(&self, diff: f64) -> &str {
        match Trend::from_diff(diff) {
            Trend::Worse => &self.worse,
            Trend::Better => &self.better,
        }
    }
}
