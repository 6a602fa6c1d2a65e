//! Shared types for the energy usage pipeline.
//!
//! Holds the interval record and bucket models, the error taxonomy, the
//! lenient field processors used by the reader, calendar key helpers,
//! formatting, the display palette and CLI settings.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod palette;
pub mod settings;
pub mod time_utils;

pub use error::{EnergyError, Result};
