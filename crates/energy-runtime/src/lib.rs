//! Runtime layer for Energy Story.
//!
//! Owns the loaded dataset and the user's current period selection on
//! behalf of the host binary.

pub mod data_manager;
pub mod selection;

pub use energy_core as core;
pub use energy_data as data;
