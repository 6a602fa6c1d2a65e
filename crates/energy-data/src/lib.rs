//! Data ingestion layer for energy interval files.
//!
//! Responsible for reading and normalising meter CSV exports, aggregating
//! them into daily and weekly totals, building chart-ready bucket arrays
//! and deriving comparison metrics for the selected period.

pub mod aggregator;
pub mod analysis;
pub mod buckets;
pub mod insights;
pub mod reader;

pub use energy_core as core;
