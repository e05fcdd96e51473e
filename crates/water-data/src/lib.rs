//! Analytics pipeline for the water monitor.
//!
//! Filters raw telemetry, buckets readings into day segments, evaluates them
//! against reference targets and fits an hourly trend line. The pipeline
//! modules are pure; only [`reader`] touches the filesystem.

pub mod analysis;
pub mod bucketer;
pub mod evaluator;
pub mod filter;
pub mod reader;
pub mod scatter;
pub mod trend;

pub use water_core as core;
