//! Domain types and shared utilities for the water monitor.
//!
//! Holds the reading and summary models, the per-device reference targets,
//! timestamp handling, CLI settings and report formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod targets;
pub mod time_utils;

pub use error::{Result, WaterError};
