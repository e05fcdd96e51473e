//! Record validation and selection narrowing.

use tracing::debug;
use water_core::models::{RawRecord, Reading, Selection};
use water_core::time_utils::TimezoneHandler;

/// Keep only records with a non-empty `timestamp` and `label`.
///
/// Rejected records are dropped without error; order is preserved.
pub fn filter_valid(records: &[RawRecord]) -> Vec<Reading> {
    let readings: Vec<Reading> = records.iter().filter_map(to_reading).collect();

    let dropped = records.len() - readings.len();
    if dropped > 0 {
        debug!(
            "Record filter dropped {} of {} records without timestamp or label",
            dropped,
            records.len()
        );
    }
    readings
}

fn to_reading(record: &RawRecord) -> Option<Reading> {
    let timestamp = record.timestamp.as_deref().filter(|s| !s.is_empty())?;
    let label = record.label.as_deref().filter(|s| !s.is_empty())?;
    Some(Reading {
        timestamp: timestamp.to_string(),
        label: label.to_string(),
        volume: record.volume.clone().unwrap_or_default(),
    })
}

/// Distinct labels in first-seen order.
pub fn unique_labels(readings: &[Reading]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for reading in readings {
        if !labels.iter().any(|l| l == &reading.label) {
            labels.push(reading.label.clone());
        }
    }
    labels
}

/// Narrow `readings` to the selected local date and label.
///
/// When a date is selected, readings whose timestamp cannot be parsed are
/// excluded. The label comparison is exact.
pub fn apply_selection<'a>(
    readings: &'a [Reading],
    selection: &Selection,
    tz: &TimezoneHandler,
) -> Vec<&'a Reading> {
    readings
        .iter()
        .filter(|r| match selection.date {
            Some(date) => tz.local_date(&r.timestamp) == Some(date),
            None => true,
        })
        .filter(|r| match selection.label.as_deref() {
            Some(label) => r.label == label,
            None => true,
        })
        .collect()
}
