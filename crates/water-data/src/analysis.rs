//! Top-level analytics pipeline.
//!
//! Narrows readings by selection, then runs the two independent branches:
//! segment bucketing followed by target evaluation, and scatter projection
//! followed by trend estimation. Everything is recomputed on every call.

use serde::{Deserialize, Serialize};
use tracing::debug;
use water_core::models::{Reading, SavingsVerdict, ScatterPoint, SegmentSummary, Selection, Trend};
use water_core::targets::ReferenceTable;
use water_core::time_utils::TimezoneHandler;

use crate::bucketer::TimeBucketer;
use crate::filter::apply_selection;
use crate::{evaluator, scatter, trend};

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything the presentation layer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    /// Morning, afternoon and night, always in that order.
    pub summaries: [SegmentSummary; 3],
    pub verdict: SavingsVerdict,
    pub scatter: Vec<ScatterPoint>,
    pub trend: Trend,
    /// Readings left after date / label narrowing.
    pub readings_considered: usize,
}

impl Analytics {
    /// `true` when the selection matched no readings.
    pub fn is_empty(&self) -> bool {
        self.readings_considered == 0
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analytics pipeline over `readings`.
///
/// Pure: identical inputs always produce identical output.
pub fn compute_analytics(
    readings: &[Reading],
    selection: &Selection,
    tz: &TimezoneHandler,
    table: &ReferenceTable,
) -> Analytics {
    let selected = apply_selection(readings, selection, tz);

    // ── Branch 1: segments → verdict ──────────────────────────────────────────
    let targets = table.targets_for(selection.label.as_deref());
    let summaries = TimeBucketer::summarize(selected.iter().copied(), tz, &targets);
    let verdict = evaluator::evaluate(&summaries);

    // ── Branch 2: scatter → trend ─────────────────────────────────────────────
    let scatter = scatter::project(selected.iter().copied(), tz);
    let trend = trend::estimate(&scatter);

    debug!(
        "Analytics: {} of {} readings selected, {} scatter points, trend available: {}",
        selected.len(),
        readings.len(),
        scatter.len(),
        trend.is_available()
    );

    Analytics {
        summaries,
        verdict,
        scatter,
        trend,
        readings_considered: selected.len(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
