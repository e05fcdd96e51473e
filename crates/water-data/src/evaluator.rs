//! Efficiency verdict against reference targets.

use water_core::models::{SavingsVerdict, Segment, SegmentSummary};

/// Derive the savings verdict from the segment summaries.
///
/// The verdict is all-or-nothing: a single segment over its target makes the
/// whole selection inefficient. Equality counts as efficient, and an empty
/// set of summaries is vacuously efficient with no excess. The total
/// saturates at `f64::MAX` instead of overflowing to infinity.
pub fn evaluate(summaries: &[SegmentSummary]) -> SavingsVerdict {
    let is_efficient = summaries.iter().all(SegmentSummary::within_target);
    let excess_total = summaries
        .iter()
        .map(SegmentSummary::excess)
        .sum::<f64>()
        .min(f64::MAX);
    SavingsVerdict {
        is_efficient,
        excess_total,
    }
}

/// Per-segment excess, in summary order. Segments within target map to `0.0`.
pub fn excess_breakdown(summaries: &[SegmentSummary]) -> Vec<(Segment, f64)> {
    summaries.iter().map(|s| (s.segment, s.excess())).collect()
}
