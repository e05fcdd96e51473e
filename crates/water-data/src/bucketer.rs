//! Per-segment average consumption.

use tracing::debug;
use water_core::models::{Reading, Segment, SegmentBucket, SegmentSummary};
use water_core::targets::SegmentTargets;
use water_core::time_utils::TimezoneHandler;

// ── TimeBucketer ──────────────────────────────────────────────────────────────

/// Stateless helper that groups readings into the three day segments.
pub struct TimeBucketer;

impl TimeBucketer {
    /// Accumulate volume sum and count per segment.
    ///
    /// Readings with an unparseable timestamp or volume are skipped.
    pub fn bucket<'a, I>(readings: I, tz: &TimezoneHandler) -> [SegmentBucket; 3]
    where
        I: IntoIterator<Item = &'a Reading>,
    {
        let mut buckets = Segment::ALL.map(SegmentBucket::new);
        let mut skipped = 0usize;

        for reading in readings {
            let Some(hour) = tz.local_hour(&reading.timestamp) else {
                skipped += 1;
                continue;
            };
            let Some(volume) = reading.volume_value() else {
                skipped += 1;
                continue;
            };
            if let Some(segment) = Segment::from_hour(hour) {
                buckets[segment.index()].add(volume);
            }
        }

        if skipped > 0 {
            debug!("Time bucketer skipped {} unparseable readings", skipped);
        }
        buckets
    }

    /// Bucket `readings` and pair each segment average with its target.
    ///
    /// Always returns morning, afternoon, night in that order.
    pub fn summarize<'a, I>(
        readings: I,
        tz: &TimezoneHandler,
        targets: &SegmentTargets,
    ) -> [SegmentSummary; 3]
    where
        I: IntoIterator<Item = &'a Reading>,
    {
        Self::bucket(readings, tz).map(|b| SegmentSummary {
            segment: b.segment,
            average_volume: b.average(),
            target_volume: targets.for_segment(b.segment),
            count: b.count,
        })
    }
}
