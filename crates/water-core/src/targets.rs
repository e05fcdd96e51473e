//! Reference consumption targets per device and day segment.
//!
//! Targets are expressed in the same unit as reading volumes. A label that is
//! not in the table, or no label at all, maps to zero targets for every
//! segment; that fallback is part of the contract.

use serde::{Deserialize, Serialize};

use crate::models::Segment;

// ── SegmentTargets ────────────────────────────────────────────────────────────

/// Target volume for each of the three segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentTargets {
    pub morning: f64,
    pub afternoon: f64,
    pub night: f64,
}

impl SegmentTargets {
    pub const ZERO: SegmentTargets = SegmentTargets {
        morning: 0.0,
        afternoon: 0.0,
        night: 0.0,
    };

    pub const fn new(morning: f64, afternoon: f64, night: f64) -> Self {
        Self {
            morning,
            afternoon,
            night,
        }
    }

    pub fn for_segment(&self, segment: Segment) -> f64 {
        match segment {
            Segment::Morning => self.morning,
            Segment::Afternoon => self.afternoon,
            Segment::Night => self.night,
        }
    }
}

// ── DeviceLabel ───────────────────────────────────────────────────────────────

/// Devices with a known consumption profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceLabel {
    #[serde(rename = "dus")]
    Shower,
    #[serde(rename = "toaleta")]
    Toilet,
    #[serde(rename = "chiuveta")]
    Sink,
    #[serde(rename = "masina_spalat")]
    WashingMachine,
    #[serde(rename = "masina_spalat_vase")]
    Dishwasher,
}

impl DeviceLabel {
    pub const ALL: [DeviceLabel; 5] = [
        DeviceLabel::Shower,
        DeviceLabel::Toilet,
        DeviceLabel::Sink,
        DeviceLabel::WashingMachine,
        DeviceLabel::Dishwasher,
    ];

    /// Resolve the tag used in the telemetry stream. Matching is exact.
    pub fn from_tag(tag: &str) -> Option<DeviceLabel> {
        Self::ALL.into_iter().find(|d| d.tag() == tag)
    }

    /// Tag used in the telemetry stream.
    pub fn tag(self) -> &'static str {
        match self {
            DeviceLabel::Shower => "dus",
            DeviceLabel::Toilet => "toaleta",
            DeviceLabel::Sink => "chiuveta",
            DeviceLabel::WashingMachine => "masina_spalat",
            DeviceLabel::Dishwasher => "masina_spalat_vase",
        }
    }

    /// Human-readable device name.
    pub fn display_name(self) -> &'static str {
        match self {
            DeviceLabel::Shower => "shower",
            DeviceLabel::Toilet => "toilet",
            DeviceLabel::Sink => "sink",
            DeviceLabel::WashingMachine => "washing machine",
            DeviceLabel::Dishwasher => "dishwasher",
        }
    }

    /// Built-in targets. Appliances are not monitored at night.
    pub const fn targets(self) -> SegmentTargets {
        match self {
            DeviceLabel::Shower => SegmentTargets::new(50_000.0, 30_000.0, 40_000.0),
            DeviceLabel::Toilet => SegmentTargets::new(18_000.0, 12_000.0, 15_000.0),
            DeviceLabel::Sink => SegmentTargets::new(9_000.0, 7_000.0, 6_000.0),
            DeviceLabel::WashingMachine => SegmentTargets::new(80_000.0, 80_000.0, 0.0),
            DeviceLabel::Dishwasher => SegmentTargets::new(60_000.0, 60_000.0, 0.0),
        }
    }
}

impl std::fmt::Display for DeviceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// ── ReferenceTable ────────────────────────────────────────────────────────────

/// Label → targets lookup with a zero fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTable;

impl ReferenceTable {
    pub fn new() -> Self {
        Self
    }

    /// Targets for an optional label.
    ///
    /// `None` (no label selected) and unknown tags both yield
    /// [`SegmentTargets::ZERO`].
    pub fn targets_for(&self, label: Option<&str>) -> SegmentTargets {
        label
            .and_then(DeviceLabel::from_tag)
            .map(DeviceLabel::targets)
            .unwrap_or(SegmentTargets::ZERO)
    }
}
