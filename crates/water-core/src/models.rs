use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, WaterError};

// ── Input records ─────────────────────────────────────────────────────────────

/// One raw telemetry row as delivered by the collector.
///
/// Every field is optional; any extra fields in the source object are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// ISO 8601 timestamp of the measurement.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Device tag, e.g. `"toaleta"`.
    #[serde(default)]
    pub label: Option<String>,
    /// Measured volume. Accepts either a JSON string or a JSON number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub volume: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A record that passed the record filter: timestamp and label are non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: String,
    pub label: String,
    /// Raw volume text; may be empty when the source omitted it.
    pub volume: String,
}

impl Reading {
    /// Parse the volume as a finite, non-negative real number.
    ///
    /// Returns `None` for empty, malformed, negative or non-finite values.
    pub fn volume_value(&self) -> Option<f64> {
        let v = self.volume.trim().parse::<f64>().ok()?;
        if v.is_finite() && v >= 0.0 {
            Some(v)
        } else {
            None
        }
    }
}

// ── Segments ──────────────────────────────────────────────────────────────────

/// One of the three fixed partitions of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// `[00:00, 12:00)`
    Morning,
    /// `[12:00, 19:00)`
    Afternoon,
    /// `[19:00, 24:00)`
    Night,
}

impl Segment {
    /// All segments in display order.
    pub const ALL: [Segment; 3] = [Segment::Morning, Segment::Afternoon, Segment::Night];

    /// Map an hour of day to its segment. Hours outside `0..24` have none.
    pub fn from_hour(hour: u32) -> Option<Segment> {
        match hour {
            0..=11 => Some(Segment::Morning),
            12..=18 => Some(Segment::Afternoon),
            19..=23 => Some(Segment::Night),
            _ => None,
        }
    }

    /// Position in [`Segment::ALL`].
    pub fn index(self) -> usize {
        match self {
            Segment::Morning => 0,
            Segment::Afternoon => 1,
            Segment::Night => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Morning => "morning",
            Segment::Afternoon => "afternoon",
            Segment::Night => "night",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running mean / count for one segment.
///
/// The mean is updated incrementally so that very large volumes cannot
/// overflow an intermediate sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBucket {
    pub segment: Segment,
    pub mean: f64,
    pub count: u32,
}

impl SegmentBucket {
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            mean: 0.0,
            count: 0,
        }
    }

    pub fn add(&mut self, volume: f64) {
        self.count += 1;
        self.mean += (volume - self.mean) / self.count as f64;
    }

    /// Mean volume, or `0.0` for an empty bucket.
    pub fn average(&self) -> f64 {
        self.mean
    }
}

/// Average consumption of one segment next to its reference target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: Segment,
    pub average_volume: f64,
    pub target_volume: f64,
    /// Number of readings that contributed to the average.
    pub count: u32,
}

impl SegmentSummary {
    /// Amount by which the average exceeds the target, never negative.
    pub fn excess(&self) -> f64 {
        (self.average_volume - self.target_volume).max(0.0)
    }

    /// Whether the average is at or under the target.
    pub fn within_target(&self) -> bool {
        self.average_volume <= self.target_volume
    }
}

// ── Verdict ───────────────────────────────────────────────────────────────────

/// Overall efficiency verdict across all three segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsVerdict {
    pub is_efficient: bool,
    pub excess_total: f64,
}

// ── Scatter / trend ───────────────────────────────────────────────────────────

/// One reading projected onto (hour of day, volume).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub hour: u32,
    pub volume: f64,
}

/// The fitted line evaluated at one observed hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub hour: u32,
    pub predicted_volume: f64,
}

/// Least-squares line `volume = slope * hour + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn predict(&self, hour: u32) -> f64 {
        self.slope * hour as f64 + self.intercept
    }
}

/// Why a trend line could not be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TrendUnavailable {
    /// Fewer than two points.
    TooFewPoints { count: usize },
    /// Every point shares the same hour.
    ZeroHourVariance,
    /// Volumes are too large for the fitted line to stay finite.
    NonFinite,
}

impl std::fmt::Display for TrendUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendUnavailable::TooFewPoints { count } => {
                write!(f, "need at least 2 points, got {}", count)
            }
            TrendUnavailable::ZeroHourVariance => f.write_str("all readings share the same hour"),
            TrendUnavailable::NonFinite => f.write_str("volumes too large to fit a finite line"),
        }
    }
}

/// Outcome of the trend estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Trend {
    Available {
        line: TrendLine,
        points: Vec<TrendPoint>,
    },
    Unavailable {
        #[serde(flatten)]
        reason: TrendUnavailable,
    },
}

impl Trend {
    pub fn unavailable(reason: TrendUnavailable) -> Self {
        Trend::Unavailable { reason }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Trend::Available { .. })
    }

    /// Fitted points, empty when the trend is unavailable.
    pub fn points(&self) -> &[TrendPoint] {
        match self {
            Trend::Available { points, .. } => points,
            Trend::Unavailable { .. } => &[],
        }
    }

    pub fn line(&self) -> Option<TrendLine> {
        match self {
            Trend::Available { line, .. } => Some(*line),
            Trend::Unavailable { .. } => None,
        }
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Optional calendar date and device label used to narrow the readings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub date: Option<NaiveDate>,
    pub label: Option<String>,
}

impl Selection {
    /// No narrowing at all.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selection from collaborator-supplied strings.
    ///
    /// Empty strings mean "not selected". A non-empty `date` must be
    /// `YYYY-MM-DD`; a non-empty `label` is kept verbatim, since labels
    /// match exactly.
    pub fn parse(date: Option<&str>, label: Option<&str>) -> Result<Self> {
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => Some(
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|_| WaterError::InvalidDate(d.to_string()))?,
            ),
            None => None,
        };
        let label = label.filter(|l| !l.is_empty()).map(str::to_string);
        Ok(Self { date, label })
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
