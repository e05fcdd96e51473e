use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{Result, WaterError};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Parses reading timestamps and projects them into the local timezone in
/// which hours of day and calendar dates are evaluated.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneHandler {
    tz: Tz,
}

impl Default for TimezoneHandler {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl TimezoneHandler {
    /// Create a handler for `tz_name`, falling back to UTC with a warning
    /// when the name is not a recognised IANA timezone.
    pub fn new(tz_name: &str) -> Self {
        Self::try_new(tz_name).unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Self::default()
        })
    }

    /// Strict variant of [`TimezoneHandler::new`].
    pub fn try_new(tz_name: &str) -> Result<Self> {
        tz_name
            .parse::<Tz>()
            .map(|tz| Self { tz })
            .map_err(|_| WaterError::InvalidTimezone(tz_name.to_string()))
    }

    /// Parse an ISO 8601 timestamp into the handler's timezone.
    ///
    /// Strings carrying an offset (or a `Z` suffix) are converted; naive
    /// date-times and bare dates are interpreted as local wall-clock time.
    /// Returns `None` for empty or unrecognised input.
    pub fn parse_local(&self, s: &str) -> Option<DateTime<Tz>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&self.tz));
        }

        // Basic-format offsets such as `+0200`.
        const OFFSET_FMTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
        for fmt in OFFSET_FMTS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(dt.with_timezone(&self.tz));
            }
        }

        const FMTS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        for fmt in FMTS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return self.localize(&naive);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return self.localize(&date.and_hms_opt(0, 0, 0)?);
        }

        None
    }

    /// Local hour of day (0–23) of a timestamp string.
    pub fn local_hour(&self, s: &str) -> Option<u32> {
        self.parse_local(s).map(|dt| dt.hour())
    }

    /// Local calendar date of a timestamp string.
    pub fn local_date(&self, s: &str) -> Option<NaiveDate> {
        self.parse_local(s).map(|dt| dt.date_naive())
    }

    /// Today's date in the handler's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    // Ambiguous wall-clock times (DST fall-back) resolve to the earlier
    // instant; non-existent ones (spring-forward gap) are rejected.
    fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
        self.tz.from_local_datetime(naive).earliest()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> TimezoneHandler {
        TimezoneHandler::new("UTC")
    }

    #[test]
    fn test_invalid_timezone_falls_back_to_utc() {
        let h = TimezoneHandler::new("Not/AZone");
        assert_eq!(h.local_hour("2024-07-01T10:00:00Z"), Some(10));
    }

    #[test]
    fn test_try_new_rejects_invalid_timezone() {
        let err = TimezoneHandler::try_new("Not/AZone").unwrap_err();
        assert!(matches!(err, WaterError::InvalidTimezone(_)));
    }

    #[test]
    fn test_try_new_accepts_iana_name() {
        assert!(TimezoneHandler::try_new("Europe/Bucharest").is_ok());
    }

    #[test]
    fn test_naive_timestamp_is_local_wall_clock() {
        let h = TimezoneHandler::new("Europe/Bucharest");
        assert_eq!(h.local_hour("2024-05-01T08:15:00"), Some(8));
        assert_eq!(h.local_hour("2024-05-01 23:59:59"), Some(23));
    }

    #[test]
    fn test_offset_timestamp_is_converted() {
        // 10:00 UTC is 13:00 in Bucharest during summer time (UTC+3).
        let h = TimezoneHandler::new("Europe/Bucharest");
        assert_eq!(h.local_hour("2024-07-01T10:00:00Z"), Some(13));
        assert_eq!(utc().local_hour("2024-07-01T10:00:00+02:00"), Some(8));
    }

    #[test]
    fn test_basic_format_offset() {
        assert_eq!(utc().local_hour("2024-05-01T08:00:00+0200"), Some(6));
        assert_eq!(utc().local_hour("2024-05-01T08:00:00.5-0130"), Some(9));
        assert_eq!(utc().local_hour("2024-05-01 23:30:00+0000"), Some(23));
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(utc().local_hour("2024-01-15T19:00:00.250"), Some(19));
        assert_eq!(utc().local_hour("2024-01-15T19:00:00.250Z"), Some(19));
    }

    #[test]
    fn test_date_only_is_local_midnight() {
        assert_eq!(utc().local_hour("2024-01-15"), Some(0));
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 23:30 UTC on the 1st is already the 2nd in Bucharest.
        let h = TimezoneHandler::new("Europe/Bucharest");
        assert_eq!(
            h.local_date("2024-01-01T23:30:00Z"),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert!(utc().parse_local("").is_none());
        assert!(utc().parse_local("   ").is_none());
        assert!(utc().parse_local("yesterday").is_none());
        assert!(utc().parse_local("2024-02-30T10:00:00").is_none());
    }
}
