//! Plain-text and JSON rendering of an [`Analytics`] result.

use chrono::NaiveDate;
use serde::Serialize;
use water_core::formatting::{format_number, report_title, verdict_text};
use water_core::models::{Selection, Trend};
use water_data::analysis::Analytics;
use water_data::evaluator::excess_breakdown;

/// Serialisable envelope for `--format json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub title: String,
    pub generated_at: String,
    pub timezone: String,
    pub date: Option<NaiveDate>,
    pub label: Option<&'a str>,
    pub labels: &'a [String],
    pub status: String,
    #[serde(flatten)]
    pub analytics: &'a Analytics,
}

impl<'a> Report<'a> {
    pub fn new(
        analytics: &'a Analytics,
        selection: &'a Selection,
        labels: &'a [String],
        timezone: &str,
    ) -> Self {
        Self {
            title: report_title(selection.date, selection.label.as_deref()),
            generated_at: chrono::Utc::now().to_rfc3339(),
            timezone: timezone.to_string(),
            date: selection.date,
            label: selection.label.as_deref(),
            labels,
            status: verdict_text(&analytics.verdict),
            analytics,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report.
    pub fn to_text(&self) -> String {
        let a = self.analytics;
        let mut out = String::new();

        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push('\n');

        if a.is_empty() {
            out.push_str("No data for this selection.\n");
        }

        out.push_str(&format!(
            "\n{:<10} {:>14} {:>14} {:>14} {:>7}\n",
            "segment", "average", "target", "excess", "count"
        ));
        for (summary, (_, excess)) in a.summaries.iter().zip(excess_breakdown(&a.summaries)) {
            out.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>14} {:>7}\n",
                summary.segment.as_str(),
                format_number(summary.average_volume, 2),
                format_number(summary.target_volume, 0),
                format_number(excess, 2),
                summary.count
            ));
        }

        out.push('\n');
        out.push_str(&self.status);
        out.push('\n');

        out.push_str(&format!("\nScatter points: {}\n", a.scatter.len()));
        match &a.trend {
            Trend::Available { line, .. } => out.push_str(&format!(
                "Trend: volume = {} * hour + {}\n",
                format_number(line.slope, 2),
                format_number(line.intercept, 2)
            )),
            Trend::Unavailable { reason } => {
                out.push_str(&format!("Trend unavailable: {}\n", reason))
            }
        }

        if !self.labels.is_empty() {
            out.push_str(&format!("\nAvailable sources: {}\n", self.labels.join(", ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use water_core::models::Reading;
    use water_core::targets::ReferenceTable;
    use water_core::time_utils::TimezoneHandler;
    use water_data::analysis::compute_analytics;

    fn reading(ts: &str, label: &str, volume: &str) -> Reading {
        Reading {
            timestamp: ts.to_string(),
            label: label.to_string(),
            volume: volume.to_string(),
        }
    }

    fn sample() -> (Analytics, Selection) {
        let readings = vec![
            reading("2024-05-01T07:00:00", "toaleta", "19000"),
            reading("2024-05-01T09:00:00", "toaleta", "21000"),
            reading("2024-05-01T13:00:00", "toaleta", "11000"),
        ];
        let selection = Selection::parse(Some("2024-05-01"), Some("toaleta")).unwrap();
        let analytics = compute_analytics(
            &readings,
            &selection,
            &TimezoneHandler::new("UTC"),
            &ReferenceTable::new(),
        );
        (analytics, selection)
    }

    #[test]
    fn test_text_report_contents() {
        let (analytics, selection) = sample();
        let labels = vec!["toaleta".to_string(), "dus".to_string()];
        let text = Report::new(&analytics, &selection, &labels, "UTC").to_text();

        assert!(text.starts_with("Data for 01/05/2024 of toaleta (toilet)\n"));
        assert!(text.contains("morning"));
        assert!(text.contains("20,000.00"));
        assert!(text.contains("No savings (extra usage: 2,000.00 liters)"));
        assert!(text.contains("Trend: volume ="));
        assert!(text.contains("Available sources: toaleta, dus"));
        assert!(!text.contains("No data for this selection"));
    }

    #[test]
    fn test_text_report_empty_selection() {
        let selection = Selection::parse(Some("2030-01-01"), None).unwrap();
        let analytics = compute_analytics(
            &[],
            &selection,
            &TimezoneHandler::new("UTC"),
            &ReferenceTable::new(),
        );
        let text = Report::new(&analytics, &selection, &[], "UTC").to_text();
        assert!(text.contains("No data for this selection."));
        assert!(text.contains("Efficient savings"));
        assert!(text.contains("Trend unavailable: need at least 2 points, got 0"));
    }

    #[test]
    fn test_json_report_flattens_analytics() {
        let (analytics, selection) = sample();
        let labels = vec!["toaleta".to_string()];
        let json = Report::new(&analytics, &selection, &labels, "UTC")
            .to_json()
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(v["label"], "toaleta");
        assert_eq!(v["date"], "2024-05-01");
        assert_eq!(v["verdict"]["is_efficient"], false);
        assert_eq!(v["summaries"].as_array().unwrap().len(), 3);
        assert_eq!(v["readings_considered"], 3);
    }
}
