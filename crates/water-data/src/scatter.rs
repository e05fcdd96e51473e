use water_core::models::{Reading, ScatterPoint};
use water_core::time_utils::TimezoneHandler;

/// Project readings onto (local hour, volume) points, preserving order.
///
/// Readings whose timestamp or volume cannot be parsed are skipped.
pub fn project<'a, I>(readings: I, tz: &TimezoneHandler) -> Vec<ScatterPoint>
where
    I: IntoIterator<Item = &'a Reading>,
{
    readings
        .into_iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                hour: tz.local_hour(&r.timestamp)?,
                volume: r.volume_value()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ts: &str, volume: &str) -> Reading {
        Reading {
            timestamp: ts.to_string(),
            label: "chiuveta".to_string(),
            volume: volume.to_string(),
        }
    }

    #[test]
    fn test_project_preserves_order() {
        let tz = TimezoneHandler::new("UTC");
        let readings = vec![
            reading("2024-05-01T21:00:00", "3.5"),
            reading("2024-05-01T06:10:00", "100"),
            reading("2024-05-01T12:00:00", "0"),
        ];
        let points = project(&readings, &tz);
        assert_eq!(
            points,
            vec![
                ScatterPoint { hour: 21, volume: 3.5 },
                ScatterPoint { hour: 6, volume: 100.0 },
                ScatterPoint { hour: 12, volume: 0.0 },
            ]
        );
    }

    #[test]
    fn test_project_skips_unparseable() {
        let tz = TimezoneHandler::new("UTC");
        let readings = vec![
            reading("soon", "10"),
            reading("2024-05-01T06:00:00", "n/a"),
            reading("2024-05-01T07:00:00", "7"),
        ];
        let points = project(&readings, &tz);
        assert_eq!(points, vec![ScatterPoint { hour: 7, volume: 7.0 }]);
    }

    #[test]
    fn test_project_empty() {
        let empty: Vec<Reading> = Vec::new();
        assert!(project(&empty, &TimezoneHandler::new("UTC")).is_empty());
    }
}
