//! Least-squares trend of volume over hour of day.

use water_core::models::{ScatterPoint, Trend, TrendLine, TrendPoint, TrendUnavailable};

/// Fit `volume = slope * hour + intercept` by ordinary least squares.
///
/// Returns [`TrendUnavailable::TooFewPoints`] for fewer than two points,
/// [`TrendUnavailable::ZeroHourVariance`] when every point shares one hour
/// (the slope is then 0/0), and [`TrendUnavailable::NonFinite`] when the
/// volumes are large enough to push the fit out of `f64` range.
pub fn fit_line(points: &[ScatterPoint]) -> Result<TrendLine, TrendUnavailable> {
    if points.len() < 2 {
        return Err(TrendUnavailable::TooFewPoints {
            count: points.len(),
        });
    }

    // Centred sums: means are accumulated incrementally so no raw volume
    // sum is ever formed.
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    for (i, p) in points.iter().enumerate() {
        let k = (i + 1) as f64;
        mean_x += (p.hour as f64 - mean_x) / k;
        mean_y += (p.volume - mean_y) / k;
    }

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for p in points {
        let dx = p.hour as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (p.volume - mean_y);
    }

    // Identical hours give an exact mean, so sxx is exactly zero.
    if sxx == 0.0 {
        return Err(TrendUnavailable::ZeroHourVariance);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(TrendUnavailable::NonFinite);
    }
    Ok(TrendLine { slope, intercept })
}

/// Fit a trend and evaluate it at each point's own hour.
pub fn estimate(points: &[ScatterPoint]) -> Trend {
    let line = match fit_line(points) {
        Ok(line) => line,
        Err(reason) => return Trend::unavailable(reason),
    };
    let fitted: Vec<TrendPoint> = points
        .iter()
        .map(|p| TrendPoint {
            hour: p.hour,
            predicted_volume: line.predict(p.hour),
        })
        .collect();
    if fitted.iter().any(|p| !p.predicted_volume.is_finite()) {
        return Trend::unavailable(TrendUnavailable::NonFinite);
    }
    Trend::Available {
        line,
        points: fitted,
    }
}
