//! Trend line
//!
//! Ordinary least squares of value against sample index (0, 1, 2, ...),
//! the same fit the chart overlays on its scatter of readings.

use serde::Serialize;

use crate::reading::TemperatureUnit;
use crate::store::Snapshot;

/// Fitted line `y = slope * x + intercept` over the history window
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
    /// Line value at each sample index, oldest first
    pub fitted: Vec<f64>,
    /// Coefficient of determination, `None` when all values are equal
    pub r_squared: Option<f64>,
}

impl Trend {
    /// Fit a line through `values`. Needs at least two points.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }

        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / n_f;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        let mut syy = 0.0;
        for (i, y) in values.iter().enumerate() {
            let dx = i as f64 - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let fitted = (0..n).map(|i| slope * i as f64 + intercept).collect();
        let r_squared = if syy > 0.0 {
            Some((sxy * sxy) / (sxx * syy))
        } else {
            None
        };

        Some(Self {
            slope,
            intercept,
            fitted,
            r_squared,
        })
    }

    /// Chart annotation, e.g. `"y = 0.25x + 33.10"`
    pub fn label(&self) -> String {
        format!("y = {:.2}x + {:.2}", self.slope, self.intercept)
    }
}

/// Trend of the snapshot history in `unit`
pub fn trend(snapshot: &Snapshot, unit: TemperatureUnit) -> Option<Trend> {
    let values: Vec<f64> = snapshot.history.iter().map(|r| r.value_in(unit)).collect();
    Trend::fit(&values)
}
