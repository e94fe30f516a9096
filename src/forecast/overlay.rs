//! Event-augmented path: an advisory overlay next to the statistical baseline.

use serde::Serialize;

use crate::error::{ForecastError, Result};

/// How the event-augmented path is derived for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventOverlay {
    /// Straight line from the last observation to an asserted target,
    /// flat before the first anchor and after the second.
    Target {
        last_year: i32,
        last_value: f64,
        target_year: i32,
        target_value: f64,
    },
    /// Fixed additive offsets, one per forecast year in horizon order.
    Offsets(Vec<f64>),
}

impl EventOverlay {
    /// Overlay values aligned with `years` and `baseline`.
    pub fn apply(&self, years: &[i32], baseline: &[f64]) -> Result<Vec<f64>> {
        match self {
            Self::Target {
                last_year,
                last_value,
                target_year,
                target_value,
            } => {
                let last = (*last_year, *last_value);
                let target = (*target_year, *target_value);
                Ok(years.iter().map(|&y| interpolate(y, last, target)).collect())
            }
            Self::Offsets(offsets) => {
                if offsets.len() != baseline.len() {
                    return Err(ForecastError::OffsetMismatch {
                        expected: baseline.len(),
                        actual: offsets.len(),
                    });
                }
                Ok(baseline
                    .iter()
                    .zip(offsets)
                    .map(|(base, offset)| base + offset)
                    .collect())
            }
        }
    }
}

/// Piecewise-linear path between two anchors, clamped outside them.
pub fn interpolate(year: i32, last: (i32, f64), target: (i32, f64)) -> f64 {
    let (last_year, last_value) = last;
    let (target_year, target_value) = target;
    if year <= last_year {
        last_value
    } else if year >= target_year {
        target_value
    } else {
        let frac = (f64::from(year) - f64::from(last_year))
            / (f64::from(target_year) - f64::from(last_year));
        last_value + frac * (target_value - last_value)
    }
}
