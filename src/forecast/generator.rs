//! Turn fitted trends into forecast rows with intervals and scenario bands.

use serde::{Deserialize, Serialize};

use super::{linear::LinearFit, logit::LogitFit};

/// Normal quantile for a two-sided 95% interval.
pub const CI95_Z: f64 = 1.96;

/// Standard errors added/subtracted for the optimistic/pessimistic scenarios.
/// A presentation spread, not a confidence level.
pub const SCENARIO_SE_MULTIPLIER: f64 = 1.5;

/// Trend family used as the reported baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Logit-linear, for indicators bounded to 0-100.
    Bounded,
    /// Unbounded straight line.
    Linear,
}

/// A fitted model of either family.
#[derive(Debug, Clone)]
pub enum TrendModel {
    Bounded(LogitFit),
    Linear(LinearFit),
}

impl TrendModel {
    pub fn fit(kind: ModelKind, years: &[f64], values: &[f64]) -> Self {
        match kind {
            ModelKind::Bounded => Self::Bounded(LogitFit::fit(years, values)),
            ModelKind::Linear => Self::Linear(LinearFit::fit(years, values)),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Bounded(_) => ModelKind::Bounded,
            Self::Linear(_) => ModelKind::Linear,
        }
    }

    /// Estimate and standard error in the series' native units.
    pub fn predict(&self, year: f64) -> (f64, f64) {
        match self {
            Self::Bounded(fit) => fit.predict(year),
            Self::Linear(fit) => fit.predict(year),
        }
    }
}

/// One forecast row for a series and target year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub series: String,
    pub year: i32,
    pub baseline: f64,
    pub ci95_low: f64,
    pub ci95_high: f64,
    pub optimistic: f64,
    pub pessimistic: f64,
    pub event_augmented: Option<f64>,
}

impl ForecastPoint {
    /// Build a row from a point estimate and its standard error.
    pub fn from_estimate(series: &str, year: i32, estimate: f64, se: f64) -> Self {
        let se = se.max(0.0);
        Self {
            series: series.to_string(),
            year,
            baseline: estimate,
            ci95_low: estimate - CI95_Z * se,
            ci95_high: estimate + CI95_Z * se,
            optimistic: estimate + SCENARIO_SE_MULTIPLIER * se,
            pessimistic: estimate - SCENARIO_SE_MULTIPLIER * se,
            event_augmented: None,
        }
    }

    pub fn with_event_augmented(self, value: Option<f64>) -> Self {
        Self {
            event_augmented: value,
            ..self
        }
    }
}

/// Evaluate `model` at each target year.
pub fn generate(series: &str, model: &TrendModel, years: &[i32]) -> Vec<ForecastPoint> {
    years
        .iter()
        .map(|&year| {
            let (estimate, se) = model.predict(f64::from(year));
            ForecastPoint::from_estimate(series, year, estimate, se)
        })
        .collect()
}

/// Linear and bounded predictions side by side for one target year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparison {
    pub series: String,
    pub year: i32,
    pub linear: f64,
    pub linear_se: f64,
    pub bounded: f64,
    pub bounded_se: f64,
}

/// Fit both families on the same history and predict the target years.
pub fn compare(
    series: &str,
    years_hist: &[f64],
    values: &[f64],
    years: &[i32],
) -> Vec<ModelComparison> {
    let linear = LinearFit::fit(years_hist, values);
    let bounded = LogitFit::fit(years_hist, values);
    years
        .iter()
        .map(|&year| {
            let (lin, lin_se) = linear.predict(f64::from(year));
            let (bnd, bnd_se) = bounded.predict(f64::from(year));
            ModelComparison {
                series: series.to_string(),
                year,
                linear: lin,
                linear_se: lin_se,
                bounded: bnd,
                bounded_se: bnd_se,
            }
        })
        .collect()
}
