//! Forecasting engine: series selection, trend fits, scenario rows, overlays.

pub mod generator;
pub mod linear;
pub mod logit;
pub mod overlay;
pub mod plan;
pub mod select;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    data::records::Record,
    error::{ForecastError, Result},
};

pub use generator::{ForecastPoint, ModelComparison, ModelKind, TrendModel};
pub use overlay::EventOverlay;
pub use plan::{OverlayRule, SeriesPlan};
pub use select::{Series, SeriesSelector, SourceChoice};

/// Minimum number of distinct years a trend is fitted on.
pub const MIN_FIT_POINTS: usize = 2;

/// Everything produced for one plan entry.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesForecast {
    pub label: String,
    /// Indicator that supplied the history.
    pub indicator: String,
    pub source_choice: SourceChoice,
    pub history: Series,
    pub model: ModelKind,
    pub overlay: Option<EventOverlay>,
    pub points: Vec<ForecastPoint>,
}

/// Result of one plan entry, kept alongside its label.
#[derive(Debug, Clone)]
pub struct SeriesOutcome {
    pub label: String,
    pub result: Result<SeriesForecast>,
}

/// Resolve the history for a plan: walk the indicator chain, keep the first
/// indicator that has observations up to `cutoff`.
pub fn resolve_history(
    records: &[Record],
    selector: &SeriesSelector,
    indicators: &[String],
    cutoff: i32,
) -> Result<(Series, SourceChoice)> {
    let mut fallback = None;
    for indicator in indicators {
        match selector.select(records, indicator) {
            Ok((series, choice)) => {
                let series = series.truncate_after(cutoff);
                if !series.is_empty() {
                    return Ok((series, choice));
                }
                debug!(%indicator, "indicator has no usable history; trying next");
                fallback.get_or_insert((series, choice));
            }
            Err(ForecastError::DataNotFound { .. }) => {
                debug!(%indicator, "indicator not present; trying next");
            }
            Err(err) => return Err(err),
        }
    }
    fallback.ok_or_else(|| ForecastError::DataNotFound {
        indicator: indicators.first().cloned().unwrap_or_default(),
    })
}

/// Fit and forecast one plan entry over `years`.
pub fn forecast_series(
    records: &[Record],
    selector: &SeriesSelector,
    plan: &SeriesPlan,
    years: &[i32],
) -> Result<SeriesForecast> {
    let first_year = *years.iter().min().ok_or(ForecastError::EmptyHorizon)?;
    let (history, source_choice) =
        resolve_history(records, selector, &plan.indicators, first_year.saturating_sub(1))?;

    if history.len() < MIN_FIT_POINTS {
        return Err(ForecastError::InsufficientData {
            series: plan.label.clone(),
            required: MIN_FIT_POINTS,
            actual: history.len(),
        });
    }

    let model = TrendModel::fit(plan.model, &history.years(), &history.values());
    let mut points = generator::generate(&plan.label, &model, years);

    // The overlay is advisory: when it cannot be applied the statistical rows stand alone.
    let baseline: Vec<f64> = points.iter().map(|p| p.baseline).collect();
    let overlay = match plan
        .overlay
        .resolve(records, &history.name, &history)?
        .map(|overlay| overlay.apply(years, &baseline).map(|values| (overlay, values)))
    {
        Some(Ok((overlay, augmented))) => {
            points = points
                .into_iter()
                .zip(augmented)
                .map(|(point, value)| point.with_event_augmented(Some(value)))
                .collect();
            Some(overlay)
        }
        Some(Err(err)) => {
            warn!(series = %plan.label, %err, "event overlay not applied");
            None
        }
        None => None,
    };

    debug!(
        series = %plan.label,
        indicator = %history.name,
        observations = history.len(),
        ?source_choice,
        overlay = overlay.is_some(),
        "forecast series"
    );

    Ok(SeriesForecast {
        label: plan.label.clone(),
        indicator: history.name.clone(),
        source_choice,
        history,
        model: model.kind(),
        overlay,
        points,
    })
}

/// Forecast every plan entry, one blocking task per series, results in plan order.
pub async fn run(
    records: Arc<Vec<Record>>,
    selector: SeriesSelector,
    plans: Vec<SeriesPlan>,
    years: Vec<i32>,
    concurrency: usize,
) -> anyhow::Result<Vec<SeriesOutcome>> {
    let years = Arc::new(years);
    let outcomes = stream::iter(plans)
        .map(|plan| {
            let records = Arc::clone(&records);
            let selector = selector.clone();
            let years = Arc::clone(&years);
            tokio::task::spawn_blocking(move || {
                let result = forecast_series(&records, &selector, &plan, &years);
                SeriesOutcome {
                    label: plan.label,
                    result,
                }
            })
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    for outcome in &outcomes {
        if let Err(err) = &outcome.result {
            warn!(series = %outcome.label, %err, "series forecast failed");
        }
    }
    info!(series = outcomes.len(), failed, "forecast run finished");
    Ok(outcomes)
}
