//! Persist forecast rows and print a console summary.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::prelude::{
    CsvWriter, DataFrame, NamedFrom, ParquetWriter, SerWriter, Series as PlSeries,
};
use tracing::info;

use crate::{
    cli::OutputFormat,
    forecast::{ForecastPoint, SeriesForecast},
};

/// Assemble forecast rows into a frame with the published column order.
pub fn to_frame(rows: &[ForecastPoint]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        PlSeries::new(
            "series".into(),
            rows.iter().map(|r| r.series.clone()).collect::<Vec<_>>(),
        ),
        PlSeries::new(
            "year".into(),
            rows.iter().map(|r| r.year).collect::<Vec<_>>(),
        ),
        PlSeries::new(
            "baseline".into(),
            rows.iter().map(|r| r.baseline).collect::<Vec<_>>(),
        ),
        PlSeries::new(
            "ci95_low".into(),
            rows.iter().map(|r| r.ci95_low).collect::<Vec<_>>(),
        ),
        PlSeries::new(
            "ci95_high".into(),
            rows.iter().map(|r| r.ci95_high).collect::<Vec<_>>(),
        ),
        PlSeries::new(
            "optimistic".into(),
            rows.iter().map(|r| r.optimistic).collect::<Vec<_>>(),
        ),
        PlSeries::new(
            "pessimistic".into(),
            rows.iter().map(|r| r.pessimistic).collect::<Vec<_>>(),
        ),
        PlSeries::new(
            "event_augmented".into(),
            rows.iter().map(|r| r.event_augmented).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

/// Write rows to `path` in the requested format.
pub fn write_rows(rows: &[ForecastPoint], path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        OutputFormat::Csv => {
            let mut df = to_frame(rows)?;
            CsvWriter::new(&mut file).finish(&mut df)?;
        }
        OutputFormat::Parquet => {
            let mut df = to_frame(rows)?;
            ParquetWriter::new(file).finish(&mut df)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(file, rows)?;
        }
    }
    info!(path = %path.display(), rows = rows.len(), ?format, "wrote forecasts");
    Ok(())
}

/// Human-readable digest of a run, one block per series.
pub fn summary(forecasts: &[SeriesForecast]) -> String {
    let mut out = String::new();
    for forecast in forecasts {
        let years: Vec<String> = forecast
            .history
            .points
            .iter()
            .map(|(year, _)| year.to_string())
            .collect();
        out.push_str(&format!(
            "{} ({:?} model, indicator '{}', {:?}; history years [{}])\n",
            forecast.label,
            forecast.model,
            forecast.indicator,
            forecast.source_choice,
            years.join(", ")
        ));
        for point in &forecast.points {
            let event = point
                .event_augmented
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "  {}: baseline {:.1} [{:.1}, {:.1}] scenarios {:.1}/{:.1} event {}\n",
                point.year,
                point.baseline,
                point.ci95_low,
                point.ci95_high,
                point.pessimistic,
                point.optimistic,
                event
            ));
        }
    }
    out
}
