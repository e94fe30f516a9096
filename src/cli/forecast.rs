//! CLI entry-point for the full forecast run.

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{
    cli::{self, OutputFormat},
    config::Settings,
    data::records,
    forecast::{self, plan, ForecastPoint},
    report,
};

/// Args for the `forecast` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// JSON plan file; the built-in access/digital plan is used when omitted.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Target years (e.g., 2025,2026,2027); defaults to FORECAST_YEARS.
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = clap::value_parser!(i32).range(1..=9999)
    )]
    pub years: Vec<i32>,
    /// Report format.
    #[arg(long, default_value = "csv", value_enum)]
    pub format: OutputFormat,
    /// Report path; defaults to OUTPUTS_DIR/forecasts.<ext>.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Override the authoritative source regex.
    #[arg(long)]
    pub authoritative: Option<String>,
    /// Skip series that cannot be forecast instead of failing the run.
    #[arg(long)]
    pub allow_partial: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let records = Arc::new(records::load_records(&settings)?);
    let plans = match &args.plan {
        Some(path) => plan::load_plan(path)?,
        None => plan::default_plan(),
    };
    let years = if args.years.is_empty() {
        settings.forecast_years.clone()
    } else {
        args.years.clone()
    };
    let selector = cli::selector(&settings, args.authoritative.as_deref())?;

    info!(series = plans.len(), ?years, "running forecast plan");
    let outcomes = forecast::run(records, selector, plans, years, settings.concurrency).await?;

    let mut forecasts = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(forecast) => forecasts.push(forecast),
            Err(err) => failures.push(format!("{}: {err}", outcome.label)),
        }
    }
    if !failures.is_empty() && !args.allow_partial {
        bail!("{} series failed: {}", failures.len(), failures.join("; "));
    }

    // Year-major order, plan order within a year.
    let mut rows: Vec<ForecastPoint> = forecasts
        .iter()
        .flat_map(|f| f.points.iter().cloned())
        .collect();
    rows.sort_by_key(|row| row.year);
    if rows.is_empty() {
        warn!("no forecast rows to persist");
        return Ok(());
    }

    let path = match &args.out {
        Some(path) => path.clone(),
        None => settings.join_output(format!("forecasts.{}", args.format.extension())),
    };
    report::write_rows(&rows, &path, args.format)?;
    print!("{}", report::summary(&forecasts));
    Ok(())
}
