//! CLI entry-point comparing the two trend families on one indicator.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli,
    config::Settings,
    data::records,
    error::ForecastError,
    forecast::{generator, MIN_FIT_POINTS},
};

/// Args for the `compare` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Indicator name as it appears in the records.
    #[arg(long)]
    pub indicator: String,
    /// Target years; defaults to FORECAST_YEARS.
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = clap::value_parser!(i32).range(1..=9999)
    )]
    pub years: Vec<i32>,
    /// Override the authoritative source regex.
    #[arg(long)]
    pub authoritative: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let records = records::load_records(&settings)?;
    let selector = cli::selector(&settings, args.authoritative.as_deref())?;
    let years = if args.years.is_empty() {
        settings.forecast_years.clone()
    } else {
        args.years.clone()
    };
    let first_year = *years.iter().min().ok_or(ForecastError::EmptyHorizon)?;

    let (series, _) = selector.select(&records, &args.indicator)?;
    let series = series.truncate_after(first_year.saturating_sub(1));
    if series.len() < MIN_FIT_POINTS {
        return Err(ForecastError::InsufficientData {
            series: args.indicator.clone(),
            required: MIN_FIT_POINTS,
            actual: series.len(),
        }
        .into());
    }

    let rows = generator::compare(&series.name, &series.years(), &series.values(), &years);
    println!("year\tlinear\tlinear_se\tbounded\tbounded_se");
    for row in rows {
        println!(
            "{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
            row.year, row.linear, row.linear_se, row.bounded, row.bounded_se
        );
    }
    Ok(())
}
