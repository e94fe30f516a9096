//! Command-line interface wiring for fi-forecast.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::{config::Settings, forecast::SeriesSelector};

pub mod compare;
pub mod forecast;
pub mod series;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Financial inclusion indicator forecaster", long_about = None)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Default tracing directive for this invocation.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "info,fi_forecast=debug"
        } else {
            "info"
        }
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Forecast(args) => forecast::run(args, settings).await,
            Commands::Series(args) => series::run(args, settings).await,
            Commands::Compare(args) => compare::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Forecast every series in the plan and write the report.
    Forecast(forecast::Args),
    /// Show the history selected for one indicator.
    Series(series::Args),
    /// Compare linear and bounded trend predictions for one indicator.
    Compare(compare::Args),
}

/// File format of the forecast report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Parquet => "parquet",
        }
    }
}

/// Selector from an explicit pattern or the configured authoritative source.
pub(crate) fn selector(settings: &Settings, pattern: Option<&str>) -> Result<SeriesSelector> {
    let pattern = pattern.unwrap_or(&settings.authoritative_source);
    SeriesSelector::from_pattern(pattern)
        .with_context(|| format!("compiling authoritative source pattern '{pattern}'"))
}
