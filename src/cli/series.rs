//! CLI entry-point for inspecting a selected series.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{cli, config::Settings, data::records};

/// Args for the `series` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Indicator name as it appears in the records.
    #[arg(long)]
    pub indicator: String,
    /// Drop observations after this year.
    #[arg(long)]
    pub until: Option<i32>,
    /// Override the authoritative source regex.
    #[arg(long)]
    pub authoritative: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let records = records::load_records(&settings)?;
    let selector = cli::selector(&settings, args.authoritative.as_deref())?;
    let (mut series, choice) = selector.select(&records, &args.indicator)?;
    if let Some(until) = args.until {
        series = series.truncate_after(until);
    }
    println!("{} ({choice:?}, {} points)", series.name, series.len());
    for (year, value) in &series.points {
        println!("{year}\t{value}");
    }
    Ok(())
}
