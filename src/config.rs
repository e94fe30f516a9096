//! Runtime configuration utilities for fi-forecast.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::data::records::YEAR_RANGE;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder holding the record CSVs (under `records/`).
    pub data_dir: PathBuf,
    /// Root folder for forecast reports.
    pub outputs_dir: PathBuf,
    /// Years forecast when the CLI does not override them.
    pub forecast_years: Vec<i32>,
    /// Regex marking the preferred source of historical observations.
    pub authoritative_source: String,
    /// Number of series fitted concurrently.
    pub concurrency: usize,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let forecast_years = match env::var("FORECAST_YEARS") {
            Ok(raw) => parse_years(&raw).context("parsing FORECAST_YEARS")?,
            Err(_) => vec![2025, 2026, 2027],
        };
        let authoritative_source =
            env::var("AUTHORITATIVE_SOURCE").unwrap_or_else(|_| "Global Findex".to_string());
        let concurrency = env::var("FORECAST_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(4);

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            data_dir,
            outputs_dir,
            forecast_years,
            authoritative_source,
            concurrency,
        })
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

/// Parse a comma separated list of years such as `2025,2026,2027`.
pub fn parse_years(raw: &str) -> anyhow::Result<Vec<i32>> {
    let mut years = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let year: i32 = part
            .parse()
            .with_context(|| format!("invalid year '{part}'"))?;
        if !YEAR_RANGE.contains(&year) {
            bail!("year {year} outside {YEAR_RANGE:?}");
        }
        years.push(year);
    }
    if years.is_empty() {
        bail!("no years given");
    }
    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_list_with_spaces() {
        assert_eq!(parse_years("2025, 2026,2027").unwrap(), vec![2025, 2026, 2027]);
    }

    #[test]
    fn rejects_garbage_years() {
        assert!(parse_years("2025,next").is_err());
        assert!(parse_years(" , ").is_err());
        assert!(parse_years("2025,-2147483648").is_err());
    }
}
