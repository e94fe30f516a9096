//! Typed indicator records and the CSV loader that produces them.

use std::{ops::RangeInclusive, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Settings;

/// Fiscal years accepted from input files and horizons.
pub const YEAR_RANGE: RangeInclusive<i32> = 1..=9999;

/// One row of the unified dataset, reduced to the fields forecasting needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub indicator: String,
    #[serde(
        rename = "fiscal_year",
        default,
        deserialize_with = "deserialize_year"
    )]
    pub year: Option<i32>,
    #[serde(rename = "value_numeric", default)]
    pub value: Option<f64>,
    #[serde(rename = "source_name", default)]
    pub source: Option<String>,
    #[serde(default)]
    pub record_type: Option<String>,
}

impl Record {
    /// Observation with a year, value and source label.
    pub fn observation(indicator: &str, year: i32, value: f64, source: &str) -> Self {
        Self {
            indicator: indicator.to_string(),
            year: Some(year),
            value: Some(value),
            source: Some(source.to_string()),
            record_type: Some("observation".to_string()),
        }
    }

    /// Event marker without a numeric value.
    pub fn event(indicator: &str, year: Option<i32>) -> Self {
        Self {
            indicator: indicator.to_string(),
            year,
            value: None,
            source: None,
            record_type: Some("event".to_string()),
        }
    }

    /// Whether the row marks an event rather than a measurement.
    pub fn is_event(&self) -> bool {
        self.record_type
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("event"))
    }

    fn validate(&self) -> Result<()> {
        if self.indicator.trim().is_empty() {
            bail!("record has an empty indicator name");
        }
        if let Some(value) = self.value {
            if !value.is_finite() {
                bail!(
                    "indicator '{}' has non-finite value {value}",
                    self.indicator
                );
            }
        }
        Ok(())
    }
}

/// Accept `2024`, `2024.0` or an empty cell.
fn deserialize_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let year = match trimmed.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => match trimmed.parse::<f64>() {
            Ok(value) if value.fract() == 0.0 && in_year_range(value) => Some(value as i32),
            _ => None,
        },
    };
    match year {
        Some(year) if YEAR_RANGE.contains(&year) => Ok(Some(year)),
        _ => Err(serde::de::Error::custom(format!(
            "invalid fiscal year '{trimmed}'"
        ))),
    }
}

fn in_year_range(value: f64) -> bool {
    value >= f64::from(*YEAR_RANGE.start()) && value <= f64::from(*YEAR_RANGE.end())
}

/// Read every record from one CSV file.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<Record>().enumerate() {
        let row = result.with_context(|| format!("{} row {}", path.display(), idx + 1))?;
        row.validate()
            .with_context(|| format!("{} row {}", path.display(), idx + 1))?;
        rows.push(row);
    }
    debug!(path = %path.display(), rows = rows.len(), "read record file");
    Ok(rows)
}

/// Load all record CSVs under `DATA_DIR/records`.
pub fn load_records(settings: &Settings) -> Result<Vec<Record>> {
    let root = settings.join_data("records");
    let mut rows = Vec::new();
    if !root.exists() {
        warn!(path = %root.display(), "records directory missing");
        return Ok(rows);
    }
    let mut files: Vec<_> = WalkDir::new(&root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("csv"))
        .collect();
    files.sort();
    for path in &files {
        rows.extend(read_csv(path)?);
    }
    info!(files = files.len(), rows = rows.len(), "loaded records");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_float_years_and_empty_cells() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "indicator,fiscal_year,value_numeric,source_name,record_type\n\
             Account Ownership Rate,2021.0,46,Global Findex,observation\n\
             Telebirr Launch,,,,event"
        )
        .unwrap();
        let rows = read_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, Some(2021));
        assert_eq!(rows[0].value, Some(46.0));
        assert_eq!(rows[1].year, None);
        assert_eq!(rows[1].value, None);
        assert_eq!(rows[1].source, None);
        assert!(rows[1].is_event());
        assert!(!rows[0].is_event());
    }

    #[test]
    fn rejects_out_of_range_years() {
        for year in ["1e10", "10000000000", "-5", "99999.0"] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(
                file,
                "indicator,fiscal_year,value_numeric,source_name,record_type\n\
                 Account Ownership Rate,{year},46,Global Findex,observation"
            )
            .unwrap();
            let err = read_csv(file.path()).unwrap_err();
            assert!(
                format!("{err:#}").contains("invalid fiscal year"),
                "{year}: {err:#}"
            );
        }
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "indicator,fiscal_year,value_numeric,source_name,record_type\n\
             Account Ownership Rate,2021,NaN,Global Findex,observation"
        )
        .unwrap();
        let err = read_csv(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("non-finite"));
    }
}
