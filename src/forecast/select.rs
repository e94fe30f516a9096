//! Resolve one clean annual series from a mixed-source record collection.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use crate::{
    data::records::Record,
    error::{ForecastError, Result},
};

/// Ordered `(year, value)` pairs for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(i32, f64)>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(i32, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn years(&self) -> Vec<f64> {
        self.points.iter().map(|(year, _)| f64::from(*year)).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }

    /// Latest observation, used as the anchor of target interpolation.
    pub fn last(&self) -> Option<(i32, f64)> {
        self.points.last().copied()
    }

    /// Drop observations dated after `year`.
    pub fn truncate_after(mut self, year: i32) -> Self {
        self.points.retain(|(y, _)| *y <= year);
        self
    }
}

/// Which record pool a selection was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceChoice {
    /// At least one record matched the authoritative source pattern.
    Authoritative,
    /// No authoritative record existed, so every source was accepted.
    AllSources,
}

/// Selection rule: indicator match, source preference, max-per-year collapse.
#[derive(Debug, Clone)]
pub struct SeriesSelector {
    authoritative: Regex,
}

impl SeriesSelector {
    pub fn new(authoritative: Regex) -> Self {
        Self { authoritative }
    }

    /// Build a selector from a source pattern such as `Global Findex`.
    pub fn from_pattern(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self::new(Regex::new(pattern)?))
    }

    /// Select the series for `indicator`.
    ///
    /// Fails with [`ForecastError::DataNotFound`] only when no record carries
    /// the indicator at all; an empty series is a valid result.
    pub fn select(&self, records: &[Record], indicator: &str) -> Result<(Series, SourceChoice)> {
        let matched: Vec<&Record> = records
            .iter()
            .filter(|r| r.indicator == indicator)
            .collect();
        if matched.is_empty() {
            return Err(ForecastError::DataNotFound {
                indicator: indicator.to_string(),
            });
        }

        let preferred: Vec<&Record> = matched
            .iter()
            .copied()
            .filter(|r| {
                r.source
                    .as_deref()
                    .is_some_and(|s| self.authoritative.is_match(s))
            })
            .collect();
        let (pool, choice) = if preferred.is_empty() {
            (matched, SourceChoice::AllSources)
        } else {
            (preferred, SourceChoice::Authoritative)
        };

        let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
        for record in pool {
            let (Some(year), Some(value)) = (record.year, record.value) else {
                continue;
            };
            by_year
                .entry(year)
                .and_modify(|current| *current = current.max(value))
                .or_insert(value);
        }

        let series = Series::new(indicator, by_year.into_iter().collect());
        Ok((series, choice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> SeriesSelector {
        SeriesSelector::from_pattern("Global Findex").unwrap()
    }

    #[test]
    fn sorts_unordered_input() {
        let records = vec![
            Record::observation("X", 2021, 46.0, "Global Findex"),
            Record::observation("X", 2014, 22.0, "Global Findex"),
            Record::observation("X", 2017, 35.0, "Global Findex"),
        ];
        let (series, _) = selector().select(&records, "X").unwrap();
        assert_eq!(series.points, vec![(2014, 22.0), (2017, 35.0), (2021, 46.0)]);
    }

    #[test]
    fn records_without_year_or_value_are_dropped() {
        let mut undated = Record::observation("X", 2020, 10.0, "Survey");
        undated.year = None;
        let records = vec![undated, Record::event("X", Some(2022))];
        let (series, choice) = selector().select(&records, "X").unwrap();
        assert!(series.is_empty());
        assert_eq!(choice, SourceChoice::AllSources);
    }

    #[test]
    fn truncate_after_keeps_cutoff_year() {
        let series = Series::new("X", vec![(2021, 1.0), (2024, 2.0), (2025, 3.0)]);
        assert_eq!(series.truncate_after(2024).last(), Some((2024, 2.0)));
    }
}
