//! Which series to forecast, from which indicators, with which overlay.

use std::path::Path;

use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{generator::ModelKind, overlay::EventOverlay, select::Series};
use crate::{
    data::records::Record,
    error::{ForecastError, Result},
};

/// Forecast configuration for one reported series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPlan {
    /// Name written to the `series` column.
    pub label: String,
    /// Indicator names tried in order; the first with any history wins.
    pub indicators: Vec<String>,
    #[serde(default = "default_model")]
    pub model: ModelKind,
    #[serde(default)]
    pub overlay: OverlayRule,
}

fn default_model() -> ModelKind {
    ModelKind::Bounded
}

/// Caller-chosen rule deciding the event-augmented path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayRule {
    #[default]
    None,
    /// Interpolate towards the latest record from a matching source.
    TargetRecord { source_pattern: String },
    /// Add fixed offsets when any event record's indicator matches the pattern.
    EventOffsets {
        event_pattern: String,
        offsets: Vec<f64>,
    },
}

impl OverlayRule {
    /// Resolve the overlay for `indicator` given its truncated history.
    ///
    /// Returns `None` when no qualifying auxiliary record exists.
    pub fn resolve(
        &self,
        records: &[Record],
        indicator: &str,
        history: &Series,
    ) -> Result<Option<EventOverlay>> {
        match self {
            Self::None => Ok(None),
            Self::TargetRecord { source_pattern } => {
                let pattern = compile(source_pattern)?;
                let target = records
                    .iter()
                    .filter(|r| r.indicator == indicator)
                    .filter(|r| r.source.as_deref().is_some_and(|s| pattern.is_match(s)))
                    .filter_map(|r| Some((r.year?, r.value?)))
                    .max_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
                let (Some((target_year, target_value)), Some((last_year, last_value))) =
                    (target, history.last())
                else {
                    return Ok(None);
                };
                Ok(Some(EventOverlay::Target {
                    last_year,
                    last_value,
                    target_year,
                    target_value,
                }))
            }
            Self::EventOffsets {
                event_pattern,
                offsets,
            } => {
                let pattern = compile(event_pattern)?;
                let triggered = records
                    .iter()
                    .any(|r| r.is_event() && pattern.is_match(&r.indicator));
                Ok(triggered.then(|| EventOverlay::Offsets(offsets.clone())))
            }
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| ForecastError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

/// Access and digital-payment series forecast by default.
pub fn default_plan() -> Vec<SeriesPlan> {
    vec![
        SeriesPlan {
            label: "Account Ownership Rate".to_string(),
            indicators: vec!["Account Ownership Rate".to_string()],
            model: ModelKind::Bounded,
            overlay: OverlayRule::TargetRecord {
                source_pattern: "NFIS".to_string(),
            },
        },
        SeriesPlan {
            label: "Digital Payment Usage (proxy)".to_string(),
            indicators: vec![
                "Mobile Money Account Rate".to_string(),
                "Mobile Money Activity Rate".to_string(),
            ],
            model: ModelKind::Bounded,
            overlay: OverlayRule::EventOffsets {
                event_pattern: "Fayda|Instant Payment System|QR Code".to_string(),
                offsets: vec![5.0, 3.0, 2.0],
            },
        },
    ]
}

/// Read a JSON plan file (an array of [`SeriesPlan`]).
pub fn load_plan<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<SeriesPlan>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading plan {}", path.display()))?;
    let plans: Vec<SeriesPlan> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing plan {}", path.display()))?;
    for plan in &plans {
        anyhow::ensure!(
            !plan.indicators.is_empty(),
            "plan '{}' lists no indicators",
            plan.label
        );
    }
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_json_uses_snake_case_tags() {
        let raw = r#"[{
            "label": "Access",
            "indicators": ["Account Ownership Rate"],
            "overlay": {"kind": "target_record", "source_pattern": "NFIS"}
        }]"#;
        let plans: Vec<SeriesPlan> = serde_json::from_str(raw).unwrap();
        assert_eq!(plans[0].model, ModelKind::Bounded);
        assert_eq!(
            plans[0].overlay,
            OverlayRule::TargetRecord {
                source_pattern: "NFIS".to_string()
            }
        );
    }

    #[test]
    fn missing_overlay_defaults_to_none() {
        let raw = r#"[{"label": "A", "indicators": ["A"], "model": "linear"}]"#;
        let plans: Vec<SeriesPlan> = serde_json::from_str(raw).unwrap();
        assert_eq!(plans[0].overlay, OverlayRule::None);
        assert_eq!(plans[0].model, ModelKind::Linear);
    }

    #[test]
    fn target_record_picks_latest_year() {
        let records = vec![
            Record::observation("Account Ownership Rate", 2025, 70.0, "NFIS-II"),
            Record::observation("Account Ownership Rate", 2030, 75.0, "NFIS-II"),
            Record::observation("Account Ownership Rate", 2024, 49.0, "Global Findex"),
        ];
        let history = Series::new("Account Ownership Rate", vec![(2021, 46.0), (2024, 49.0)]);
        let rule = OverlayRule::TargetRecord {
            source_pattern: "NFIS".to_string(),
        };
        let overlay = rule
            .resolve(&records, "Account Ownership Rate", &history)
            .unwrap();
        assert_eq!(
            overlay,
            Some(EventOverlay::Target {
                last_year: 2024,
                last_value: 49.0,
                target_year: 2030,
                target_value: 75.0,
            })
        );
    }

    #[test]
    fn event_offsets_need_a_matching_event() {
        let rule = OverlayRule::EventOffsets {
            event_pattern: "Fayda".to_string(),
            offsets: vec![1.0],
        };
        let history = Series::new("X", vec![]);
        let none = rule.resolve(&[Record::event("Telebirr", None)], "X", &history);
        assert_eq!(none.unwrap(), None);
        let some = rule.resolve(&[Record::event("Fayda Digital ID", None)], "X", &history);
        assert_eq!(some.unwrap(), Some(EventOverlay::Offsets(vec![1.0])));
    }

    #[test]
    fn measurements_never_trigger_event_offsets() {
        let rule = OverlayRule::EventOffsets {
            event_pattern: "QR Code".to_string(),
            offsets: vec![1.0],
        };
        let records = vec![Record::observation("QR Code Payments", 2024, 3.0, "NBE")];
        let overlay = rule.resolve(&records, "X", &Series::new("X", vec![]));
        assert_eq!(overlay.unwrap(), None);
    }

    #[test]
    fn bad_pattern_is_reported() {
        let rule = OverlayRule::EventOffsets {
            event_pattern: "(".to_string(),
            offsets: vec![],
        };
        let err = rule
            .resolve(&[], "X", &Series::new("X", vec![]))
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidPattern { .. }));
    }
}
