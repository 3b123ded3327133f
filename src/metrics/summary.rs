use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::evaluator::{MetricResult, ScreeningResult};

/// Summary of one analyzed export, persisted verbatim
///
/// Profile metrics are keyed by logical metric key (for example
/// `porcentaje_desviacion_voltaje_fase_a`) and serialize at the top level.
/// Screening results, when requested, are keyed by raw column label under
/// `screening`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(flatten)]
    pub metrics: BTreeMap<String, MetricResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screening: Option<BTreeMap<String, ScreeningResult>>,
}

impl SummaryRecord {
    pub fn screening_only(screening: BTreeMap<String, ScreeningResult>) -> Self {
        Self {
            metrics: BTreeMap::new(),
            screening: Some(screening),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetricResult> {
        self.metrics.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.screening.as_ref().map_or(true, BTreeMap::is_empty)
    }
}
