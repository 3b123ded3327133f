// Analyzer profiles
//
// A profile names the columns in which one device model reports each
// logical metric. Phases A and B are required for every family; phase C
// is absent on single-phase devices and imbalance only exists on
// three-phase devices.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::vendor::Vendor;
use crate::metrics::ThresholdRule;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Profile name must not be blank")]
    BlankName,

    #[error("Profile {profile}: column for {metric} must not be blank")]
    BlankColumn { profile: String, metric: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    A,
    B,
    C,
}

impl Phase {
    fn suffix(self) -> &'static str {
        match self {
            Phase::A => "a",
            Phase::B => "b",
            Phase::C => "c",
        }
    }
}

/// Compliance measure independent of the column that reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalMetric {
    VoltageDeviation(Phase),
    Flicker(Phase),
    HarmonicDistortion(Phase),
    Imbalance,
}

impl LogicalMetric {
    /// Key under which the result is stored in the summary record
    pub fn key(self) -> String {
        match self {
            LogicalMetric::VoltageDeviation(phase) => {
                format!("porcentaje_desviacion_voltaje_fase_{}", phase.suffix())
            }
            LogicalMetric::Flicker(phase) => format!("porcentaje_flicker_fase_{}", phase.suffix()),
            LogicalMetric::HarmonicDistortion(phase) => {
                format!("porcentaje_vthd_fase_{}", phase.suffix())
            }
            LogicalMetric::Imbalance => "porcentaje_desbalance".to_string(),
        }
    }

    pub fn rule(self) -> ThresholdRule {
        match self {
            LogicalMetric::VoltageDeviation(_) => ThresholdRule::VoltageDeviation,
            LogicalMetric::Flicker(_) => ThresholdRule::Flicker,
            LogicalMetric::HarmonicDistortion(_) => ThresholdRule::HarmonicDistortion,
            LogicalMetric::Imbalance => ThresholdRule::Imbalance,
        }
    }

    /// Phase A and B metrics must be present in every export
    pub fn is_mandatory(self) -> bool {
        match self {
            LogicalMetric::VoltageDeviation(phase)
            | LogicalMetric::Flicker(phase)
            | LogicalMetric::HarmonicDistortion(phase) => phase != Phase::C,
            LogicalMetric::Imbalance => false,
        }
    }
}

impl fmt::Display for LogicalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Column labels for one metric family, per phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseColumns {
    pub a: String,
    pub b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
}

impl PhaseColumns {
    pub fn new(a: impl Into<String>, b: impl Into<String>, c: Option<&str>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.map(str::to_string),
        }
    }

    fn declared(&self) -> impl Iterator<Item = (Phase, &str)> {
        [
            (Phase::A, Some(self.a.as_str())),
            (Phase::B, Some(self.b.as_str())),
            (Phase::C, self.c.as_deref()),
        ]
        .into_iter()
        .filter_map(|(phase, column)| column.map(|c| (phase, c)))
    }
}

/// Per-device configuration mapping logical metrics to column labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerProfile {
    pub name: String,
    pub vendor: Vendor,
    pub voltage: PhaseColumns,
    pub flicker: PhaseColumns,
    pub thd: PhaseColumns,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imbalance: Option<String>,
}

impl AnalyzerProfile {
    /// Every metric this profile declares with its column label
    ///
    /// Order: voltage, flicker, distortion (phases A, B, then C when
    /// declared), then imbalance when declared.
    pub fn metric_columns(&self) -> Vec<(LogicalMetric, &str)> {
        let mut columns: Vec<(LogicalMetric, &str)> = Vec::new();
        columns.extend(
            self.voltage
                .declared()
                .map(|(phase, c)| (LogicalMetric::VoltageDeviation(phase), c)),
        );
        columns.extend(
            self.flicker
                .declared()
                .map(|(phase, c)| (LogicalMetric::Flicker(phase), c)),
        );
        columns.extend(
            self.thd
                .declared()
                .map(|(phase, c)| (LogicalMetric::HarmonicDistortion(phase), c)),
        );
        if let Some(column) = self.imbalance.as_deref() {
            columns.push((LogicalMetric::Imbalance, column));
        }
        columns
    }

    pub fn is_three_phase(&self) -> bool {
        self.voltage.c.is_some()
    }

    /// Reject blank names and blank column labels
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::BlankName);
        }

        for (metric, column) in self.metric_columns() {
            if column.trim().is_empty() {
                return Err(ProfileError::BlankColumn {
                    profile: self.name.clone(),
                    metric: metric.key(),
                });
            }
        }

        Ok(())
    }
}
