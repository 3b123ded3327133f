use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::table::NumericTable;
use crate::utils::round_to;

/// Upper bound of the permitted voltage band (V)
pub const VOLTAGE_UPPER_LIMIT: f64 = 129.5;
/// Lower bound of the permitted voltage band (V)
pub const VOLTAGE_LOWER_LIMIT: f64 = 110.4;
/// Short-term flicker severity ceiling (Pst)
pub const FLICKER_LIMIT: f64 = 1.0;
/// Total harmonic distortion ceiling (%)
pub const HARMONIC_DISTORTION_LIMIT: f64 = 8.0;
/// Voltage imbalance ceiling (%)
pub const IMBALANCE_LIMIT: f64 = 2.0;

pub const DEFAULT_SCREENING_THRESHOLD: f64 = 0.0;
/// Conventional per-order limit used when screening harmonic tables
pub const HARMONIC_SCREENING_THRESHOLD: f64 = 5.0;

const METRIC_DECIMALS: u32 = 4;
const SCREENING_DECIMALS: u32 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Column has no rows: {0}")]
    EmptyColumn(String),
}

/// Count and share of rows violating a threshold rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub count: usize,
    /// Share of rows in [0, 100], rounded to 4 decimals
    pub percentage: f64,
}

/// Per-column result of screening mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    #[serde(rename = "conteo")]
    pub count: usize,
    /// Share of rows in [0, 100], rounded to 5 decimals
    #[serde(rename = "porcentaje")]
    pub percentage: f64,
}

/// Regulatory threshold test for one metric family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdRule {
    VoltageDeviation,
    Flicker,
    HarmonicDistortion,
    Imbalance,
}

impl ThresholdRule {
    pub fn is_violation(self, value: f64) -> bool {
        match self {
            ThresholdRule::VoltageDeviation => {
                value > VOLTAGE_UPPER_LIMIT || value < VOLTAGE_LOWER_LIMIT
            }
            ThresholdRule::Flicker => value > FLICKER_LIMIT,
            ThresholdRule::HarmonicDistortion => value > HARMONIC_DISTORTION_LIMIT,
            ThresholdRule::Imbalance => value > IMBALANCE_LIMIT,
        }
    }
}

/// Apply `rule` to the column labeled `column`
pub fn evaluate_column(
    table: &NumericTable,
    column: &str,
    rule: ThresholdRule,
) -> Result<MetricResult, MetricError> {
    let values = table
        .column(column)
        .ok_or_else(|| MetricError::MissingColumn(column.to_string()))?;

    if values.is_empty() {
        return Err(MetricError::EmptyColumn(column.to_string()));
    }

    let count = values.iter().filter(|v| rule.is_violation(**v)).count();
    let percentage = count as f64 / values.len() as f64 * 100.0;

    Ok(MetricResult {
        count,
        percentage: round_to(percentage, METRIC_DECIMALS),
    })
}

/// Share of rows outside the 110.4 V .. 129.5 V band
pub fn voltage_deviation_pct(table: &NumericTable, column: &str) -> Option<MetricResult> {
    evaluate_column(table, column, ThresholdRule::VoltageDeviation).ok()
}

/// Share of rows with flicker above 1
pub fn flicker_pct(table: &NumericTable, column: &str) -> Option<MetricResult> {
    evaluate_column(table, column, ThresholdRule::Flicker).ok()
}

/// Share of rows with distortion above 8 %
pub fn harmonic_distortion_pct(table: &NumericTable, column: &str) -> Option<MetricResult> {
    evaluate_column(table, column, ThresholdRule::HarmonicDistortion).ok()
}

/// Share of rows with imbalance above 2 %
pub fn imbalance_pct(table: &NumericTable, column: &str) -> Option<MetricResult> {
    evaluate_column(table, column, ThresholdRule::Imbalance).ok()
}

/// Screening mode: count values above `threshold` in every column
///
/// Used for harmonic-order tables where each column is an order rather
/// than a phase. A table without rows reports 0 for every column.
pub fn screen_columns(table: &NumericTable, threshold: f64) -> BTreeMap<String, ScreeningResult> {
    let total_rows = table.height();

    let mut results = BTreeMap::new();
    for (label, values) in table.columns() {
        if results.contains_key(label) {
            continue;
        }
        let count = values.iter().filter(|v| **v > threshold).count();
        let percentage = if total_rows == 0 {
            0.0
        } else {
            round_to(count as f64 / total_rows as f64 * 100.0, SCREENING_DECIMALS)
        };
        results.insert(label.to_string(), ScreeningResult { count, percentage });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(label: &str, values: Vec<f64>) -> NumericTable {
        NumericTable::new(vec![label.to_string()], vec![values])
    }

    #[test]
    fn test_voltage_deviation_counts_both_sides_of_band() {
        let values = vec![
            130.0, 131.2, 140.0, 100.0, 120.0, 121.0, 119.5, 125.0, 110.4, 129.5,
        ];
        let result = voltage_deviation_pct(&table("U", values), "U").unwrap();
        assert_eq!(result.count, 4);
        assert_eq!(result.percentage, 40.0);
    }

    #[test]
    fn test_flicker_above_one() {
        let result = flicker_pct(&table("Pst", vec![0.5, 1.5, 2.0, 0.9]), "Pst").unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(result.percentage, 50.0);
    }

    #[test]
    fn test_harmonic_distortion_above_eight() {
        let result =
            harmonic_distortion_pct(&table("THD", vec![8.0, 8.1, 3.0]), "THD").unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.percentage, 33.3333);
    }

    #[test]
    fn test_imbalance_above_two() {
        let result = imbalance_pct(&table("U2", vec![2.5, 1.0, 2.0]), "U2").unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.percentage, 33.3333);
    }

    #[test]
    fn test_missing_column_is_none() {
        assert!(flicker_pct(&table("Pst", vec![1.5]), "Plt").is_none());
        assert_eq!(
            evaluate_column(&table("Pst", vec![1.5]), "Plt", ThresholdRule::Flicker),
            Err(MetricError::MissingColumn("Plt".to_string()))
        );
    }

    #[test]
    fn test_empty_column_is_none() {
        assert!(voltage_deviation_pct(&table("U", vec![]), "U").is_none());
        assert_eq!(
            evaluate_column(&table("U", vec![]), "U", ThresholdRule::VoltageDeviation),
            Err(MetricError::EmptyColumn("U".to_string()))
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let t = table("U", vec![100.0, 120.0, 135.0]);
        let first = evaluate_column(&t, "U", ThresholdRule::VoltageDeviation).unwrap();
        let second = evaluate_column(&t, "U", ThresholdRule::VoltageDeviation).unwrap();
        assert_eq!(first.count, second.count);
        assert_eq!(first.percentage.to_bits(), second.percentage.to_bits());
    }

    #[test]
    fn test_screening_reports_every_column() {
        let t = NumericTable::new(
            vec!["3".to_string(), "5".to_string(), "7".to_string()],
            vec![
                vec![6.0, 1.0, 7.0],
                vec![0.0, 0.0, 0.0],
                vec![5.0, 5.1, 9.0],
            ],
        );
        let results = screen_columns(&t, HARMONIC_SCREENING_THRESHOLD);

        assert_eq!(results.len(), 3);
        assert_eq!(results["3"].count, 2);
        assert_eq!(results["3"].percentage, 66.66667);
        assert_eq!(results["5"].count, 0);
        assert_eq!(results["5"].percentage, 0.0);
        assert_eq!(results["7"].count, 2);
    }

    #[test]
    fn test_screening_default_threshold_counts_positive_values() {
        let t = table("1", vec![0.0, 0.2, 0.0, 3.0]);
        let results = screen_columns(&t, DEFAULT_SCREENING_THRESHOLD);
        assert_eq!(results["1"].count, 2);
        assert_eq!(results["1"].percentage, 50.0);
    }

    #[test]
    fn test_screening_empty_table() {
        let results = screen_columns(&table("1", vec![]), HARMONIC_SCREENING_THRESHOLD);
        assert_eq!(results["1"].count, 0);
        assert_eq!(results["1"].percentage, 0.0);
    }

    #[test]
    fn test_screening_result_serializes_with_record_field_names() {
        let json = serde_json::to_value(ScreeningResult {
            count: 3,
            percentage: 12.5,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"conteo": 3, "porcentaje": 12.5}));
    }
}
