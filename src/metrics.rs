// Compliance metrics computed over numeric tables
//
// - evaluator: threshold rules per metric family and screening mode
// - summary: the record handed to persistence

pub mod evaluator;
pub mod summary;

pub use evaluator::{
    evaluate_column, flicker_pct, harmonic_distortion_pct, imbalance_pct, screen_columns,
    voltage_deviation_pct, MetricError, MetricResult, ScreeningResult, ThresholdRule,
    DEFAULT_SCREENING_THRESHOLD, HARMONIC_SCREENING_THRESHOLD,
};
pub use summary::SummaryRecord;
