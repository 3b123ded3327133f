use std::env;
use std::path::PathBuf;

use crate::metrics::HARMONIC_SCREENING_THRESHOLD;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub output_path: PathBuf,
    pub batch_concurrency: usize,
    pub screening_threshold: f64,
}

impl Config {
    /// Read configuration from `PQ_*` environment variables
    ///
    /// Missing or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Config {
            catalog_path: env::var("PQ_CATALOG_PATH")
                .unwrap_or_else(|_| "analyzers.json".to_string())
                .into(),
            output_path: env::var("PQ_OUTPUT_PATH")
                .unwrap_or_else(|_| "summaries.jsonl".to_string())
                .into(),
            batch_concurrency: env::var("PQ_BATCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(4),
            screening_threshold: env::var("PQ_SCREENING_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(HARMONIC_SCREENING_THRESHOLD),
        }
    }
}
