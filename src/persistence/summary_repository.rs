use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::metrics::SummaryRecord;
use crate::persistence::error::PersistenceError;
use crate::utils::file_label;

/// Write path for analysis results
///
/// Implementations must accept concurrent inserts from batch workers.
pub trait SummaryRepository: Send + Sync {
    fn insert(&self, path: &Path, record: &SummaryRecord) -> Result<(), PersistenceError>;
}

/// A persisted summary with its source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSummary {
    pub file: String,
    pub processed_at: DateTime<Utc>,
    pub data: SummaryRecord,
}

impl StoredSummary {
    fn new(path: &Path, record: &SummaryRecord) -> Self {
        Self {
            file: path.display().to_string(),
            processed_at: Utc::now(),
            data: record.clone(),
        }
    }
}

/// Keeps summaries in memory, in insertion order
#[derive(Debug, Default)]
pub struct InMemorySummaryRepository {
    summaries: Mutex<Vec<StoredSummary>>,
}

impl InMemorySummaryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> Vec<StoredSummary> {
        match self.summaries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.summaries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SummaryRepository for InMemorySummaryRepository {
    fn insert(&self, path: &Path, record: &SummaryRecord) -> Result<(), PersistenceError> {
        let mut summaries = self
            .summaries
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        summaries.push(StoredSummary::new(path, record));
        Ok(())
    }
}

/// Appends one JSON object per summary to a file
#[derive(Debug)]
pub struct JsonLinesSummaryRepository {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesSummaryRepository {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SummaryRepository for JsonLinesSummaryRepository {
    fn insert(&self, path: &Path, record: &SummaryRecord) -> Result<(), PersistenceError> {
        let mut line = serde_json::to_string(&StoredSummary::new(path, record))?;
        line.push('\n');

        let mut file = self
            .file
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        debug!(
            output = %self.path.display(),
            file = %file_label(path),
            "Appended summary"
        );
        Ok(())
    }
}
