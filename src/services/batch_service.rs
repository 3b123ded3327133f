use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::analyzer::AnalyzerProfile;
use crate::metrics::SummaryRecord;
use crate::persistence::SummaryRepository;
use crate::services::analysis_service::{AnalysisError, AnalysisService, Stage};
use crate::utils::file_label;

/// One file to analyze as part of a batch
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub path: PathBuf,
    pub vendor_tag: String,
    pub profile: Arc<AnalyzerProfile>,
    pub threshold: Option<f64>,
}

/// Result for one file of a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<SummaryRecord, AnalysisError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes, in the order the jobs were submitted
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub duration_secs: f64,
}

impl BatchReport {
    pub fn successes(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Analyzes many exports concurrently and persists each summary
///
/// Every file runs the full pipeline on the blocking pool. A failing file
/// is reported in its outcome and never stops the remaining files.
#[derive(Clone)]
pub struct BatchService {
    analysis: AnalysisService,
    repository: Arc<dyn SummaryRepository>,
    concurrency: usize,
}

impl BatchService {
    pub fn new(
        analysis: AnalysisService,
        repository: Arc<dyn SummaryRepository>,
        concurrency: usize,
    ) -> Self {
        Self {
            analysis,
            repository,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run(&self, jobs: Vec<BatchJob>) -> BatchReport {
        self.run_with(jobs, |_| {}).await
    }

    /// Run the batch, calling `on_outcome` as each file finishes
    ///
    /// Outcomes are delivered and reported in submission order.
    #[instrument(skip(self, jobs, on_outcome), fields(files = jobs.len(), concurrency = self.concurrency))]
    pub async fn run_with<F>(&self, jobs: Vec<BatchJob>, mut on_outcome: F) -> BatchReport
    where
        F: FnMut(&FileOutcome),
    {
        let start_time = Instant::now();
        info!("Starting batch of {} files", jobs.len());

        let outcomes: Vec<FileOutcome> = stream::iter(jobs)
            .map(|job| self.process(job))
            .buffered(self.concurrency)
            .inspect(|outcome| on_outcome(outcome))
            .collect()
            .await;

        let report = BatchReport {
            outcomes,
            duration_secs: start_time.elapsed().as_secs_f64(),
        };

        info!(
            succeeded = report.success_count(),
            failed = report.failure_count(),
            duration_secs = %format!("{:.2}", report.duration_secs),
            "Batch finished"
        );
        report
    }

    async fn process(&self, job: BatchJob) -> FileOutcome {
        let path = job.path.clone();
        let analysis = self.analysis.clone();
        let repository = Arc::clone(&self.repository);

        let result = tokio::task::spawn_blocking(move || -> Result<SummaryRecord, AnalysisError> {
            let record =
                analysis.analyze(&job.vendor_tag, &job.path, &job.profile, job.threshold)?;
            repository.insert(&job.path, &record)?;
            Ok(record)
        })
        .await
        .unwrap_or_else(|e| Err(AnalysisError::Task(e.to_string())));

        match &result {
            Ok(record) => info!(
                stage = %Stage::Persisted,
                file = %file_label(&path),
                metrics = record.metrics.len(),
                "File processed"
            ),
            Err(e) => warn!(
                stage = %e.stage(),
                file = %file_label(&path),
                error = %e,
                "File failed"
            ),
        }

        FileOutcome { path, result }
    }
}
