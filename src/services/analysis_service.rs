use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::analyzer::{AnalyzerProfile, UnsupportedAnalyzer, Vendor, VendorPlan};
use crate::importers::sheet_loader::{self, LoadError, SheetSelector};
use crate::metrics::{evaluate_column, screen_columns, MetricError, SummaryRecord};
use crate::persistence::PersistenceError;
use crate::table::numeric::coerce;
use crate::table::{HeaderError, NumericTable};
use crate::utils::file_label;

/// Pipeline stage at which an analysis failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Dispatch,
    Loaded,
    WindowSelected,
    HeaderNormalized,
    Coerced,
    Evaluated,
    Persisted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Dispatch => "dispatch",
            Stage::Loaded => "load",
            Stage::WindowSelected => "window",
            Stage::HeaderNormalized => "header",
            Stage::Coerced => "coerce",
            Stage::Evaluated => "evaluate",
            Stage::Persisted => "persist",
        };
        f.write_str(name)
    }
}

/// Error types for analysis operations
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Unsupported analyzer: {0}")]
    UnsupportedAnalyzer(String),

    #[error("Load failed: {0}")]
    Load(#[from] LoadError),

    #[error("Header normalization failed: {0}")]
    Header(#[from] HeaderError),

    #[error("Column '{column}' for mandatory metric {metric} not found")]
    MissingColumn { metric: String, column: String },

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

impl From<UnsupportedAnalyzer> for AnalysisError {
    fn from(err: UnsupportedAnalyzer) -> Self {
        AnalysisError::UnsupportedAnalyzer(err.0)
    }
}

impl AnalysisError {
    pub fn stage(&self) -> Stage {
        match self {
            AnalysisError::UnsupportedAnalyzer(_) | AnalysisError::Task(_) => Stage::Dispatch,
            AnalysisError::Load(_) => Stage::Loaded,
            AnalysisError::Header(_) => Stage::HeaderNormalized,
            AnalysisError::MissingColumn { .. } => Stage::Evaluated,
            AnalysisError::Persistence(_) => Stage::Persisted,
        }
    }
}

/// Format dispatcher for analyzer exports
///
/// Picks the vendor plan, runs load -> window -> header -> coerce ->
/// evaluate, and logs one event per stage with the file it is working on.
/// Holds no per-request state, so one instance can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct AnalysisService {
    sheet: SheetSelector,
}

impl AnalysisService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a specific worksheet instead of the first one
    pub fn with_sheet(sheet: SheetSelector) -> Self {
        Self { sheet }
    }

    /// Tags accepted by `analyze` and `screen`
    pub fn supported_vendors() -> [&'static str; 3] {
        Vendor::supported_tags()
    }

    /// Compute the profile's compliance metrics for one export
    ///
    /// With a `threshold`, the record also carries screening results for
    /// every column of the table.
    #[instrument(skip(self, profile, threshold), fields(file = %file_label(path), profile = %profile.name))]
    pub fn analyze(
        &self,
        vendor_tag: &str,
        path: &Path,
        profile: &AnalyzerProfile,
        threshold: Option<f64>,
    ) -> Result<SummaryRecord, AnalysisError> {
        let vendor: Vendor = vendor_tag.parse()?;
        if profile.vendor != vendor {
            warn!(
                requested = %vendor,
                profile_vendor = %profile.vendor,
                "Profile vendor differs from requested analyzer, using requested format"
            );
        }

        let table = self.prepare(vendor.plan(), path)?;
        let mut record = evaluate_profile(&table, profile)?;
        if let Some(threshold) = threshold {
            record.screening = Some(screen_columns(&table, threshold));
        }

        info!(
            stage = %Stage::Evaluated,
            file = %file_label(path),
            metrics = record.metrics.len(),
            "Analysis complete"
        );
        Ok(record)
    }

    /// Screening mode: count values above `threshold` in every column
    #[instrument(skip(self), fields(file = %file_label(path)))]
    pub fn screen(
        &self,
        vendor_tag: &str,
        path: &Path,
        threshold: f64,
    ) -> Result<SummaryRecord, AnalysisError> {
        let vendor: Vendor = vendor_tag.parse()?;
        self.screen_with(vendor.plan(), path, threshold)
    }

    /// Screening over a harmonic-order table (`VendorPlan::HARMONIC_TABLE`)
    #[instrument(skip(self), fields(file = %file_label(path)))]
    pub fn screen_harmonic_table(
        &self,
        path: &Path,
        threshold: f64,
    ) -> Result<SummaryRecord, AnalysisError> {
        self.screen_with(VendorPlan::HARMONIC_TABLE, path, threshold)
    }

    fn screen_with(
        &self,
        plan: VendorPlan,
        path: &Path,
        threshold: f64,
    ) -> Result<SummaryRecord, AnalysisError> {
        let table = self.prepare(plan, path)?;
        let screening = screen_columns(&table, threshold);

        info!(
            stage = %Stage::Evaluated,
            file = %file_label(path),
            columns = screening.len(),
            "Screening complete"
        );
        Ok(SummaryRecord::screening_only(screening))
    }

    /// Load an export and bring it into numeric form following `plan`
    pub fn prepare(&self, plan: VendorPlan, path: &Path) -> Result<NumericTable, AnalysisError> {
        let file = file_label(path);

        let grid = sheet_loader::load(path, &self.sheet, None)?;
        debug!(
            stage = %Stage::Loaded,
            file = %file,
            rows = grid.height(),
            cols = grid.width(),
            "Loaded sheet"
        );

        let labeled = plan.normalize(&grid)?;

        let table = coerce(&labeled);
        debug!(
            stage = %Stage::Coerced,
            file = %file,
            rows = table.height(),
            "Coerced values"
        );

        Ok(table)
    }
}

/// Map each metric the profile declares through its threshold rule
///
/// A mandatory metric whose column is missing aborts the file. Optional
/// metrics with a missing column, and any metric whose column has no rows,
/// are left out of the record.
pub fn evaluate_profile(
    table: &NumericTable,
    profile: &AnalyzerProfile,
) -> Result<SummaryRecord, AnalysisError> {
    let mut record = SummaryRecord::default();

    for (metric, column) in profile.metric_columns() {
        match evaluate_column(table, column, metric.rule()) {
            Ok(result) => {
                record.metrics.insert(metric.key(), result);
            }
            Err(MetricError::MissingColumn(_)) if metric.is_mandatory() => {
                return Err(AnalysisError::MissingColumn {
                    metric: metric.key(),
                    column: column.to_string(),
                });
            }
            Err(MetricError::MissingColumn(_)) => {
                warn!(
                    stage = %Stage::Evaluated,
                    metric = %metric,
                    column,
                    "Optional column not in export, metric omitted"
                );
            }
            Err(MetricError::EmptyColumn(_)) => {
                warn!(
                    stage = %Stage::Evaluated,
                    metric = %metric,
                    column,
                    "Column has no rows, metric omitted"
                );
            }
        }
    }

    Ok(record)
}
