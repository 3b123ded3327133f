pub mod analysis_service;
pub mod batch_service;

pub use analysis_service::{AnalysisError, AnalysisService, Stage};
pub use batch_service::{BatchJob, BatchReport, BatchService, FileOutcome};
