// Analyzer formats and per-device profiles
//
// - vendor: supported export formats and their fixed pipeline plans
// - profile: per-device mapping from logical metrics to column labels

pub mod profile;
pub mod vendor;

pub use profile::{AnalyzerProfile, LogicalMetric, Phase, PhaseColumns, ProfileError};
pub use vendor::{UnsupportedAnalyzer, Vendor, VendorPlan};
