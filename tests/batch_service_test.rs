mod common;

use common::*;
use power_quality_service::persistence::{
    InMemorySummaryRepository, JsonLinesSummaryRepository, SummaryRepository,
};
use power_quality_service::services::{AnalysisService, BatchJob, BatchService, Stage};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

fn jobs(paths: &[PathBuf], threshold: Option<f64>) -> Vec<BatchJob> {
    let profile = Arc::new(sonel_profile());
    paths
        .iter()
        .map(|path| BatchJob {
            path: path.clone(),
            vendor_tag: "SONEL".to_string(),
            profile: Arc::clone(&profile),
            threshold,
        })
        .collect()
}

fn five_files_third_corrupt(dir: &std::path::Path) -> Vec<PathBuf> {
    (1..=5)
        .map(|i| {
            let name = format!("export_{i}.xlsx");
            if i == 3 {
                write_corrupt(dir, &name)
            } else {
                write_workbook(dir, &name, &sonel_rows())
            }
        })
        .collect()
}

#[tokio::test]
async fn test_batch_isolates_failing_file() {
    let dir = tempdir().unwrap();
    let paths = five_files_third_corrupt(dir.path());
    let repository = Arc::new(InMemorySummaryRepository::new());
    let service = BatchService::new(AnalysisService::new(), repository.clone(), 3);

    let report = service.run(jobs(&paths, None)).await;

    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.success_count(), 4);
    assert_eq!(report.failure_count(), 1);

    // Outcomes come back in submission order
    let reported: Vec<&PathBuf> = report.outcomes.iter().map(|o| &o.path).collect();
    assert_eq!(reported, paths.iter().collect::<Vec<_>>());

    let failed = &report.outcomes[2];
    assert_eq!(failed.path, paths[2]);
    let err = failed.result.as_ref().unwrap_err();
    assert_eq!(err.stage(), Stage::Loaded);

    for (idx, outcome) in report.outcomes.iter().enumerate() {
        if idx != 2 {
            let record = outcome.result.as_ref().unwrap();
            assert_eq!(record.metrics.len(), 10);
        }
    }

    assert_eq!(repository.len(), 4);
    let stored: Vec<String> = repository
        .summaries()
        .into_iter()
        .map(|s| s.file)
        .collect();
    assert!(!stored.contains(&paths[2].display().to_string()));
    assert!(stored.contains(&paths[0].display().to_string()));
}

#[tokio::test]
async fn test_batch_reports_progress_in_order() {
    let dir = tempdir().unwrap();
    let paths = five_files_third_corrupt(dir.path());
    let repository = Arc::new(InMemorySummaryRepository::new());
    let service = BatchService::new(AnalysisService::new(), repository, 5);

    let mut seen = Vec::new();
    let report = service
        .run_with(jobs(&paths, None), |outcome| {
            seen.push((outcome.path.clone(), outcome.is_success()));
        })
        .await;

    assert_eq!(seen.len(), 5);
    assert_eq!(
        seen.iter().map(|(_, ok)| *ok).collect::<Vec<_>>(),
        vec![true, true, false, true, true]
    );
    assert_eq!(seen[0].0, paths[0]);
    assert_eq!(report.failures().count(), 1);
}

#[tokio::test]
async fn test_batch_with_zero_concurrency_still_runs() {
    let dir = tempdir().unwrap();
    let paths = vec![write_workbook(dir.path(), "only.xlsx", &sonel_rows())];
    let repository = Arc::new(InMemorySummaryRepository::new());
    let service = BatchService::new(AnalysisService::new(), repository.clone(), 0);

    let report = service.run(jobs(&paths, None)).await;

    assert_eq!(report.success_count(), 1);
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn test_empty_batch() {
    let repository = Arc::new(InMemorySummaryRepository::new());
    let service = BatchService::new(AnalysisService::new(), repository.clone(), 4);

    let report = service.run(Vec::new()).await;

    assert!(report.outcomes.is_empty());
    assert!(repository.is_empty());
}

#[tokio::test]
async fn test_batch_writes_json_lines() {
    let dir = tempdir().unwrap();
    let paths: Vec<PathBuf> = (1..=2)
        .map(|i| write_workbook(dir.path(), &format!("export_{i}.xlsx"), &sonel_rows()))
        .collect();
    let output = dir.path().join("summaries.jsonl");
    let repository: Arc<dyn SummaryRepository> =
        Arc::new(JsonLinesSummaryRepository::open(&output).unwrap());
    let service = BatchService::new(AnalysisService::new(), repository, 2);

    let report = service.run(jobs(&paths, Some(129.0))).await;
    assert_eq!(report.success_count(), 2);

    let contents = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(
            line["data"]["porcentaje_desviacion_voltaje_fase_a"]["percentage"],
            40.0
        );
        assert_eq!(line["data"]["screening"]["U L1 avg"]["conteo"], 3);
    }
}
