//! Tests for batch admission, isolation, deadlines and concurrency

use super::{
    INDEXED_CSV, MALFORMED_CSV, UNINDEXED_CSV, orchestrator, test_config, write_input,
};
use crate::ErrorKind;
use crate::app::services::batch::orchestrator::enforce_budget;
use crate::app::services::batch::{ConcurrencyGauge, FileResultStatus, SheetStatus};
use crate::app::services::termination_filter::TerminationSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_batch_processes_files_and_writes_outputs() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let file = write_input(input.path(), "clinics_a.csv", INDEXED_CSV);

    let orchestrator = orchestrator(test_config(output.path(), 1), None);
    let result = orchestrator
        .submit(vec![file], Some("b1".to_string()))
        .await
        .unwrap();

    assert_eq!(result.batch_id, "b1");
    assert!(result.finished_at >= result.started_at);
    let file = &result.results[0];
    assert_eq!(file.status, FileResultStatus::Success);
    assert_eq!(file.file, "clinics_a.csv");

    let sheet = &file.sheets[0];
    assert_eq!(sheet.records_processed, 2);
    assert_eq!(sheet.metadata_rows, 0);
    let geocoding = sheet.geocoding_stats.as_ref().unwrap();
    assert_eq!(geocoding.postal_code_matches, 2);
    assert_eq!(geocoding.success_rate, "100.0%");

    let written = output.path().join("b1_clinics_a.csv");
    assert_eq!(sheet.output_file_path.as_deref(), Some(written.as_path()));
    let content = std::fs::read_to_string(written).unwrap();
    assert!(content.starts_with("Code,Name,Zone,Area"));
    assert!(content.contains("GP001"));
}

#[tokio::test]
async fn test_malformed_file_does_not_affect_siblings() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let files = vec![
        write_input(input.path(), "clinics_a.csv", INDEXED_CSV),
        write_input(input.path(), "bad.csv", MALFORMED_CSV),
        write_input(input.path(), "clinics_c.csv", INDEXED_CSV),
    ];

    let orchestrator = orchestrator(test_config(output.path(), 2), None);
    let result = orchestrator.submit(files, None).await.unwrap();

    let statuses: Vec<_> = result.results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            FileResultStatus::Success,
            FileResultStatus::Failed,
            FileResultStatus::Success
        ]
    );
    let failed_sheet = &result.results[1].sheets[0];
    assert_eq!(failed_sheet.status, SheetStatus::Failed);
    assert_eq!(
        failed_sheet.error.as_ref().map(|e| e.kind),
        Some(ErrorKind::StructuralError)
    );
    assert_eq!(result.batch_id.len(), 8);
}

#[tokio::test]
async fn test_rejects_empty_and_oversized_batches() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut config = test_config(output.path(), 1);
    config.limits.max_files_per_batch = 1;
    let orchestrator = orchestrator(config, None);

    let empty = orchestrator.submit(Vec::new(), None).await.unwrap_err();
    assert_eq!(empty.kind(), ErrorKind::BatchRejected);

    let files = vec![
        write_input(input.path(), "a.csv", INDEXED_CSV),
        write_input(input.path(), "b.csv", INDEXED_CSV),
    ];
    let too_many = orchestrator.submit(files, None).await.unwrap_err();
    assert_eq!(too_many.kind(), ErrorKind::BatchRejected);
}

#[tokio::test]
async fn test_file_size_ceiling_fails_only_that_file() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut config = test_config(output.path(), 1);
    config.limits.max_file_size_mb = 0;
    let orchestrator = orchestrator(config, None);

    let file = write_input(input.path(), "clinics.csv", INDEXED_CSV);
    let result = orchestrator.submit(vec![file], None).await.unwrap();

    let file = &result.results[0];
    assert_eq!(file.status, FileResultStatus::Failed);
    assert_eq!(file.error.as_ref().map(|e| e.kind), Some(ErrorKind::InputError));
    assert!(std::fs::read_dir(output.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_external_terminations_are_filtered() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut terminations = TerminationSet::new();
    terminations.insert("GP002", "", "");

    let orchestrator = orchestrator(test_config(output.path(), 1), None).with_terminations(terminations);
    let file = write_input(input.path(), "clinics.csv", INDEXED_CSV);
    let result = orchestrator.submit(vec![file], None).await.unwrap();

    let sheet = &result.results[0].sheets[0];
    assert_eq!(sheet.records_processed, 1);
    assert_eq!(sheet.terminated_clinics_filtered, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_peak_concurrency_never_exceeds_workers() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let files: Vec<_> = (0..5)
        .map(|i| write_input(input.path(), &format!("clinics_{}.csv", i), UNINDEXED_CSV))
        .collect();

    let gauge = ConcurrencyGauge::new();
    let orchestrator = orchestrator(test_config(output.path(), 2), Some(Duration::from_millis(200)))
        .with_gauge(Arc::clone(&gauge));
    let result = orchestrator.submit(files, None).await.unwrap();

    assert_eq!(result.count(FileResultStatus::Success), 5);
    assert_eq!(gauge.peak(), 2);
    assert_eq!(gauge.current(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_file_timeout_isolated_from_siblings() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let files = vec![
        write_input(input.path(), "slow.csv", UNINDEXED_CSV),
        write_input(input.path(), "clinics_fast.csv", INDEXED_CSV),
    ];

    let mut config = test_config(output.path(), 2);
    config.limits.file_timeout_secs = 1;
    let orchestrator = orchestrator(config, Some(Duration::from_secs(3600)));
    let result = orchestrator
        .submit(files, Some("t1".to_string()))
        .await
        .unwrap();

    let slow = &result.results[0];
    assert_eq!(slow.status, FileResultStatus::Failed);
    assert_eq!(slow.error.as_ref().map(|e| e.kind), Some(ErrorKind::TimeoutError));
    assert!(!output.path().join("t1_slow.csv").exists());

    assert_eq!(result.results[1].status, FileResultStatus::Success);
    assert!(output.path().join("t1_clinics_fast.csv").exists());
}

#[tokio::test]
async fn test_expired_soft_deadline_starts_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut config = test_config(output.path(), 2);
    config.limits.batch_timeout_secs = 0;
    let orchestrator = orchestrator(config, None);

    let file = write_input(input.path(), "clinics.csv", INDEXED_CSV);
    let result = orchestrator.submit(vec![file], None).await.unwrap();

    assert_eq!(
        result.results[0].error.as_ref().map(|e| e.kind),
        Some(ErrorKind::TimeoutError)
    );
}

#[tokio::test]
async fn test_cancelled_batch_reports_interrupted() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let orchestrator = orchestrator(test_config(output.path(), 1), None).with_cancellation(token);
    let file = write_input(input.path(), "clinics.csv", INDEXED_CSV);
    let result = orchestrator.submit(vec![file], None).await.unwrap();

    assert_eq!(
        result.results[0].error.as_ref().map(|e| e.kind),
        Some(ErrorKind::Interrupted)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_backpressure_rejects_when_capacity_is_full() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut config = test_config(output.path(), 1);
    config.limits.queue_capacity = 0;
    let orchestrator = Arc::new(orchestrator(config, Some(Duration::from_millis(500))));

    let slow = write_input(input.path(), "slow.csv", UNINDEXED_CSV);
    let running = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit(vec![slow], None).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let other = write_input(input.path(), "clinics.csv", INDEXED_CSV);
    let rejected = orchestrator.submit(vec![other], None).await.unwrap_err();
    assert_eq!(rejected.kind(), ErrorKind::BatchRejected);

    let first = running.await.unwrap().unwrap();
    assert_eq!(first.results[0].status, FileResultStatus::Success);
}

#[tokio::test]
async fn test_sequential_and_parallel_results_match() {
    let input = TempDir::new().unwrap();
    let files = vec![
        write_input(input.path(), "clinics_a.csv", INDEXED_CSV),
        write_input(input.path(), "bad.csv", MALFORMED_CSV),
    ];

    let mut shapes = Vec::new();
    for workers in [1, 3] {
        let output = TempDir::new().unwrap();
        let orchestrator = orchestrator(test_config(output.path(), workers), None);
        let result = orchestrator
            .submit(files.clone(), Some("same".to_string()))
            .await
            .unwrap();
        let shape: Vec<_> = result
            .results
            .iter()
            .map(|r| (r.file.clone(), r.status, r.records_processed(), r.sheets.len()))
            .collect();
        shapes.push(shape);
    }

    assert_eq!(shapes[0], shapes[1]);
}

#[test]
fn test_work_finished_past_budget_is_a_timeout() {
    let budget = Duration::from_secs(1);

    let late = enforce_budget(Ok(3), Duration::from_millis(1500), budget, "big.xlsx");
    assert_eq!(late.unwrap_err().kind(), ErrorKind::TimeoutError);

    let on_time = enforce_budget(Ok(3), Duration::from_millis(200), budget, "big.xlsx");
    assert_eq!(on_time.unwrap(), 3);
}
