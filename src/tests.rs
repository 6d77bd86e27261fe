use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::domain::entities::job::{
    EnrichmentResult, JobId, JobProgress, JobStatus, JobSummary, RowStage,
};
use crate::domain::entities::table::{GridError, Table};
use crate::domain::entities::value::{CellValue, DataType};
use crate::infra::codec::csv;
use crate::infra::config::ApiConfig;
use crate::infra::http::client::extract_error_message;
use crate::usecase::ports::backend::{
    BackendError, EnrichmentBackend, JobList, SignedUrlGrant, SignedUrlRequest, StartJobRequest,
    StartedJob,
};
use crate::usecase::ports::clock::Clock;
use crate::usecase::services::enrichment_service::{
    merge_results, EnrichmentKind, EnrichmentRequest, EnrichmentWorkflow, StepEvent, WorkflowError,
    WorkflowState,
};
use crate::usecase::services::export_service::default_export_name;
use crate::usecase::services::import_service::{ImportError, ImportService};

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("ampledata-{prefix}-{nanos}"))
}

fn sample_table() -> Table {
    csv::read_table("id,name,email\n1,Alice,\n2,Bob,\n")
        .expect("sample table should parse")
        .with_column("company", DataType::String)
}

// --- grid mutations ---

#[test]
fn add_column_backfills_existing_rows_with_null() {
    let table = csv::read_table("id\n1\n2\n").expect("table should parse");

    let next = table.with_column("email", DataType::String);

    assert_eq!(next.column_count(), table.column_count() + 1);
    for row in &next.rows {
        assert_eq!(row.get("email"), CellValue::Null, "new column should be null");
    }
}

#[test]
fn add_column_ignores_blank_and_duplicate_names() {
    let table = sample_table();

    assert_eq!(table.with_column("  ", DataType::String), table);
    assert_eq!(table.with_column("id", DataType::Number), table);
}

#[test]
fn remove_column_after_add_restores_original_shape() {
    let table = sample_table();

    let round_trip = table
        .with_column("phone", DataType::String)
        .without_column("phone");

    assert_eq!(round_trip, table);
}

#[test]
fn rename_column_preserves_row_values() {
    let table = sample_table();

    let renamed = table.with_renamed_column("name", "full_name");

    assert_eq!(renamed.column_count(), table.column_count());
    assert!(renamed.column("name").is_none());
    assert_eq!(
        renamed.rows[0].get("full_name"),
        CellValue::Str("Alice".to_string())
    );
}

#[test]
fn rename_column_ignores_blank_unchanged_and_taken_names() {
    let table = sample_table();

    assert_eq!(table.with_renamed_column("name", ""), table);
    assert_eq!(table.with_renamed_column("name", "name"), table);
    assert_eq!(table.with_renamed_column("name", "id"), table);
}

#[test]
fn add_row_fills_every_column_with_null() {
    let table = sample_table();

    let next = table.with_row();

    assert_eq!(next.row_count(), table.row_count() + 1);
    let added = next.rows.last().expect("row should exist");
    for name in next.column_names() {
        assert_eq!(added.get(&name), CellValue::Null);
    }
}

#[test]
fn remove_row_shifts_trailing_rows() {
    let table = sample_table();

    let next = table.without_row(0).expect("removal should succeed");

    assert_eq!(next.row_count(), table.row_count() - 1);
    assert_eq!(next.rows[0].get("name"), CellValue::Str("Bob".to_string()));
}

#[test]
fn remove_row_out_of_range_reports_error() {
    let table = sample_table();

    let result = table.without_row(99);

    assert_eq!(
        result,
        Err(GridError::RowOutOfRange {
            index: 99,
            row_count: 2
        })
    );
}

#[test]
fn set_cell_stores_raw_string_without_coercion() {
    let table = csv::read_table("amount\n1\n").expect("table should parse");
    assert_eq!(
        table.column("amount").expect("column should exist").data_type,
        DataType::Number
    );

    let next = table
        .with_cell(0, "amount", "not a number")
        .expect("edit should succeed");

    assert_eq!(
        next.rows[0].get("amount"),
        CellValue::Str("not a number".to_string())
    );
}

#[test]
fn set_cell_rejects_unknown_column() {
    let table = sample_table();

    assert_eq!(
        table.with_cell(0, "missing", "x"),
        Err(GridError::UnknownColumn("missing".to_string()))
    );
}

#[test]
fn empty_and_populated_columns_partition_the_table() {
    let table = sample_table();

    assert_eq!(
        table.populated_columns(),
        vec!["id".to_string(), "name".to_string()]
    );
    assert_eq!(
        table.empty_columns(),
        vec!["email".to_string(), "company".to_string()]
    );
}

// --- codecs ---

#[test]
fn csv_round_trip_preserves_simple_fields() {
    let text = "id,name,city\n1,Alice,Paris\n2,Bob,Tokyo\n";

    let table = csv::read_table(text).expect("csv should parse");
    let exported = csv::write_table(&table).expect("export should succeed");

    assert_eq!(exported, text);
}

#[test]
fn csv_ingest_maps_empty_fields_to_null() {
    let table = csv::read_table("id,email\n1,\n").expect("csv should parse");

    assert_eq!(table.rows[0].get("email"), CellValue::Null);
}

#[test]
fn csv_ingest_null_fills_short_records() {
    let table = csv::read_table("a,b,c\n1,2\n").expect("csv should parse");

    assert_eq!(table.rows[0].get("b"), CellValue::Str("2".to_string()));
    assert_eq!(table.rows[0].get("c"), CellValue::Null);
}

#[test]
fn csv_ingest_requires_a_header() {
    assert!(csv::read_table("").is_err(), "empty input should fail");
}

#[test]
fn csv_ingest_rejects_duplicate_headers() {
    assert!(csv::read_table("a,a\n1,2\n").is_err());
}

#[test]
fn csv_export_quotes_fields_with_commas() {
    let table = csv::read_table("note\n\"one, two\"\n").expect("csv should parse");

    let exported = csv::write_table(&table).expect("export should succeed");

    assert_eq!(exported, "note\n\"one, two\"\n");
}

#[test]
fn json_ingest_derives_columns_from_first_object() {
    let table = crate::infra::codec::json::read_table(
        r#"[{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob", "extra": true}]"#,
    )
    .expect("json should parse");

    assert_eq!(
        table.column_names(),
        vec!["id".to_string(), "name".to_string()]
    );
    assert_eq!(table.rows[1].get("id"), CellValue::Number(2.0));
    assert_eq!(
        table.column("id").expect("column should exist").data_type,
        DataType::Number
    );
}

#[test]
fn json_ingest_wraps_a_single_object() {
    let table = crate::infra::codec::json::read_table(r#"{"id": "1"}"#)
        .expect("json should parse");

    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rows[0].get("id"), CellValue::Str("1".to_string()));
}

#[test]
fn json_ingest_rejects_nested_values() {
    let result = crate::infra::codec::json::read_table(r#"[{"id": {"nested": 1}}]"#);

    assert!(result.is_err(), "nested objects should be rejected");
}

#[test]
fn import_dispatches_on_extension() {
    let service = ImportService::new();

    let csv_file = service
        .import_text("people.csv", "id\n1\n")
        .expect("csv import should succeed");
    assert_eq!(csv_file.table.row_count(), 1);

    let json_file = service
        .import_text("people.json", r#"[{"id": "1"}]"#)
        .expect("json import should succeed");
    assert_eq!(json_file.table.row_count(), 1);
}

#[test]
fn import_unknown_extension_falls_back_to_json() {
    let service = ImportService::new();
    let text = "[\n  {\n    \"id\": \"1\",\n    \"email\": \"a@x.com\"\n  }\n]\n";

    let imported = service
        .import_text("export.txt", text)
        .expect("fallback import should succeed");

    assert_eq!(
        imported.table.column_names(),
        vec!["id".to_string(), "email".to_string()]
    );
}

#[test]
fn import_reports_json_error_when_both_parsers_fail() {
    let service = ImportService::new();

    let result = service.import_text("broken.json", "{not json");

    assert!(matches!(result, Err(ImportError::Json(_))));
}

// --- progress & merge ---

fn progress_fixture(status: JobStatus, total: u64, completed: u64) -> JobProgress {
    let mut rows_by_stage = BTreeMap::new();
    rows_by_stage.insert(RowStage::Completed, completed);
    rows_by_stage.insert(RowStage::Pending, total.saturating_sub(completed));
    JobProgress {
        job_id: JobId::from("job-1"),
        total_rows: total,
        rows_by_stage,
        started_at: "2025-06-01T10:00:00Z".to_string(),
        status,
    }
}

#[test]
fn progress_percent_reads_the_completed_bucket() {
    let progress = progress_fixture(JobStatus::Running, 100, 40);

    assert_eq!(progress.percent_complete(), 40.0);
}

#[test]
fn progress_percent_is_zero_for_empty_jobs() {
    let progress = progress_fixture(JobStatus::Running, 0, 0);

    assert_eq!(progress.percent_complete(), 0.0);
}

fn result_fixture(key: &str, field: &str, value: serde_json::Value) -> EnrichmentResult {
    let mut extracted_data = serde_json::Map::new();
    extracted_data.insert(field.to_string(), value);
    EnrichmentResult {
        key: key.to_string(),
        extracted_data,
        confidence: None,
        sources: vec!["https://example.com".to_string()],
        error: None,
    }
}

#[test]
fn merge_sets_matching_rows_and_skips_unmatched() {
    let table = sample_table();
    let results = vec![
        result_fixture("1", "email", serde_json::json!("a@x.com")),
        result_fixture("7", "email", serde_json::json!("ghost@x.com")),
    ];

    let (merged, outcome) = merge_results(&table, "id", "email", &results);

    assert_eq!(outcome.matched, 1);
    assert_eq!(outcome.unmatched, 1);
    assert_eq!(
        merged.rows[0].get("email"),
        CellValue::Str("a@x.com".to_string())
    );
    assert_eq!(merged.rows[1].get("email"), CellValue::Null);
}

#[test]
fn merge_skips_results_missing_the_target_field() {
    let table = sample_table();
    let results = vec![result_fixture("1", "phone", serde_json::json!("555"))];

    let (merged, outcome) = merge_results(&table, "id", "email", &results);

    assert_eq!(outcome.matched, 0);
    assert_eq!(outcome.unmatched, 1);
    assert_eq!(merged.rows[0].get("email"), CellValue::Null);
}

#[test]
fn merge_coerces_values_to_the_declared_type() {
    let table = sample_table().with_column("employees", DataType::Number);
    let results = vec![result_fixture("1", "employees", serde_json::json!("250"))];

    let (merged, _) = merge_results(&table, "id", "employees", &results);

    assert_eq!(merged.rows[0].get("employees"), CellValue::Number(250.0));
}

// --- workflow ---

#[derive(Default)]
struct FakeBackend {
    calls: Mutex<Vec<String>>,
    progress_queue: Mutex<Vec<JobProgress>>,
    results: Mutex<Vec<EnrichmentResult>>,
    fail_upload: bool,
}

impl FakeBackend {
    fn new() -> Self {
        Self::default()
    }

    fn with_progress(self, responses: Vec<JobProgress>) -> Self {
        *self.progress_queue.lock().expect("lock should be free") = responses;
        self
    }

    fn with_results(self, results: Vec<EnrichmentResult>) -> Self {
        *self.results.lock().expect("lock should be free") = results;
        self
    }

    fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock should be free").clone()
    }

    fn record(&self, call: &str) {
        self.calls
            .lock()
            .expect("lock should be free")
            .push(call.to_string());
    }
}

impl EnrichmentBackend for FakeBackend {
    fn create_upload(&self, _request: &SignedUrlRequest) -> Result<SignedUrlGrant, BackendError> {
        self.record("create_upload");
        if self.fail_upload {
            return Err(BackendError::Http {
                status: 500,
                message: "upload refused".to_string(),
            });
        }
        Ok(SignedUrlGrant {
            url: "https://storage.example.com/upload".to_string(),
            job_id: JobId::from("job-1"),
        })
    }

    fn upload(&self, _url: &str, _content_type: &str, _body: &[u8]) -> Result<(), BackendError> {
        self.record("upload");
        Ok(())
    }

    fn start_job(
        &self,
        job_id: &JobId,
        _request: &StartJobRequest,
    ) -> Result<StartedJob, BackendError> {
        self.record("start_job");
        Ok(StartedJob {
            job_id: job_id.clone(),
            message: "queued".to_string(),
        })
    }

    fn fetch_progress(&self, _job_id: &JobId) -> Result<JobProgress, BackendError> {
        self.record("fetch_progress");
        let mut queue = self.progress_queue.lock().expect("lock should be free");
        if queue.is_empty() {
            return Err(BackendError::Network("no scripted progress".to_string()));
        }
        Ok(queue.remove(0))
    }

    fn fetch_results(
        &self,
        _job_id: &JobId,
        start: u64,
        limit: u64,
    ) -> Result<Vec<EnrichmentResult>, BackendError> {
        self.record("fetch_results");
        let results = self.results.lock().expect("lock should be free");
        let page: Vec<EnrichmentResult> = results
            .iter()
            .skip(start as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(page)
    }

    fn cancel_job(&self, _job_id: &JobId) -> Result<String, BackendError> {
        self.record("cancel_job");
        Ok("Job cancelled".to_string())
    }

    fn list_jobs(&self, _offset: u64, _limit: u64) -> Result<JobList, BackendError> {
        self.record("list_jobs");
        Ok(JobList {
            jobs: Vec::new(),
            total_count: 0,
        })
    }
}

struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().expect("lock should be free");
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("lock should be free")
    }
}

fn request_fixture() -> EnrichmentRequest {
    EnrichmentRequest {
        key_column: "id".to_string(),
        target_column: "email".to_string(),
        kind: EnrichmentKind::Email,
    }
}

#[test]
fn workflow_runs_upload_start_poll_and_completes() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_progress(vec![
                progress_fixture(JobStatus::Running, 100, 40),
                progress_fixture(JobStatus::Completed, 100, 100),
            ])
            .with_results(vec![result_fixture("1", "email", serde_json::json!("a@x.com"))]),
    );
    let clock = Arc::new(ManualClock::new());
    let mut workflow = EnrichmentWorkflow::new(backend.clone(), clock.clone());
    workflow
        .begin(&sample_table(), request_fixture())
        .expect("begin should succeed");

    assert!(matches!(
        workflow.step(),
        StepEvent::Uploaded { .. }
    ));
    assert!(matches!(workflow.step(), StepEvent::Started { .. }));

    clock.advance(Duration::from_secs(2));
    match workflow.step() {
        StepEvent::Progress { percent } => assert_eq!(percent, 40.0),
        other => panic!("expected progress, got {other:?}"),
    }

    clock.advance(Duration::from_secs(2));
    match workflow.step() {
        StepEvent::Finished { results, .. } => assert_eq!(results.len(), 1),
        other => panic!("expected finished, got {other:?}"),
    }

    assert!(matches!(workflow.state(), WorkflowState::Completed { .. }));
    assert_eq!(
        backend.calls(),
        vec![
            "create_upload",
            "upload",
            "start_job",
            "fetch_progress",
            "fetch_progress",
            "fetch_results"
        ]
    );
}

#[test]
fn workflow_does_not_poll_before_the_interval_elapses() {
    let backend = Arc::new(
        FakeBackend::new().with_progress(vec![progress_fixture(JobStatus::Running, 10, 1)]),
    );
    let clock = Arc::new(ManualClock::new());
    let mut workflow = EnrichmentWorkflow::new(backend.clone(), clock.clone());
    workflow
        .begin(&sample_table(), request_fixture())
        .expect("begin should succeed");

    workflow.step();
    workflow.step();
    assert!(matches!(workflow.step(), StepEvent::Waiting { .. }));
    assert!(matches!(workflow.step(), StepEvent::Waiting { .. }));

    assert!(
        !backend.calls().contains(&"fetch_progress".to_string()),
        "no poll should be issued before the deadline"
    );

    clock.advance(Duration::from_secs(2));
    assert!(matches!(workflow.step(), StepEvent::Progress { .. }));
}

#[test]
fn workflow_stops_polling_after_a_cancelled_status() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_progress(vec![progress_fixture(JobStatus::Cancelled, 100, 10)])
            .with_results(vec![result_fixture("1", "email", serde_json::json!("x"))]),
    );
    let clock = Arc::new(ManualClock::new());
    let mut workflow = EnrichmentWorkflow::new(backend.clone(), clock.clone());
    workflow
        .begin(&sample_table(), request_fixture())
        .expect("begin should succeed");

    workflow.step();
    workflow.step();
    clock.advance(Duration::from_secs(2));
    assert_eq!(workflow.step(), StepEvent::CancelledByServer);

    clock.advance(Duration::from_secs(10));
    assert_eq!(workflow.step(), StepEvent::Settled);
    assert_eq!(workflow.step(), StepEvent::Settled);

    let calls = backend.calls();
    let poll_count = calls.iter().filter(|call| *call == "fetch_progress").count();
    assert_eq!(poll_count, 1, "no further polls after cancellation");
    assert!(
        !calls.contains(&"fetch_results".to_string()),
        "cancelled jobs should not fetch results"
    );
}

#[test]
fn workflow_aborts_when_the_upload_fails() {
    let backend = Arc::new(FakeBackend::new().failing_upload());
    let clock = Arc::new(ManualClock::new());
    let mut workflow = EnrichmentWorkflow::new(backend.clone(), clock);
    workflow
        .begin(&sample_table(), request_fixture())
        .expect("begin should succeed");

    match workflow.step() {
        StepEvent::Aborted { message } => {
            assert!(message.contains("500"), "message should carry the status")
        }
        other => panic!("expected abort, got {other:?}"),
    }

    assert!(matches!(workflow.state(), WorkflowState::Failed { .. }));
    assert_eq!(backend.calls(), vec!["create_upload"]);
    assert_eq!(workflow.step(), StepEvent::Settled);
}

#[test]
fn workflow_begin_rejects_empty_tables_and_double_starts() {
    let backend = Arc::new(FakeBackend::new());
    let clock = Arc::new(ManualClock::new());
    let mut workflow = EnrichmentWorkflow::new(backend, clock);

    assert_eq!(
        workflow.begin(&Table::default(), request_fixture()),
        Err(WorkflowError::EmptyTable)
    );

    workflow
        .begin(&sample_table(), request_fixture())
        .expect("begin should succeed");
    assert_eq!(
        workflow.begin(&sample_table(), request_fixture()),
        Err(WorkflowError::AlreadyActive)
    );
}

#[test]
fn cancel_issues_the_backend_call_and_stops_the_workflow() {
    let backend = Arc::new(FakeBackend::new());
    let clock = Arc::new(ManualClock::new());
    let mut workflow = EnrichmentWorkflow::new(backend.clone(), clock.clone());
    workflow
        .begin(&sample_table(), request_fixture())
        .expect("begin should succeed");

    workflow.step();
    workflow.step();

    let message = workflow.cancel().expect("cancel should succeed");
    assert_eq!(message, "Job cancelled");
    assert!(matches!(workflow.state(), WorkflowState::Cancelled { .. }));

    clock.advance(Duration::from_secs(10));
    assert_eq!(workflow.step(), StepEvent::Settled);
    assert!(backend.calls().contains(&"cancel_job".to_string()));
    assert!(!backend.calls().contains(&"fetch_progress".to_string()));
}

#[test]
fn workflow_pages_through_large_result_sets() {
    let results: Vec<EnrichmentResult> = (0..250)
        .map(|idx| result_fixture(&idx.to_string(), "email", serde_json::json!("a@x.com")))
        .collect();
    let backend = Arc::new(
        FakeBackend::new()
            .with_progress(vec![progress_fixture(JobStatus::Completed, 250, 250)])
            .with_results(results),
    );
    let clock = Arc::new(ManualClock::new());
    let mut workflow = EnrichmentWorkflow::new(backend.clone(), clock.clone());
    workflow
        .begin(&sample_table(), request_fixture())
        .expect("begin should succeed");

    workflow.step();
    workflow.step();
    clock.advance(Duration::from_secs(2));
    match workflow.step() {
        StepEvent::Finished { results, .. } => assert_eq!(results.len(), 250),
        other => panic!("expected finished, got {other:?}"),
    }

    let fetches = backend
        .calls()
        .iter()
        .filter(|call| *call == "fetch_results")
        .count();
    assert_eq!(fetches, 2, "250 results should take two pages");
}

// --- wire formats ---

#[test]
fn job_progress_deserializes_the_wire_shape() {
    let progress: JobProgress = serde_json::from_str(
        r#"{
            "job_id": "abc",
            "total_rows": 100,
            "rows_by_stage": {"PENDING": 10, "SERP_FETCHED": 5, "COMPLETED": 40},
            "started_at": "2025-06-01T10:00:00Z",
            "status": "RUNNING"
        }"#,
    )
    .expect("progress should deserialize");

    assert_eq!(progress.status, JobStatus::Running);
    assert_eq!(progress.percent_complete(), 40.0);
}

#[test]
fn job_list_deserializes_timestamps() {
    let list: JobList = serde_json::from_str(
        r#"{
            "jobs": [{
                "job_id": "abc",
                "status": "COMPLETED",
                "total_rows": 3,
                "file_path": "uploads/abc.csv",
                "created_at": "2025-06-01T10:00:00Z",
                "started_at": "2025-06-01T10:00:05Z"
            }],
            "total_count": 1
        }"#,
    )
    .expect("job list should deserialize");

    assert_eq!(list.total_count, 1);
    let job: &JobSummary = &list.jobs[0];
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.started_at.is_some());
}

#[test]
fn signed_url_request_serializes_camel_case() {
    let request = SignedUrlRequest {
        content_type: "text/csv".to_string(),
        length: 42,
    };

    let json = serde_json::to_value(&request).expect("request should serialize");

    assert_eq!(json, serde_json::json!({"contentType": "text/csv", "length": 42}));
}

#[test]
fn start_job_request_serializes_wire_names() {
    let kind = EnrichmentKind::Email;
    let request = StartJobRequest {
        key_column: "id".to_string(),
        columns_metadata: vec![crate::usecase::ports::backend::ColumnMetadata {
            name: "email".to_string(),
            data_type: kind.data_type().wire_name().to_string(),
            description: kind.description(),
        }],
    };

    let json = serde_json::to_value(&request).expect("request should serialize");

    assert_eq!(
        json,
        serde_json::json!({
            "key_column": "id",
            "columns_metadata": [{
                "name": "email",
                "type": "string",
                "description": "Enriched email data"
            }]
        })
    );
}

#[test]
fn error_message_prefers_message_then_code() {
    assert_eq!(
        extract_error_message(r#"{"message": "job not found"}"#),
        Some("job not found".to_string())
    );
    assert_eq!(
        extract_error_message(r#"{"code": "NOT_FOUND"}"#),
        Some("NOT_FOUND".to_string())
    );
    assert_eq!(extract_error_message("plain text"), None);
}

// --- config & export naming ---

#[test]
fn config_round_trips_through_the_file() {
    let temp_dir = unique_test_dir("config");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let path = temp_dir.join("config.json");

    let config = ApiConfig {
        base_url: "https://api.example.com".to_string(),
        token: Some("secret".to_string()),
    };
    config.save_file(&path).expect("save should succeed");

    let loaded = ApiConfig::load_file(&path).expect("load should succeed");
    assert_eq!(loaded, config);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn missing_config_defaults_to_localhost() {
    let config = ApiConfig::default();

    assert_eq!(config.base_url, "http://localhost:8080");
    assert!(!config.is_signed_in());
}

#[test]
fn export_name_uses_the_original_file_stem() {
    assert_eq!(default_export_name(Some("people.csv")), "enriched-people.csv");
    assert_eq!(default_export_name(Some("leads.json")), "enriched-leads.csv");
    assert_eq!(default_export_name(None), "enriched-data.csv");
}
