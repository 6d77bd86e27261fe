use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::domain::entities::job::{EnrichmentResult, JobId, JobStatus};
use crate::domain::entities::table::Table;
use crate::domain::entities::value::{CellValue, DataType};
use crate::infra::codec::csv;
use crate::usecase::ports::backend::{
    BackendError, ColumnMetadata, EnrichmentBackend, SignedUrlRequest, StartJobRequest,
};
use crate::usecase::ports::clock::Clock;

pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const CSV_CONTENT_TYPE: &str = "text/csv";
const RESULTS_PAGE_SIZE: u64 = 200;

/// What the backend can fill in. The kind maps to a wire column type plus the
/// human-readable description sent with the start-job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentKind {
    Email,
    Phone,
    Company,
    Location,
    Number,
    Boolean,
    Text,
}

impl EnrichmentKind {
    pub const ALL: [EnrichmentKind; 7] = [
        EnrichmentKind::Email,
        EnrichmentKind::Phone,
        EnrichmentKind::Company,
        EnrichmentKind::Location,
        EnrichmentKind::Number,
        EnrichmentKind::Boolean,
        EnrichmentKind::Text,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            EnrichmentKind::Email => "email",
            EnrichmentKind::Phone => "phone",
            EnrichmentKind::Company => "company",
            EnrichmentKind::Location => "location",
            EnrichmentKind::Number => "number",
            EnrichmentKind::Boolean => "boolean",
            EnrichmentKind::Text => "text",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnrichmentKind::Email => "Email",
            EnrichmentKind::Phone => "Phone Number",
            EnrichmentKind::Company => "Company Name",
            EnrichmentKind::Location => "Location",
            EnrichmentKind::Number => "Number",
            EnrichmentKind::Boolean => "Boolean",
            EnrichmentKind::Text => "Text",
        }
    }

    pub fn from_key(key: &str) -> Option<EnrichmentKind> {
        EnrichmentKind::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn data_type(&self) -> DataType {
        match self {
            EnrichmentKind::Number => DataType::Number,
            EnrichmentKind::Boolean => DataType::Boolean,
            _ => DataType::String,
        }
    }

    pub fn description(&self) -> String {
        format!("Enriched {} data", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRequest {
    pub key_column: String,
    pub target_column: String,
    pub kind: EnrichmentKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    Uploading {
        snapshot: Vec<u8>,
        request: EnrichmentRequest,
    },
    AwaitingJobStart {
        job_id: JobId,
        request: EnrichmentRequest,
    },
    Polling {
        job_id: JobId,
        request: EnrichmentRequest,
        next_poll_at: Instant,
        percent: f64,
    },
    Completed {
        job_id: JobId,
        request: EnrichmentRequest,
        results: Vec<EnrichmentResult>,
    },
    Cancelled {
        job_id: Option<JobId>,
    },
    Failed {
        message: String,
    },
}

/// Outcome of a single `step`, for the caller to render.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Uploaded {
        job_id: JobId,
    },
    Started {
        job_id: JobId,
    },
    Waiting {
        remaining: Duration,
    },
    Progress {
        percent: f64,
    },
    Finished {
        request: EnrichmentRequest,
        results: Vec<EnrichmentResult>,
    },
    CancelledByServer,
    Aborted {
        message: String,
    },
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    AlreadyActive,
    EmptyTable,
    Snapshot(String),
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowError::AlreadyActive => write!(f, "an enrichment job is already running"),
            WorkflowError::EmptyTable => write!(f, "the table has no rows to enrich"),
            WorkflowError::Snapshot(message) => {
                write!(f, "failed to snapshot the table: {message}")
            }
        }
    }
}

impl std::error::Error for WorkflowError {}

/// Sequences upload, job start, progress polling, and the one-shot result
/// fetch. `step` performs at most one transition per call; once a terminal
/// state is reached no further backend requests are made.
pub struct EnrichmentWorkflow {
    backend: Arc<dyn EnrichmentBackend>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    state: WorkflowState,
}

impl EnrichmentWorkflow {
    pub fn new(backend: Arc<dyn EnrichmentBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            poll_interval: POLL_INTERVAL,
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            WorkflowState::Uploading { .. }
                | WorkflowState::AwaitingJobStart { .. }
                | WorkflowState::Polling { .. }
        )
    }

    /// Snapshots the current table as CSV and arms the workflow. The snapshot
    /// includes any local edits made since the file was loaded.
    pub fn begin(&mut self, table: &Table, request: EnrichmentRequest) -> Result<(), WorkflowError> {
        if self.is_active() {
            return Err(WorkflowError::AlreadyActive);
        }
        if table.rows.is_empty() {
            return Err(WorkflowError::EmptyTable);
        }
        let snapshot = csv::write_table(table)
            .map_err(|err| WorkflowError::Snapshot(err.to_string()))?
            .into_bytes();
        info!(
            key_column = %request.key_column,
            target_column = %request.target_column,
            kind = request.kind.key(),
            bytes = snapshot.len(),
            "starting enrichment"
        );
        self.state = WorkflowState::Uploading { snapshot, request };
        Ok(())
    }

    pub fn step(&mut self) -> StepEvent {
        let state = std::mem::replace(&mut self.state, WorkflowState::Idle);
        match state {
            WorkflowState::Idle => {
                self.state = WorkflowState::Idle;
                StepEvent::Settled
            }
            WorkflowState::Uploading { snapshot, request } => match self.run_upload(&snapshot) {
                Ok(job_id) => {
                    debug!(%job_id, "snapshot uploaded");
                    self.state = WorkflowState::AwaitingJobStart {
                        job_id: job_id.clone(),
                        request,
                    };
                    StepEvent::Uploaded { job_id }
                }
                Err(err) => self.abort(err),
            },
            WorkflowState::AwaitingJobStart { job_id, request } => {
                let start = StartJobRequest {
                    key_column: request.key_column.clone(),
                    columns_metadata: vec![ColumnMetadata {
                        name: request.target_column.clone(),
                        data_type: request.kind.data_type().wire_name().to_string(),
                        description: request.kind.description(),
                    }],
                };
                match self.backend.start_job(&job_id, &start) {
                    Ok(started) => {
                        info!(job_id = %started.job_id, "enrichment job started");
                        self.state = WorkflowState::Polling {
                            job_id: started.job_id.clone(),
                            request,
                            next_poll_at: self.clock.now() + self.poll_interval,
                            percent: 0.0,
                        };
                        StepEvent::Started {
                            job_id: started.job_id,
                        }
                    }
                    Err(err) => self.abort(err),
                }
            }
            WorkflowState::Polling {
                job_id,
                request,
                next_poll_at,
                percent,
            } => {
                let now = self.clock.now();
                if now < next_poll_at {
                    let remaining = next_poll_at - now;
                    self.state = WorkflowState::Polling {
                        job_id,
                        request,
                        next_poll_at,
                        percent,
                    };
                    return StepEvent::Waiting { remaining };
                }
                match self.backend.fetch_progress(&job_id) {
                    Ok(progress) => match progress.status {
                        JobStatus::Completed => match self.fetch_all_results(&job_id) {
                            Ok(results) => {
                                info!(%job_id, results = results.len(), "enrichment completed");
                                self.state = WorkflowState::Completed {
                                    job_id,
                                    request: request.clone(),
                                    results: results.clone(),
                                };
                                StepEvent::Finished { request, results }
                            }
                            Err(err) => self.abort(err),
                        },
                        JobStatus::Cancelled => {
                            warn!(%job_id, "enrichment cancelled by the backend");
                            self.state = WorkflowState::Cancelled {
                                job_id: Some(job_id),
                            };
                            StepEvent::CancelledByServer
                        }
                        _ => {
                            let percent = progress.percent_complete();
                            debug!(%job_id, percent, "enrichment progress");
                            self.state = WorkflowState::Polling {
                                job_id,
                                request,
                                next_poll_at: now + self.poll_interval,
                                percent,
                            };
                            StepEvent::Progress { percent }
                        }
                    },
                    Err(err) => self.abort(err),
                }
            }
            terminal => {
                self.state = terminal;
                StepEvent::Settled
            }
        }
    }

    /// Cooperative cancellation: the local state machine always stops, and a
    /// cancel call is issued when the backend already knows about the job.
    pub fn cancel(&mut self) -> Result<String, BackendError> {
        let job_id = match &self.state {
            WorkflowState::AwaitingJobStart { job_id, .. } => Some(job_id.clone()),
            WorkflowState::Polling { job_id, .. } => Some(job_id.clone()),
            _ => None,
        };
        self.state = WorkflowState::Cancelled {
            job_id: job_id.clone(),
        };
        match job_id {
            Some(job_id) => {
                info!(%job_id, "cancelling enrichment job");
                self.backend.cancel_job(&job_id)
            }
            None => Ok("Enrichment cancelled".to_string()),
        }
    }

    fn run_upload(&self, snapshot: &[u8]) -> Result<JobId, BackendError> {
        let grant = self.backend.create_upload(&SignedUrlRequest {
            content_type: CSV_CONTENT_TYPE.to_string(),
            length: snapshot.len() as u64,
        })?;
        self.backend
            .upload(&grant.url, CSV_CONTENT_TYPE, snapshot)?;
        Ok(grant.job_id)
    }

    fn fetch_all_results(&self, job_id: &JobId) -> Result<Vec<EnrichmentResult>, BackendError> {
        let mut results = Vec::new();
        let mut start = 0;
        loop {
            let page = self
                .backend
                .fetch_results(job_id, start, RESULTS_PAGE_SIZE)?;
            let page_len = page.len() as u64;
            results.extend(page);
            if page_len < RESULTS_PAGE_SIZE {
                return Ok(results);
            }
            start += page_len;
        }
    }

    fn abort(&mut self, err: BackendError) -> StepEvent {
        warn!(%err, "enrichment aborted");
        let message = err.to_string();
        self.state = WorkflowState::Failed {
            message: message.clone(),
        };
        StepEvent::Aborted { message }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub matched: usize,
    pub unmatched: usize,
}

/// Patches rows by exact string equality between the result key and the key
/// column's rendered value. Unmatched results are skipped, not errors; the
/// counts let the caller report how much of the table was actually enriched.
pub fn merge_results(
    table: &Table,
    key_column: &str,
    target_column: &str,
    results: &[EnrichmentResult],
) -> (Table, MergeOutcome) {
    let target_type = table
        .column(target_column)
        .map(|column| column.data_type)
        .unwrap_or(DataType::String);

    let mut next = table.clone();
    let mut outcome = MergeOutcome::default();
    for result in results {
        let row_index = next
            .rows
            .iter()
            .position(|row| row.get(key_column).display() == result.key);
        let Some(row_index) = row_index else {
            outcome.unmatched += 1;
            continue;
        };
        let Some(value) = result.extracted_data.get(target_column) else {
            outcome.unmatched += 1;
            continue;
        };
        match CellValue::from_json(value) {
            Some(cell) => {
                next.rows[row_index].set(target_column, cell.coerced_to(target_type));
                outcome.matched += 1;
            }
            None => {
                outcome.unmatched += 1;
            }
        }
    }
    (next, outcome)
}
