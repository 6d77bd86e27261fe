use serde::{Deserialize, Serialize};

use crate::domain::entities::job::{EnrichmentResult, JobId, JobProgress, JobSummary};

/// Failure taxonomy for backend calls. A rejected transport attempt is
/// `Network`; a non-2xx response is `Http` with the message the server put in
/// its JSON body. Neither is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    Network(String),
    Http { status: u16, message: String },
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Network(message) => write!(f, "network error: {message}"),
            BackendError::Http { status, message } => write!(f, "HTTP {status}: {message}"),
        }
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlRequest {
    pub content_type: String,
    pub length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlGrant {
    pub url: String,
    pub job_id: JobId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartJobRequest {
    pub key_column: String,
    pub columns_metadata: Vec<ColumnMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartedJob {
    pub job_id: JobId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobList {
    pub jobs: Vec<JobSummary>,
    pub total_count: u64,
}

pub trait EnrichmentBackend: Send + Sync {
    fn create_upload(&self, request: &SignedUrlRequest) -> Result<SignedUrlGrant, BackendError>;

    fn upload(&self, url: &str, content_type: &str, body: &[u8]) -> Result<(), BackendError>;

    fn start_job(
        &self,
        job_id: &JobId,
        request: &StartJobRequest,
    ) -> Result<StartedJob, BackendError>;

    fn fetch_progress(&self, job_id: &JobId) -> Result<JobProgress, BackendError>;

    fn fetch_results(
        &self,
        job_id: &JobId,
        start: u64,
        limit: u64,
    ) -> Result<Vec<EnrichmentResult>, BackendError>;

    fn cancel_job(&self, job_id: &JobId) -> Result<String, BackendError>;

    fn list_jobs(&self, offset: u64, limit: u64) -> Result<JobList, BackendError>;
}
