use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;

use crate::domain::entities::job::{EnrichmentResult, JobId, JobProgress};
use crate::infra::config::ApiConfig;
use crate::usecase::ports::backend::{
    BackendError, EnrichmentBackend, JobList, SignedUrlGrant, SignedUrlRequest, StartJobRequest,
    StartedJob,
};

const SIGNED_URL_PATH: &str = "/api/v1/enrichment-signed-url";
const JOBS_PATH: &str = "/api/v1/jobs";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct CancelMessage {
    message: String,
}

/// `ureq` implementation of the backend port. Every API call carries the
/// bearer token; the PUT against the signed URL does not.
pub struct HttpBackend {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn job_url(&self, job_id: &JobId, action: &str) -> String {
        format!("{}{}/{}/{}", self.base_url, JOBS_PATH, job_id, action)
    }

    fn bearer<Any>(&self, request: ureq::RequestBuilder<Any>) -> ureq::RequestBuilder<Any> {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }
}

impl EnrichmentBackend for HttpBackend {
    fn create_upload(&self, request: &SignedUrlRequest) -> Result<SignedUrlGrant, BackendError> {
        debug!(length = request.length, "requesting signed upload url");
        read_json(
            self.bearer(self.agent.post(self.url(SIGNED_URL_PATH)))
                .send_json(request),
        )
    }

    fn upload(&self, url: &str, content_type: &str, body: &[u8]) -> Result<(), BackendError> {
        debug!(bytes = body.len(), "uploading snapshot");
        let mut response = self
            .agent
            .put(url)
            .header("Content-Type", content_type)
            .send(body)
            .map_err(network_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(http_error(status.as_u16(), &mut response));
        }
        Ok(())
    }

    fn start_job(
        &self,
        job_id: &JobId,
        request: &StartJobRequest,
    ) -> Result<StartedJob, BackendError> {
        debug!(%job_id, key_column = %request.key_column, "starting job");
        read_json(
            self.bearer(self.agent.post(self.job_url(job_id, "start")))
                .send_json(request),
        )
    }

    fn fetch_progress(&self, job_id: &JobId) -> Result<JobProgress, BackendError> {
        read_json(
            self.bearer(self.agent.get(self.job_url(job_id, "progress")))
                .call(),
        )
    }

    fn fetch_results(
        &self,
        job_id: &JobId,
        start: u64,
        limit: u64,
    ) -> Result<Vec<EnrichmentResult>, BackendError> {
        read_json(
            self.bearer(self.agent.get(self.job_url(job_id, "results")))
                .query("start", start.to_string())
                .query("limit", limit.to_string())
                .call(),
        )
    }

    fn cancel_job(&self, job_id: &JobId) -> Result<String, BackendError> {
        let cancelled: CancelMessage = read_json(
            self.bearer(self.agent.post(self.job_url(job_id, "cancel")))
                .send_empty(),
        )?;
        Ok(cancelled.message)
    }

    fn list_jobs(&self, offset: u64, limit: u64) -> Result<JobList, BackendError> {
        read_json(
            self.bearer(self.agent.get(self.url(JOBS_PATH)))
                .query("offset", offset.to_string())
                .query("limit", limit.to_string())
                .call(),
        )
    }
}

fn network_error(err: ureq::Error) -> BackendError {
    BackendError::Network(err.to_string())
}

fn read_json<T: DeserializeOwned>(
    result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<T, BackendError> {
    let mut response = result.map_err(network_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(http_error(status.as_u16(), &mut response));
    }
    response
        .body_mut()
        .read_json::<T>()
        .map_err(|err| BackendError::Network(format!("failed to decode response: {err}")))
}

fn http_error(status: u16, response: &mut ureq::http::Response<ureq::Body>) -> BackendError {
    let body = response.body_mut().read_to_string().unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or_else(|| status_text(status));
    BackendError::Http { status, message }
}

/// The server reports failures as `{"message": ...}` or `{"code": ...}`;
/// anything else falls back to the HTTP status text.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|field| field.as_str())
        .or_else(|| value.get("code").and_then(|field| field.as_str()))
        .map(str::to_string)
}

fn status_text(status: u16) -> String {
    ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}
