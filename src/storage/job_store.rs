use crate::config::JobStoreConfig;
use crate::queue::jobs::{Job, JobUpdate};
use crate::storage::JobStore;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const WORKER_SECRET_HEADER: &str = "x-worker-secret";

#[derive(Serialize)]
struct FetchJobRequest<'a> {
    job_id: &'a str,
}

#[derive(Deserialize)]
struct FetchJobResponse {
    #[serde(default)]
    job: Option<Job>,
}

#[derive(Serialize)]
struct UpdateJobRequest<'a> {
    job_id: &'a str,
    updates: &'a JobUpdate,
}

/// Job store client backed by the store's internal HTTP functions
pub struct HttpJobStore {
    client: Client,
    base_url: String,
    worker_secret: String,
}

impl HttpJobStore {
    pub fn new(config: &JobStoreConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &JobStoreConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            worker_secret: config.worker_secret.clone(),
        }
    }
}

#[async_trait]
impl JobStore for HttpJobStore {
    async fn fetch_job(&self, job_id: &str) -> AppResult<Option<Job>> {
        let url = format!("{}/get-research-job-internal", self.base_url);
        debug!(job_id = %job_id, "Fetching job");

        let response = self
            .client
            .post(&url)
            .header(WORKER_SECRET_HEADER, &self.worker_secret)
            .json(&FetchJobRequest { job_id })
            .send()
            .await
            .map_err(|e| AppError::JobStore(format!("Failed to get job: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::JobStore(format!("Failed to get job: {}", status)));
        }

        let body: FetchJobResponse = response
            .json()
            .await
            .map_err(|e| AppError::JobStore(format!("Failed to parse job response: {}", e)))?;

        Ok(body.job)
    }

    async fn update_job(&self, job_id: &str, updates: &JobUpdate) -> AppResult<()> {
        let url = format!("{}/update-research-job", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(WORKER_SECRET_HEADER, &self.worker_secret)
            .json(&UpdateJobRequest { job_id, updates })
            .send()
            .await
            .map_err(|e| AppError::JobStore(format!("Failed to update job: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::JobStore(format!(
                "Failed to update job: {} - {}",
                status, text
            )));
        }

        Ok(())
    }
}
