//! Job Store
//!
//! The research job record lives in an external store reached over HTTP.
//! The worker only ever fetches a job by id and applies partial updates by id.

pub mod job_store;

pub use job_store::HttpJobStore;

use crate::queue::jobs::{Job, JobUpdate};
use crate::types::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch a job. `Ok(None)` means the store has no such job.
    async fn fetch_job(&self, job_id: &str) -> AppResult<Option<Job>>;

    /// Apply a partial update to a job
    async fn update_job(&self, job_id: &str, updates: &JobUpdate) -> AppResult<()>;
}
