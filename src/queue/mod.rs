//! Research jobs and the worker that processes them.
//!
//! Jobs are not queued in-process: each start signal spawns one independent
//! run, and all job state lives in the external job store.

pub mod jobs;
pub mod workers;

pub use jobs::{Job, JobStatus, JobUpdate};
pub use workers::{ResearchWorker, RunOutcome};
