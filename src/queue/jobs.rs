// Research job record and the partial updates the worker sends back to the store

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a research job. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A research job as returned by the job store.
///
/// Only the input fields matter to the worker; the rest are read leniently so
/// a record in any state deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub product_name: String,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub niche: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub progress: Option<u8>,
    /// Kept as the store sent it; see [`Job::created_at`]
    #[serde(default, rename = "created_at")]
    pub created_at_raw: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Job {
    /// Niche with empty strings treated as missing
    pub fn niche(&self) -> Option<&str> {
        self.niche.as_deref().filter(|n| !n.trim().is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.product_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    /// Creation time, if the store's timestamp is RFC 3339 or Postgres text
    /// output (`2025-01-05 10:00:00+00`). Anything else reads as `None`.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at_raw.as_deref()?.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }

        for format in ["%Y-%m-%d %H:%M:%S%#z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
            if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
                return Some(parsed.with_timezone(&Utc));
            }
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Partial job update. Unset fields are left out of the payload entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_research: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
    /// `Some(None)` serializes as an explicit `null`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_research: Option<Option<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    /// Progress checkpoint with a stage message
    pub fn progress(progress: u8, message: impl Into<String>) -> Self {
        Self {
            progress: Some(progress),
            stage_message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn running(progress: u8, message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Running),
            started_at: Some(Utc::now()),
            ..Self::progress(progress, message)
        }
    }

    pub fn with_research(mut self, raw_research: String, citations: Vec<String>) -> Self {
        self.raw_research = Some(raw_research);
        self.citations = Some(citations);
        self
    }

    pub fn completed(message: impl Into<String>, parsed_research: Option<serde_json::Value>) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            parsed_research: Some(parsed_research),
            completed_at: Some(Utc::now()),
            ..Self::progress(100, message)
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error_message: Some(error_message.into()),
            completed_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(|s| s.is_terminal())
    }
}
