//! Asynchronous job handle.

use serde::{Deserialize, Serialize};

/// Server-side processing job created by a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Opaque job identifier.
    pub id: String,
    /// Last observed status.
    pub status: JobStatus,
}

impl Job {
    /// A freshly submitted job.
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending("waiting".to_string()),
        }
    }
}

/// Job status as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Any non-terminal status; keeps the provider's wording.
    Pending(String),
    /// The prediction is ready.
    Completed,
    /// The provider gave up on the job.
    Failed,
}

impl JobStatus {
    /// Map a provider status string. Anything unknown is still pending.
    pub fn from_str(s: &str) -> Self {
        match s {
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            other => JobStatus::Pending(other.to_string()),
        }
    }

    /// Whether polling should stop.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending(_))
    }
}
