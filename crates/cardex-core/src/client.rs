//! Extraction client: sync prediction, job submission and polling.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{CardexError, Result};
use crate::models::config::ClientConfig;
use crate::models::job::{Job, JobStatus};
use crate::models::record::ExtractedRecord;
use crate::parse::parse_response;
use crate::transport::{HttpTransport, Transport};

/// Synchronous prediction endpoint.
pub const PREDICT_PATH: &str = "predict";

/// Job submission endpoint.
pub const PREDICT_ASYNC_PATH: &str = "predict_async";

/// Job status endpoint for a job id. The id is percent-encoded as one path segment.
pub fn queue_path(job_id: &str) -> String {
    format!("documents/queue/{}", urlencoding::encode(job_id))
}

/// Which provider path to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Single request, prediction in the response.
    #[default]
    Sync,
    /// Submit a job and poll until it finishes.
    Async,
}

impl From<bool> for ExtractionMode {
    fn from(use_async: bool) -> Self {
        if use_async {
            ExtractionMode::Async
        } else {
            ExtractionMode::Sync
        }
    }
}

/// Fixed-interval polling parameters.
///
/// The effective timeout is `max_attempts` status queries, not a wall-clock
/// deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Maximum number of status queries.
    pub max_attempts: u32,
    /// Wait between consecutive queries.
    pub delay: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay: Duration::from_millis(2000),
        }
    }
}

/// Client for the business card prediction provider.
pub struct ExtractionClient<T: Transport = HttpTransport> {
    transport: T,
    poll: PollOptions,
}

impl ExtractionClient<HttpTransport> {
    /// Build a client talking HTTP to the configured provider.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, &config))
    }
}

impl<T: Transport> ExtractionClient<T> {
    /// Build a client over an arbitrary transport.
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            poll: config.poll_options(),
        }
    }

    /// Default polling options of this client.
    pub fn poll_options(&self) -> PollOptions {
        self.poll
    }

    /// Extract a record from a document using the given mode.
    pub async fn extract(&self, document: &Document, mode: ExtractionMode) -> Result<ExtractedRecord> {
        debug!("Extracting from {} ({:?})", document.kind(), mode);
        match mode {
            ExtractionMode::Sync => self.extract_sync(document).await,
            ExtractionMode::Async => self.extract_async(document).await,
        }
    }

    /// Single-request extraction. No retry.
    pub async fn extract_sync(&self, document: &Document) -> Result<ExtractedRecord> {
        let encoded = document.encode()?;
        let response = self.transport.post_document(PREDICT_PATH, &encoded).await?;
        Ok(parse_response(&response))
    }

    /// Job-based extraction with the client's default polling options.
    pub async fn extract_async(&self, document: &Document) -> Result<ExtractedRecord> {
        self.extract_async_with(document, self.poll).await
    }

    /// Job-based extraction with explicit polling options.
    pub async fn extract_async_with(
        &self,
        document: &Document,
        options: PollOptions,
    ) -> Result<ExtractedRecord> {
        let job = self.submit_job(document).await?;
        self.poll_job(&job.id, options).await
    }

    /// Submit a document for asynchronous processing.
    pub async fn submit_job(&self, document: &Document) -> Result<Job> {
        let encoded = document.encode()?;
        let response = self
            .transport
            .post_document(PREDICT_ASYNC_PATH, &encoded)
            .await?;

        let id = read_job_id(&response).ok_or(CardexError::MissingJobId)?;
        info!("Submitted job {}", id);
        Ok(Job::pending(id))
    }

    /// Poll a job until it completes, fails, or runs out of attempts.
    pub async fn poll_job(&self, job_id: &str, options: PollOptions) -> Result<ExtractedRecord> {
        let path = queue_path(job_id);

        for attempt in 1..=options.max_attempts {
            let response = self.transport.get_json(&path).await?;

            match read_status(&response) {
                JobStatus::Completed => {
                    info!("Job {} completed after {} attempt(s)", job_id, attempt);
                    return Ok(parse_response(&response));
                }
                JobStatus::Failed => {
                    return Err(CardexError::Processing {
                        job_id: job_id.to_string(),
                    });
                }
                JobStatus::Pending(status) => {
                    debug!(
                        "Job {} is '{}' (attempt {}/{})",
                        job_id, status, attempt, options.max_attempts
                    );
                    if attempt < options.max_attempts {
                        tokio::time::sleep(options.delay).await;
                    }
                }
            }
        }

        Err(CardexError::Timeout {
            job_id: job_id.to_string(),
            attempts: options.max_attempts,
        })
    }
}

fn read_job_id(response: &Value) -> Option<String> {
    let id = match response.get("job_id") {
        Some(id) if !id.is_null() => id,
        _ => response.pointer("/job/id")?,
    };
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_status(response: &Value) -> JobStatus {
    let status = response
        .get("status")
        .and_then(Value::as_str)
        .or_else(|| response.pointer("/job/status").and_then(Value::as_str))
        .unwrap_or("");
    JobStatus::from_str(status)
}
