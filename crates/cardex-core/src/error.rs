//! Error types for the cardex-core library.

use thiserror::Error;

/// Main error type for the cardex library.
#[derive(Error, Debug)]
pub enum CardexError {
    /// The provider answered with a non-success HTTP status.
    #[error("provider error: {status} {message}")]
    Provider { status: u16, message: String },

    /// The provider reported that the job failed.
    #[error("processing failed for job {job_id}")]
    Processing { job_id: String },

    /// Polling exhausted its attempts without a terminal status.
    #[error("job {job_id} did not finish after {attempts} poll attempts")]
    Timeout { job_id: String, attempts: u32 },

    /// The submit response carried no job identifier.
    #[error("job submission response contained no job id")]
    MissingJobId,

    /// Document could not be encoded for upload.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Network or decoding failure in the HTTP layer.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to document encoding.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// The document has no content.
    #[error("document is empty")]
    Empty,

    /// The payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),

    /// The string starts with `data:` but is not a well-formed data URL.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),
}

/// Errors raised while walking a provider response.
///
/// These never escape [`crate::parse::parse_response`]; they are folded into
/// the record's `error` field instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A required key is missing.
    #[error("missing key: {0}")]
    MissingKey(&'static str),

    /// A key is present but does not hold an object.
    #[error("expected an object at {0}")]
    NotAnObject(&'static str),

    /// The first candidate of a category is null.
    #[error("malformed entry in category {category}")]
    MalformedEntry { category: &'static str },
}

impl CardexError {
    /// HTTP status carried by a provider error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CardexError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for the cardex library.
pub type Result<T> = std::result::Result<T, CardexError>;
