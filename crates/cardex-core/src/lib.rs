//! Core library for business card extraction.
//!
//! This crate provides:
//! - Document classification and encoding (raw bytes, base64, data URLs, remote URLs)
//! - A client for the provider's sync and job-based (async) prediction endpoints
//! - Fixed-interval job polling with bounded attempts
//! - Normalization of provider predictions into a flat record with confidence buckets

pub mod client;
pub mod document;
pub mod error;
pub mod models;
pub mod parse;
pub mod transport;

pub use client::{ExtractionClient, ExtractionMode, PollOptions};
pub use document::{Document, EncodedDocument};
pub use error::{CardexError, DocumentError, ParseError, Result};
pub use models::config::{ClientConfig, PollConfig};
pub use models::job::{Job, JobStatus};
pub use models::record::{confidence_level, ConfidenceLevel, ExtractedRecord, FieldCategory};
pub use parse::parse_response;
pub use transport::{HttpTransport, Transport};
