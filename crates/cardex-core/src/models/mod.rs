//! Data models for the extraction client.

pub mod config;
pub mod job;
pub mod record;
