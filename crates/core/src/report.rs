//! Report generation boundary.
//!
//! The core hands a [`ReportRequest`] to a [`ReportGenerator`] and gets back either a
//! [`GeneratedReport`] or a [`GenerationError`]. It never inspects the generated text and
//! never substitutes a fallback report when generation fails.

use crate::formatter::ReportContext;
use crate::profile::BusinessProfile;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the generator needs to write a report.
#[derive(Clone, Debug)]
pub struct ReportRequest {
    pub profile: BusinessProfile,
    pub context: ReportContext,
}

/// Generated report text and minimal metadata.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedReport {
    pub content: String,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub tokens_used: Option<u32>,
    /// Wall-clock seconds spent in the generator.
    pub processing_time: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("report generator is not configured")]
    NotConfigured,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("generator API returned status {status}: {body}")]
    ApiStatus { status: u16, body: String },
    #[error("malformed generator response: {0}")]
    MalformedResponse(String),
    #[error("generator returned an empty report")]
    EmptyResponse,
}

/// Outcome of a generator connection check.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub ok: bool,
    pub model: String,
    pub message: String,
}

/// A service that turns report context into prose.
#[async_trait::async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Model identifier reported alongside generated text.
    fn model(&self) -> &str;

    async fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport, GenerationError>;

    /// Issue a minimal request and report whether the generator answered.
    async fn test_connection(&self) -> ConnectionStatus;
}
