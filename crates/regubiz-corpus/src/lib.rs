//! Regulatory corpus wire/boundary support.
//!
//! This crate translates the static JSON document produced by the offline regulation
//! extraction step into domain-level clause and threshold values.
//!
//! This crate focuses on:
//! - strict wire models for individual corpus entries
//! - tolerant document loading: a malformed entry is skipped and reported, never fatal
//! - translation between wire structs and domain primitives
//!
//! Matching semantics live in `regubiz-core`. This crate only knows what a clause *says*.

pub mod band;
pub mod clause;
pub mod document;
pub mod feature;
pub mod thresholds;

// Re-export facades
pub use document::RegulatoryDocument;

// Re-export public domain-level types
pub use band::Band;
pub use clause::{Applicability, ClauseData, SourceRef};
pub use document::{DocumentData, DocumentMetadata, SkippedEntry};
pub use feature::FeatureFlag;
pub use thresholds::{
    CombinedThreshold, ThresholdData, ThresholdDimension, ThresholdTable, TriggerType,
};

/// Errors returned by the `regubiz-corpus` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`CorpusError`].
pub type CorpusResult<T> = Result<T, CorpusError>;
