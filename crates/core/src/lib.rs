//! # Regu-Biz Core
//!
//! Core business logic for the Regu-Biz compliance questionnaire.
//!
//! This crate contains pure matching and formatting operations:
//! - Business profile validation
//! - Requirement matching with conflict resolution and priority annotation
//! - Context formatting for the report generator
//! - The [`ReportGenerator`] boundary and the questionnaire [`ViewState`] machine
//!
//! **No API concerns**: HTTP servers, LLM clients and environment handling belong in
//! `api-rest`, `regubiz-llm` and the binaries.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatter;
pub mod matcher;
pub mod profile;
pub mod report;
pub mod samples;
pub mod service;
pub mod validation;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{ApplicableThresholds, Corpus, CorpusStatistics};
pub use config::{resolve_corpus_path, CoreConfig};
pub use error::{ComplianceError, ComplianceResult};
pub use formatter::{format_context, ReportContext};
pub use matcher::{match_clauses, MatchResult, MatchedClause, Priority, ResolvedConflict};
pub use profile::{BusinessProfile, ProfileSummary, QuestionnaireAnswers};
pub use report::{ConnectionStatus, GeneratedReport, GenerationError, ReportGenerator, ReportRequest};
pub use samples::{sample_profile, sample_profiles, SAMPLE_PROFILE_NAMES};
pub use service::ComplianceService;
pub use view::{ViewEvent, ViewState};

// Corpus types that appear in the public API.
pub use regubiz_corpus::{ClauseData, FeatureFlag};
