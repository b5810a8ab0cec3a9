use crate::report::GenerationError;

#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid business profile: {0}")]
    InvalidProfile(String),
    #[error("unknown sample profile: {0}")]
    UnknownSampleProfile(String),

    #[error("failed to load regulatory corpus: {0}")]
    Corpus(#[from] regubiz_corpus::CorpusError),

    #[error("report generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("cannot apply {event} while in the {from} view")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },
}

pub type ComplianceResult<T> = std::result::Result<T, ComplianceError>;
