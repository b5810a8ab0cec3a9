use regubiz_core::GenerationError;

/// Errors from the chat-completions client.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid LLM configuration: {0}")]
    Config(String),

    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode response from {endpoint}: {message}")]
    Deserialization { endpoint: String, message: String },

    #[error("model returned no report text")]
    EmptyCompletion,
}

pub type LlmResult<T> = std::result::Result<T, LlmError>;

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Config(_) => GenerationError::NotConfigured,
            LlmError::Http { source, .. } => GenerationError::Transport(source.to_string()),
            LlmError::ApiError { status, body, .. } => GenerationError::ApiStatus { status, body },
            LlmError::Deserialization { message, .. } => {
                GenerationError::MalformedResponse(message)
            }
            LlmError::EmptyCompletion => GenerationError::EmptyResponse,
        }
    }
}
