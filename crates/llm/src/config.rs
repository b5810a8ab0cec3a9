//! LLM client configuration.

use crate::{LlmError, LlmResult};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for [`crate::ChatCompletionsGenerator`].
///
/// The binary reads `OPENAI_API_KEY`, `REGUBIZ_LLM_BASE_URL`, `REGUBIZ_LLM_MODEL` and
/// `REGUBIZ_LLM_TIMEOUT_SECS` and passes the raw values to [`LlmConfig::from_values`].
#[derive(Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: 2000,
            temperature: 0.7,
            top_p: 0.9,
        }
    }

    /// Build a config from optional raw values, applying defaults.
    ///
    /// Returns `Ok(None)` when no API key is set: the generator is simply not configured.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the timeout is not a positive integer or the base URL
    /// is not an http(s) URL.
    pub fn from_values(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
        timeout_secs: Option<String>,
    ) -> LlmResult<Option<Self>> {
        let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let mut config = Self::new(api_key.trim());

        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(LlmError::Config(format!(
                    "REGUBIZ_LLM_BASE_URL must be an http(s) URL, got {url}"
                )));
            }
            config.base_url = url;
        }

        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }

        if let Some(raw) = timeout_secs.filter(|t| !t.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                LlmError::Config(format!(
                    "REGUBIZ_LLM_TIMEOUT_SECS must be a positive integer, got {raw}"
                ))
            })?;
            if secs == 0 {
                return Err(LlmError::Config(
                    "REGUBIZ_LLM_TIMEOUT_SECS must be greater than zero".into(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(Some(config))
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_means_not_configured() {
        assert!(LlmConfig::from_values(None, None, None, None)
            .expect("no error")
            .is_none());
        assert!(LlmConfig::from_values(Some("  ".into()), None, None, None)
            .expect("no error")
            .is_none());
    }

    #[test]
    fn defaults_apply() {
        let config = LlmConfig::from_values(Some("sk-test".into()), None, None, None)
            .expect("valid")
            .expect("configured");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(
            config.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn overrides_apply() {
        let config = LlmConfig::from_values(
            Some("sk-test".into()),
            Some("http://localhost:9000/v1/".into()),
            Some("local-model".into()),
            Some("5".into()),
        )
        .expect("valid")
        .expect("configured");
        assert_eq!(config.completions_url(), "http://localhost:9000/v1/chat/completions");
        assert_eq!(config.model, "local-model");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(LlmConfig::from_values(Some("k".into()), None, None, Some("soon".into())).is_err());
        assert!(LlmConfig::from_values(Some("k".into()), None, None, Some("0".into())).is_err());
        assert!(LlmConfig::from_values(Some("k".into()), Some("ftp://x".into()), None, None).is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let config = LlmConfig::new("sk-secret");
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
