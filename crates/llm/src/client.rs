//! Chat-completions report generator.

use crate::config::LlmConfig;
use crate::prompts::{system_prompt, user_prompt};
use crate::retry::retry_send;
use crate::{LlmError, LlmResult};
use chrono::Utc;
use regubiz_core::{
    ConnectionStatus, GeneratedReport, GenerationError, ReportGenerator, ReportRequest,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// [`ReportGenerator`] backed by an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct ChatCompletionsGenerator {
    http: reqwest::Client,
    config: LlmConfig,
}

impl ChatCompletionsGenerator {
    /// Build the HTTP client with the bearer token and timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the API key is not a valid header value or the
    /// client cannot be built.
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.api_key
        ))
        .map_err(|e| LlmError::Config(format!("invalid API key header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete(&self, body: &ChatRequest<'_>) -> LlmResult<ChatResponse> {
        let endpoint = self.config.completions_url();
        let resp = retry_send(|| self.http.post(&endpoint).json(body).send())
            .await
            .map_err(|source| LlmError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|source| LlmError::Http {
            endpoint: endpoint.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(LlmError::ApiError {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| LlmError::Deserialization {
            endpoint,
            message: e.to_string(),
        })
    }

    /// Run one report generation, returning client-level errors.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure, non-2xx status, an undecodable body or
    /// an empty completion.
    pub async fn generate_report(&self, request: &ReportRequest) -> LlmResult<GeneratedReport> {
        let started = Instant::now();
        let user = user_prompt(request);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            top_p: Some(self.config.top_p),
        };

        let response = self.complete(&body).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        let tokens_used = response.usage.map(|u| u.total_tokens);
        let processing_time = started.elapsed().as_secs_f64();
        tracing::info!(
            model = %self.config.model,
            tokens = ?tokens_used,
            "report generated in {processing_time:.2}s"
        );

        Ok(GeneratedReport {
            content,
            generated_at: Utc::now(),
            model: self.config.model.clone(),
            tokens_used,
            processing_time: Some(processing_time),
        })
    }
}

#[async_trait::async_trait]
impl ReportGenerator for ChatCompletionsGenerator {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport, GenerationError> {
        self.generate_report(request).await.map_err(GenerationError::from)
    }

    async fn test_connection(&self) -> ConnectionStatus {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: "Reply with the single word OK.",
            }],
            max_tokens: 5,
            temperature: None,
            top_p: None,
        };

        match self.complete(&body).await {
            Ok(_) => ConnectionStatus {
                ok: true,
                model: self.config.model.clone(),
                message: "connection successful".into(),
            },
            Err(err) => {
                tracing::warn!("LLM connection test failed: {err}");
                ConnectionStatus {
                    ok: false,
                    model: self.config.model.clone(),
                    message: err.to_string(),
                }
            }
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use regubiz_core::{BusinessProfile, ComplianceService, Corpus};
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer) -> ChatCompletionsGenerator {
        let mut config = LlmConfig::new("sk-test");
        config.base_url = format!("{}/v1", server.uri());
        config.model = "test-model".into();
        ChatCompletionsGenerator::new(config).expect("client")
    }

    fn request() -> ReportRequest {
        let corpus = Corpus::from_json(
            r#"{"requirements": [
                {"requirement_id": "FIRE_1", "category": "fire_equipment", "content": "Extinguisher."}
            ]}"#,
        )
        .expect("corpus");
        let service = ComplianceService::new(Arc::new(corpus));
        let profile = BusinessProfile::new(80.0, 30, []).expect("profile");
        ReportRequest {
            context: service.build_context(&profile),
            profile,
        }
    }

    #[tokio::test]
    async fn generates_report_from_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "max_tokens": 2000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  Your report.  "}}],
                "usage": {"prompt_tokens": 100, "completion_tokens": 20, "total_tokens": 120}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let report = generator(&server)
            .generate(&request())
            .await
            .expect("report");

        assert_eq!(report.content, "Your report.");
        assert_eq!(report.model, "test-model");
        assert_eq!(report.tokens_used, Some(120));
        assert!(report.processing_time.is_some());
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate(&request())
            .await
            .expect_err("400");
        assert!(matches!(
            err,
            GenerationError::ApiStatus { status: 400, ref body } if body == "bad request"
        ));
    }

    #[tokio::test]
    async fn rate_limited_request_succeeds_on_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Second try."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let report = generator(&server)
            .generate(&request())
            .await
            .expect("report after retry");
        assert_eq!(report.content, "Second try.");
    }

    #[tokio::test]
    async fn persistent_server_errors_surface_the_last_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(4)
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate(&request())
            .await
            .expect_err("503");
        assert!(matches!(
            err,
            GenerationError::ApiStatus { status: 503, ref body } if body == "overloaded"
        ));
    }

    #[tokio::test]
    async fn empty_completion_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "   "}}]
            })))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate(&request())
            .await
            .expect_err("empty");
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn malformed_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate(&request())
            .await
            .expect_err("malformed");
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn connection_test_reports_success_and_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({"max_tokens": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "OK"}}]
            })))
            .mount(&server)
            .await;

        let status = generator(&server).test_connection().await;
        assert!(status.ok);
        assert_eq!(status.model, "test-model");

        let failing = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&failing)
            .await;
        let status = generator(&failing).test_connection().await;
        assert!(!status.ok);
        assert!(status.message.contains("401"));
    }
}
