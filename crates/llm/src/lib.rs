//! # Regu-Biz LLM client
//!
//! Implements [`regubiz_core::ReportGenerator`] against an OpenAI-compatible
//! `/chat/completions` endpoint.
//!
//! ## Architecture
//!
//! - [`LlmConfig`]: endpoint, credentials, model and timeout, resolved at startup
//! - [`ChatCompletionsGenerator`]: the `reqwest` client and response handling
//! - `prompts`: system and user prompt construction from a `ReportRequest`
//! - `retry`: exponential backoff for transport failures
//!
//! Non-2xx responses are returned as errors immediately; only failures to reach the
//! endpoint at all are retried.

pub mod client;
pub mod config;
pub mod error;
pub mod prompts;
mod retry;

pub use client::ChatCompletionsGenerator;
pub use config::LlmConfig;
pub use error::{LlmError, LlmResult};
