//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful during development when only the HTTP surface is needed. The workspace's main
//! `regubiz-run` binary serves the same router.

use api_rest::{router, AppState};
use regubiz_core::{resolve_corpus_path, CoreConfig, Corpus};
use regubiz_llm::LlmConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Regu-Biz REST API server.
///
/// # Environment Variables
/// - `REGUBIZ_REST_ADDR`: Server address (default: "0.0.0.0:8000")
/// - `REGUBIZ_CORPUS_PATH`: Regulatory corpus JSON (default: bundled data file)
/// - `OPENAI_API_KEY`, `REGUBIZ_LLM_BASE_URL`, `REGUBIZ_LLM_MODEL`,
///   `REGUBIZ_LLM_TIMEOUT_SECS`: report generator settings
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the corpus cannot be located or loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("regubiz=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("REGUBIZ_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let corpus_override = std::env::var("REGUBIZ_CORPUS_PATH").ok().map(PathBuf::from);
    let cfg = CoreConfig::new(resolve_corpus_path(corpus_override)?)?;
    let corpus = Corpus::load(cfg.corpus_path())?;

    let llm = LlmConfig::from_values(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("REGUBIZ_LLM_BASE_URL").ok(),
        std::env::var("REGUBIZ_LLM_MODEL").ok(),
        std::env::var("REGUBIZ_LLM_TIMEOUT_SECS").ok(),
    )?;

    let app = router(AppState::new(corpus, llm)?);

    tracing::info!("-- Starting Regu-Biz REST API on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
