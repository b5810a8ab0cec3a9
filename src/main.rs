use api_rest::{router, AppState};
use regubiz_core::{resolve_corpus_path, CoreConfig, Corpus};
use regubiz_llm::LlmConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Regu-Biz application
///
/// Loads the regulatory corpus once, builds the report generator when credentials are
/// present, and serves the REST API until interrupted.
///
/// # Environment Variables
/// - `REGUBIZ_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `REGUBIZ_CORPUS_PATH`: Regulatory corpus JSON (default: bundled data file)
/// - `OPENAI_API_KEY`: enables report generation
/// - `REGUBIZ_LLM_BASE_URL`, `REGUBIZ_LLM_MODEL`, `REGUBIZ_LLM_TIMEOUT_SECS`
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, corpus loading or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("regubiz=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("REGUBIZ_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let corpus_override = std::env::var("REGUBIZ_CORPUS_PATH").ok().map(PathBuf::from);
    let cfg = CoreConfig::new(resolve_corpus_path(corpus_override)?)?;
    let corpus = Corpus::load(cfg.corpus_path())?;

    let stats = corpus.statistics();
    tracing::info!(
        "++ Loaded {} clauses in {} categories from {}",
        stats.total_clauses,
        stats.by_category.len(),
        cfg.corpus_path().display()
    );
    for skipped in corpus.skipped() {
        tracing::warn!(
            "   skipped {}[{}]: {}",
            skipped.collection,
            skipped.index,
            skipped.reason
        );
    }

    let llm = LlmConfig::from_values(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("REGUBIZ_LLM_BASE_URL").ok(),
        std::env::var("REGUBIZ_LLM_MODEL").ok(),
        std::env::var("REGUBIZ_LLM_TIMEOUT_SECS").ok(),
    )?;

    let app = router(AppState::new(corpus, llm)?);

    tracing::info!("++ Starting Regu-Biz REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {err}");
            }
            tracing::info!("-- Shutting down Regu-Biz REST");
        })
        .await?;

    Ok(())
}
