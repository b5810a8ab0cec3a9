//! # API REST
//!
//! REST API implementation for Regu-Biz.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for request/response types and `regubiz-core` for matching.

#![warn(rust_2018_idioms)]

use api_shared::{
    BusinessProfileReq, CategoryRes, ConflictRes, ConnectionRes, HealthRes, HealthService,
    MatchRes, MatchStatisticsRes, PrioritySummaryRes, ProfileRes, PromptContextRes,
    QuestionnaireReq, ReportRes, RequirementRes, RootRes, SampleProfileRes, SampleProfilesRes,
    StatsRes, ThresholdRes,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use regubiz_core::{
    sample_profile, sample_profiles, BusinessProfile, ComplianceError, ComplianceService, Corpus,
    GenerationError, QuestionnaireAnswers, ReportGenerator,
};
use regubiz_llm::{ChatCompletionsGenerator, LlmConfig, LlmResult};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
///
/// The corpus inside `service` is loaded once at startup. `generator` is `None` when no
/// LLM credentials were configured; report endpoints then answer 503.
#[derive(Clone)]
pub struct AppState {
    pub service: ComplianceService,
    pub generator: Option<Arc<dyn ReportGenerator>>,
}

impl AppState {
    /// Wrap a loaded corpus and an optional LLM configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the HTTP client for the generator cannot be built.
    pub fn new(corpus: Corpus, llm: Option<LlmConfig>) -> LlmResult<Self> {
        let generator = match llm {
            Some(config) => {
                tracing::info!("report generator enabled with model {}", config.model);
                Some(Arc::new(ChatCompletionsGenerator::new(config)?) as Arc<dyn ReportGenerator>)
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not set; report generation is disabled");
                None
            }
        };
        Ok(Self {
            service: ComplianceService::new(Arc::new(corpus)),
            generator,
        })
    }
}

type ApiError = (StatusCode, String);

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        health,
        stats,
        submit_questionnaire,
        match_requirements,
        list_sample_profiles,
        match_sample_profile,
        ai_prompt_context,
        generate_report,
        generate_sample_report,
        test_ai_connection,
    ),
    components(schemas(
        RootRes,
        HealthRes,
        StatsRes,
        QuestionnaireReq,
        BusinessProfileReq,
        MatchRes,
        ProfileRes,
        RequirementRes,
        CategoryRes,
        ConflictRes,
        ThresholdRes,
        PrioritySummaryRes,
        MatchStatisticsRes,
        SampleProfileRes,
        SampleProfilesRes,
        PromptContextRes,
        ReportRes,
        ConnectionRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/api/questionnaire/submit", post(submit_questionnaire))
        .route("/api/match-requirements", post(match_requirements))
        .route("/api/sample-profiles", get(list_sample_profiles))
        .route("/api/sample-profiles/:name", post(match_sample_profile))
        .route("/api/ai-prompt-context/:name", get(ai_prompt_context))
        .route("/api/generate-report", post(generate_report))
        .route("/api/generate-report/sample/:name", post(generate_sample_report))
        .route("/api/ai/test-connection", get(test_ai_connection))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map a core error to an HTTP status and message.
fn error_response(err: ComplianceError) -> ApiError {
    let status = match &err {
        ComplianceError::InvalidInput(_) | ComplianceError::InvalidProfile(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ComplianceError::UnknownSampleProfile(_) => StatusCode::NOT_FOUND,
        ComplianceError::Generation(GenerationError::NotConfigured) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ComplianceError::Generation(_) => StatusCode::BAD_GATEWAY,
        ComplianceError::Corpus(_) | ComplianceError::InvalidTransition { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        tracing::error!("request failed: {err}");
    } else {
        tracing::info!("request rejected: {err}");
    }
    (status, err.to_string())
}

fn match_profile(state: &AppState, profile: &BusinessProfile) -> MatchRes {
    let context = state.service.build_context(profile);
    tracing::info!(
        area_sqm = profile.area_sqm(),
        capacity = profile.capacity_people(),
        "matched {} requirements",
        context.requirements.len()
    );
    MatchRes::from(&context)
}

async fn report_for(state: &AppState, profile: &BusinessProfile) -> Result<ReportRes, ApiError> {
    let generator = state
        .generator
        .as_deref()
        .ok_or_else(|| error_response(GenerationError::NotConfigured.into()))?;
    let (context, report) = state
        .service
        .generate_report(generator, profile)
        .await
        .map_err(error_response)?;
    Ok(ReportRes::new(&context, report))
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = RootRes))
)]
#[axum::debug_handler]
async fn root() -> Json<RootRes> {
    Json(RootRes {
        name: "Regu-Biz compliance API".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        docs: "/swagger-ui".into(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.service.corpus()))
}

#[utoipa::path(
    get,
    path = "/stats",
    responses((status = 200, description = "Corpus statistics", body = StatsRes))
)]
#[axum::debug_handler]
async fn stats(State(state): State<AppState>) -> Json<StatsRes> {
    Json(StatsRes::from(state.service.corpus().statistics()))
}

#[utoipa::path(
    post,
    path = "/api/questionnaire/submit",
    request_body = QuestionnaireReq,
    responses(
        (status = 200, description = "Matched requirements", body = MatchRes),
        (status = 422, description = "Invalid business profile")
    )
)]
/// Validate a questionnaire submission and return the matched requirements.
#[axum::debug_handler]
async fn submit_questionnaire(
    State(state): State<AppState>,
    Json(req): Json<QuestionnaireReq>,
) -> Result<Json<MatchRes>, ApiError> {
    let profile = QuestionnaireAnswers::from(req)
        .into_profile()
        .map_err(error_response)?;
    Ok(Json(match_profile(&state, &profile)))
}

#[utoipa::path(
    post,
    path = "/api/match-requirements",
    request_body = BusinessProfileReq,
    responses(
        (status = 200, description = "Matched requirements", body = MatchRes),
        (status = 422, description = "Invalid business profile")
    )
)]
#[axum::debug_handler]
async fn match_requirements(
    State(state): State<AppState>,
    Json(req): Json<BusinessProfileReq>,
) -> Result<Json<MatchRes>, ApiError> {
    let profile = req.to_profile().map_err(error_response)?;
    Ok(Json(match_profile(&state, &profile)))
}

#[utoipa::path(
    get,
    path = "/api/sample-profiles",
    responses((status = 200, description = "Built-in sample profiles", body = SampleProfilesRes))
)]
#[axum::debug_handler]
async fn list_sample_profiles() -> Result<Json<SampleProfilesRes>, ApiError> {
    let profiles = sample_profiles()
        .map_err(error_response)?
        .into_iter()
        .map(|(name, profile)| SampleProfileRes {
            name: name.to_string(),
            profile: ProfileRes::from(&profile),
        })
        .collect();
    Ok(Json(SampleProfilesRes { profiles }))
}

#[utoipa::path(
    post,
    path = "/api/sample-profiles/{name}",
    params(("name" = String, Path, description = "Sample profile name")),
    responses(
        (status = 200, description = "Matched requirements", body = MatchRes),
        (status = 404, description = "Unknown sample profile")
    )
)]
#[axum::debug_handler]
async fn match_sample_profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MatchRes>, ApiError> {
    let profile = sample_profile(&name).map_err(error_response)?;
    Ok(Json(match_profile(&state, &profile)))
}

#[utoipa::path(
    get,
    path = "/api/ai-prompt-context/{name}",
    params(("name" = String, Path, description = "Sample profile name")),
    responses(
        (status = 200, description = "Prompt context for the sample", body = PromptContextRes),
        (status = 404, description = "Unknown sample profile")
    )
)]
/// Show the context that would be sent to the model for a sample profile.
#[axum::debug_handler]
async fn ai_prompt_context(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PromptContextRes>, ApiError> {
    let profile = sample_profile(&name).map_err(error_response)?;
    let context = state.service.build_context(&profile);
    Ok(Json(PromptContextRes {
        profile_name: name,
        prompt_context: context.prompt_context(),
        requirement_count: context.requirements.len(),
        formatted_context: context.formatted_text,
    }))
}

#[utoipa::path(
    post,
    path = "/api/generate-report",
    request_body = QuestionnaireReq,
    responses(
        (status = 200, description = "Generated report", body = ReportRes),
        (status = 422, description = "Invalid business profile"),
        (status = 502, description = "Report generation failed"),
        (status = 503, description = "Report generator not configured")
    )
)]
#[axum::debug_handler]
async fn generate_report(
    State(state): State<AppState>,
    Json(req): Json<QuestionnaireReq>,
) -> Result<Json<ReportRes>, ApiError> {
    let profile = QuestionnaireAnswers::from(req)
        .into_profile()
        .map_err(error_response)?;
    Ok(Json(report_for(&state, &profile).await?))
}

#[utoipa::path(
    post,
    path = "/api/generate-report/sample/{name}",
    params(("name" = String, Path, description = "Sample profile name")),
    responses(
        (status = 200, description = "Generated report", body = ReportRes),
        (status = 404, description = "Unknown sample profile"),
        (status = 502, description = "Report generation failed"),
        (status = 503, description = "Report generator not configured")
    )
)]
#[axum::debug_handler]
async fn generate_sample_report(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ReportRes>, ApiError> {
    let profile = sample_profile(&name).map_err(error_response)?;
    Ok(Json(report_for(&state, &profile).await?))
}

#[utoipa::path(
    get,
    path = "/api/ai/test-connection",
    responses(
        (status = 200, description = "Connection test result", body = ConnectionRes),
        (status = 503, description = "Report generator not configured")
    )
)]
#[axum::debug_handler]
async fn test_ai_connection(State(state): State<AppState>) -> Result<Json<ConnectionRes>, ApiError> {
    let generator = state
        .generator
        .as_deref()
        .ok_or_else(|| error_response(GenerationError::NotConfigured.into()))?;
    Ok(Json(generator.test_connection().await.into()))
}
