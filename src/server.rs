/*!
 * HTTP surface for the translation pipeline.
 *
 * Thin glue over the orchestrator: one route for the glossary-enforced
 * translate-then-score flow, one for reverse-direction spot checks, and a
 * liveness probe. Gateway errors map onto the HTTP contract here; nothing
 * else in the crate knows about status codes.
 */

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_config::{Config, EvaluatorBackendConfig};
use crate::errors::GatewayError;
use crate::evaluator::Evaluator;
use crate::gateway::DeepLClient;
use crate::pipeline::{Pipeline, PipelineResponse, TranslationRequest};
use crate::providers::{AzureOpenAI, ChatBackend, OpenAI};

/// Shared application state: one pipeline behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Wrap an already-assembled pipeline.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Access the underlying pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Wire the full pipeline from resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        let glossary = Arc::new(crate::glossary::BUILTIN.clone());

        let gateway = DeepLClient::new(
            config.deepl_api_key.clone(),
            config.deepl_endpoint.clone(),
            Arc::clone(&glossary),
            config.request_timeout,
        );

        let evaluator = build_evaluator(&config.evaluator, config.request_timeout);

        Self::new(Pipeline::new(Arc::new(gateway), evaluator, glossary))
    }
}

/// Construct the evaluator for the backend the credentials selected.
pub fn build_evaluator(backend: &EvaluatorBackendConfig, timeout: Duration) -> Evaluator {
    match backend {
        EvaluatorBackendConfig::OpenAI { api_key, model } => {
            info!("Using OpenAI backend for confidence scoring (model: {})", model);
            let client: Arc<dyn ChatBackend> =
                Arc::new(OpenAI::new(api_key.clone(), model.clone(), timeout));
            Evaluator::new(client)
        }
        EvaluatorBackendConfig::Azure {
            api_key,
            endpoint,
            deployment,
            api_version,
        } => {
            info!(
                "Using Azure OpenAI backend for confidence scoring (deployment: {})",
                deployment
            );
            let client: Arc<dyn ChatBackend> = Arc::new(AzureOpenAI::new(
                api_key.clone(),
                endpoint.clone(),
                deployment.clone(),
                api_version.clone(),
                timeout,
            ));
            Evaluator::new(client)
        }
        EvaluatorBackendConfig::Disabled => Evaluator::default(),
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/backtranslate", post(back_translate))
        .route("/health", get(health))
        .with_state(state)
}

/// Run the HTTP server until shutdown.
pub async fn serve(state: AppState, bind_addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Schema for the reverse-direction response.
#[derive(Debug, Serialize, Deserialize)]
pub struct BackTranslationResponse {
    /// The English translation of the Dutch input
    pub english: String,
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslationRequest>,
) -> Result<Json<PipelineResponse>, ApiError> {
    info!("/translate called (payload len={})", request.text.len());
    let response = state.pipeline.run(request).await?;
    Ok(Json(response))
}

async fn back_translate(
    State(state): State<AppState>,
    Json(request): Json<TranslationRequest>,
) -> Result<Json<BackTranslationResponse>, ApiError> {
    info!("/backtranslate called (payload len={})", request.text.len());
    let english = state.pipeline.back_translate(&request.text).await?;
    Ok(Json(BackTranslationResponse { english }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Gateway error wrapper carrying the HTTP mapping.
///
/// Unreachable provider → 502; reachable provider returning an error or an
/// unusable body → 500. Detail strings match the public contract and leak
/// no upstream internals.
pub struct ApiError(GatewayError);

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Translation request failed: {}", self.0);
        let (status, detail) = match self.0 {
            GatewayError::Unavailable(_) => (
                StatusCode::BAD_GATEWAY,
                "Upstream translation service unavailable",
            ),
            GatewayError::Api { .. } | GatewayError::MalformedResponse(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Translation API error")
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
