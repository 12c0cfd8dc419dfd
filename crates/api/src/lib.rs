use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use wayfinder_agents::TravelAgent;
use wayfinder_catalog::Store;
use wayfinder_genai::GeminiClient;
use wayfinder_observability::AppMetrics;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<TravelAgent<Store, GeminiClient>>,
    pub metrics: Arc<AppMetrics>,
    pub sqlite_catalog: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: wayfinder_observability::MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
struct HealthCapabilities {
    generative_fallback: bool,
    sqlite_catalog: bool,
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueryResponse {
    response: String,
    intent: wayfinder_core::IntentKind,
    source: wayfinder_core::ReplySource,
}

/// Wire the agent from the environment: sqlite catalog if
/// `WAYFINDER_DATABASE_URL` is set, in-memory otherwise; fallback credentials
/// from `WAYFINDER_GEMINI_API_KEY`.
pub async fn build_app() -> Result<Router> {
    let metrics = AppMetrics::shared();

    let store = if let Ok(database_url) = env::var("WAYFINDER_DATABASE_URL") {
        Store::sqlite(&database_url).await?
    } else {
        Store::memory()
    };
    let sqlite_catalog = matches!(store, Store::Sqlite(_));

    let fallback = GeminiClient::from_env().context("failed to build fallback client")?;

    let agent = Arc::new(TravelAgent::new(
        Arc::new(store),
        Arc::new(fallback),
        metrics.clone(),
    ));

    Ok(build_router(ApiState {
        agent,
        metrics,
        sqlite_catalog,
    }))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/query_ai", post(query_ai))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(16 * 1024))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: HealthCapabilities {
            generative_fallback: state.agent.fallback_configured(),
            sqlite_catalog: state.sqlite_catalog,
        },
    };
    (StatusCode::OK, Json(payload))
}

/// The single query endpoint. Missing or empty `query` is rejected here; the
/// router core only ever sees non-empty text.
async fn query_ai(State(state): State<ApiState>, Json(input): Json<QueryRequest>) -> impl IntoResponse {
    let Some(query) = input.query.filter(|query| !query.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "No query provided in the request body."
            })),
        )
            .into_response();
    };

    let reply = state.agent.route(&query).await;

    (
        StatusCode::OK,
        Json(QueryResponse {
            response: reply.reply_text,
            intent: reply.intent,
            source: reply.source,
        }),
    )
        .into_response()
}
