//! HTTP adapter exposing the evaluation service.
//!
//! Routes:
//! - `POST /evaluate-claim`: JSON claim in, signed evaluation out
//! - `OPTIONS` on any path: 200 with an empty body
//! - `GET /health`: liveness plus constitution version and evaluator address
//!
//! Every evaluation error, including an unreadable or oversized body, is
//! returned as HTTP 500 with `{"error": "..."}`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span};
use uuid::Uuid;

use crate::core::EvaluationService;

/// Path of the evaluation endpoint
pub const EVALUATE_PATH: &str = "/evaluate-claim";

/// Error body returned on failure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub constitution_version: String,
    pub evaluator_address: String,
}

/// Build the router around a shared service
pub fn router(service: Arc<EvaluationService>, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            EVALUATE_PATH,
            post(evaluate_claim).fallback(not_found),
        )
        .route("/health", get(health))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        // Answers every OPTIONS request itself with 200 and an empty body
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind and serve until the process is stopped
pub async fn serve(service: Arc<EvaluationService>, address: &str, max_body_bytes: usize) -> anyhow::Result<()> {
    use anyhow::Context;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(service, max_body_bytes))
        .await
        .context("HTTP server failed")
}

async fn evaluate_claim(
    State(service): State<Arc<EvaluationService>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("evaluate_claim", %request_id);

    match body {
        Ok(body) => span.in_scope(|| evaluate_body(&service, &body)),
        Err(rejection) => span.in_scope(|| {
            error!("Failed to read request body: {}", rejection.body_text());
            error_response(rejection.body_text())
        }),
    }
}

fn evaluate_body(service: &EvaluationService, body: &[u8]) -> Response {
    match service.evaluate_json(body) {
        Ok(signed) => {
            info!(
                claim_id = %signed.result.claim_id,
                score = signed.result.overall_score,
                approved = signed.result.approved,
                "Evaluation complete"
            );
            (StatusCode::OK, Json(signed)).into_response()
        }
        Err(e) => {
            error!("Failed to evaluate claim: {}", e);
            error_response(e.to_string())
        }
    }
}

fn error_response(error: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error })).into_response()
}

async fn health(State(service): State<Arc<EvaluationService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        constitution_version: service.constitution().version.clone(),
        evaluator_address: service.evaluator_address().to_string(),
    })
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
