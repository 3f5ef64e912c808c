// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are read-only. Analysis failures
// never take the server down: they are logged and returned as
// `{ "error": ..., "kind": ... }` with a status matching the failure kind.
//
// CORS is permissive because the dashboard is served from another origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::analysis;
use crate::app_state::AppState;
use crate::catalog::Instrument;
use crate::error::{AnalysisError, ErrorKind};

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/instruments", get(instruments))
        .route("/api/v1/analysis/:symbol", get(analysis_report))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Instruments
// =============================================================================

async fn instruments(State(state): State<Arc<AppState>>) -> Json<Vec<Instrument>> {
    Json(state.catalog.instruments().to_vec())
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: ErrorKind,
}

fn status_for(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::UnknownInstrument(_) => StatusCode::NOT_FOUND,
        AnalysisError::ComputationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status_for(&self), Json(body)).into_response()
    }
}

async fn analysis_report(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Response {
    match analysis::analyze(&state, &symbol).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            warn!(symbol = %symbol, kind = ?e.kind(), error = %e, "analysis failed");
            e.into_response()
        }
    }
}
