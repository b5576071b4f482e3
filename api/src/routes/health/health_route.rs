use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{app::app_state::AppState, routes::health::health_response::HealthResponse};

/// Handler: GET /healthz
///
/// 200 when the embedding model is loaded, 503 while degraded.
pub async fn health_route(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let search = &state.search;
    let ok = search.is_available();

    let body = HealthResponse {
        ok,
        model_loaded: ok,
        model: search.model_name().map(str::to_string),
        pdf_count: search.document_count(),
        error: search.degraded_reason().map(str::to_string),
    };

    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}
