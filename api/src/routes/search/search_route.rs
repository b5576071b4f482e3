//! POST /api/search: top-1 note for a free-text query.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use tracing::{debug, warn};

use crate::{
    app::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id,
    routes::search::{search_request::SearchRequest, search_response::SearchResponse},
};

/// Handler: POST /api/search
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/api/search \
///   -H 'content-type: application/json' \
///   -d '{"query":"linear algebra"}'
/// ```
pub async fn search_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Json<SearchResponse>> {
    let request_id = request_id(&headers);

    let query = match payload {
        Ok(Json(body)) => body.query.unwrap_or_default(),
        // Non-JSON bodies are read as an empty request.
        Err(JsonRejection::MissingJsonContentType(_)) => String::new(),
        // Unavailability wins over a malformed body.
        Err(_) if !state.search.is_available() => String::new(),
        Err(rejection) => {
            warn!(request_id = %request_id, "search_route: rejected body");
            return Err(AppError::from(rejection));
        }
    };

    debug!(request_id = %request_id, query = %query, "search_route: start");

    match state.search.find_best_match(&query).await {
        Ok(hit) => {
            debug!(
                request_id = %request_id,
                filename = %hit.filename,
                score = hit.score,
                "search_route: success"
            );
            Ok(Json(SearchResponse::from(hit)))
        }
        Err(err) => {
            warn!(
                request_id = %request_id,
                error = %err,
                "search_route: no match"
            );
            Err(err.into())
        }
    }
}
