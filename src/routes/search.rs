use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::models::{AppState, SearchErrorResponse};
use crate::search::RelayError;

pub const SEARCH_FAILED_MESSAGE: &str = "Failed to fetch data from NIH RePORTER";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search_projects))
        .with_state(state)
}

/// POST /api/search - relay a project search and attach PI emails
///
/// A body sent without a JSON content type is forwarded as an empty query.
async fn search_projects(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    info!("Project search request received");

    let query = match payload {
        Ok(Json(query)) => query,
        Err(JsonRejection::MissingJsonContentType(_)) => {
            debug!("No JSON content type on search request, forwarding an empty query");
            Value::Object(Default::default())
        }
        Err(rejection) => {
            return search_error_response(&RelayError::InvalidQuery(rejection.body_text()));
        }
    };

    match state
        .reporter
        .search_enriched(&query, &state.email_table)
        .await
    {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => search_error_response(&e),
    }
}

fn search_error_response(e: &RelayError) -> Response {
    error!(error = %e, status = ?e.upstream_status(), "Project search failed");

    let body = SearchErrorResponse {
        error: SEARCH_FAILED_MESSAGE.to_string(),
        details: e.to_string(),
        status: e.upstream_status(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
