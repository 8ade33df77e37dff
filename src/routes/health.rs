use axum::{extract::State, routing::get, Json, Router};

use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let table = &state.email_table;

    Json(HealthResponse {
        status: "healthy".to_string(),
        environment: state.config.server.environment.to_string(),
        email_database_size: table.len(),
        email_database_status: table.status().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
