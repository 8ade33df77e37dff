//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/search` - NIH RePORTER project search with PI emails
//! - `/health` (and `/api/health`) - Health checks
//! - `/` - Static file serving (frontend)

pub mod health;
pub mod search;
pub mod static_files;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
///
/// API routes take precedence over static files; any other path falls back
/// to the client build, with `index.html` served for client-side routing.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();
    let static_dir = state.config.server.static_dir.clone();

    let api_router = Router::new()
        .merge(search::router(state.clone()))
        .merge(health::router(state));

    let router = Router::new()
        .merge(api_router)
        .merge(static_files::router(static_dir.as_deref()));

    apply_cors(router, &origins).layer(TraceLayer::new_for_http())
}


#[cfg(test)]
mod tests {
    use super::test_support::test_state;
    use super::*;
    use crate::contacts::EmailTable;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = create_router(test_state("http://127.0.0.1:9", EmailTable::from(Vec::new()), None));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/search")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_unknown_origin() {
        let app = create_router(test_state("http://127.0.0.1:9", EmailTable::from(Vec::new()), None));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
