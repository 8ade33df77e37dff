//! Static File Serving
//!
//! Serves the built client application. Unknown paths fall back to
//! `index.html` so client-side routes resolve in the browser.

use std::path::{Path, PathBuf};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

const CANDIDATE_DIRS: [&str; 3] = ["client/dist", "client/build", "static"];

/// Find the client build directory, preferring the configured one.
fn resolve_static_dir(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        if dir.join("index.html").is_file() {
            return Some(dir.to_path_buf());
        }
        warn!(path = %dir.display(), "Configured STATIC_DIR has no index.html");
    }

    CANDIDATE_DIRS
        .iter()
        .map(PathBuf::from)
        .find(|dir| dir.join("index.html").is_file())
}

/// Create router for serving static files
pub fn router(configured: Option<&Path>) -> Router {
    match resolve_static_dir(configured) {
        Some(dir) => {
            info!(path = %dir.display(), "Serving client build");
            let index = ServeFile::new(dir.join("index.html"));
            Router::new().fallback_service(ServeDir::new(&dir).fallback(index))
        }
        None => {
            warn!("Client build not found, serving placeholder page");
            Router::new().fallback(placeholder_page)
        }
    }
}

async fn placeholder_page() -> Response {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Reporter Relay - API Server</title>
</head>
<body>
    <h1>Reporter Relay</h1>
    <p>The API server is running but the client has not been built.</p>
    <ul>
        <li><code>POST /api/search</code> - NIH RePORTER project search</li>
        <li><code>GET /health</code> - Health check</li>
    </ul>
</body>
</html>"#;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}
