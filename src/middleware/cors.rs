// CORS configuration
// Only origins from the configured allow-list may call the API.

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        warn!("CORS allow-list contains '*', any origin may call the API");
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    info!(origins = ?origins, "CORS allow-list configured");

    layer.allow_origin(AllowOrigin::list(allowed))
}

pub fn apply_cors(router: Router, origins: &[String]) -> Router {
    router.layer(cors_layer(origins))
}
