// Reporter Relay - NIH RePORTER project search with PI contact emails

pub mod config;
pub mod contacts;  // PI contact table loading and email lookup
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;    // NIH RePORTER relay and result enrichment
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use contacts::{EmailRecord, EmailTable};
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
