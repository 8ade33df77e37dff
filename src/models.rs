use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::contacts::EmailTable;
use crate::search::ReporterClient;

/// Shared request state. The contact table is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub email_table: Arc<EmailTable>,
    pub reporter: ReporterClient,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub email_database_size: usize,
    pub email_database_status: String,
    pub timestamp: String,
}

/// Body returned by `/api/search` when the relay fails.
#[derive(Debug, Clone, Serialize)]
pub struct SearchErrorResponse {
    pub error: String,
    pub details: String,
    pub status: Option<u16>,
}
