//! NIH RePORTER Client
//!
//! Posts a caller-supplied query to the RePORTER project search endpoint and
//! returns the raw JSON response. The query is forwarded as-is; its shape is
//! not validated here. No retries are attempted.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::ReporterConfig;
use crate::contacts::EmailTable;

use super::enrich::enrich_response;

/// Errors that can occur while relaying a project search
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Request to NIH RePORTER failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("NIH RePORTER returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Failed to parse NIH RePORTER response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("NIH RePORTER response is missing the results field")]
    MissingResults,

    #[error("Search query is not valid JSON: {0}")]
    InvalidQuery(String),
}

impl RelayError {
    /// Status code returned by RePORTER, when the failure came with one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            RelayError::Request(e) => e.status().map(|s| s.as_u16()),
            RelayError::UpstreamStatus { status, .. } => Some(*status),
            RelayError::Decode(_) | RelayError::MissingResults | RelayError::InvalidQuery(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReporterClient {
    client: Client,
    search_url: String,
}

impl ReporterClient {
    pub fn new(config: &ReporterConfig) -> Result<Self, RelayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            search_url: config.search_url.clone(),
        })
    }

    /// Forward `query` to RePORTER and return its JSON body.
    pub async fn search(&self, query: &Value) -> Result<Value, RelayError> {
        info!(url = %self.search_url, "Forwarding project search to NIH RePORTER");
        debug!(query = %query, "Project search query");

        let response = self.client.post(&self.search_url).json(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "NIH RePORTER returned an error status");
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(body)
    }

    /// Search and attach PI emails to the results.
    pub async fn search_enriched(
        &self,
        query: &Value,
        table: &EmailTable,
    ) -> Result<Value, RelayError> {
        let response = self.search(query).await?;
        enrich_response(response, table)
    }
}
