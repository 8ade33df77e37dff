//! Project Search Relay
//!
//! Forwards project search queries to the NIH RePORTER API and enriches the
//! first principal investigator of every returned project with a contact
//! email from the PI contact table.

pub mod enrich;
pub mod reporter;

pub use enrich::{enrich_project, enrich_response};
pub use reporter::{RelayError, ReporterClient};
