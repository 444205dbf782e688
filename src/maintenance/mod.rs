//! Maintenance service integration and API client.
//!
//! This module provides integration with the remote maintenance service,
//! handling API communication and conversion of wire records into the
//! engine's internal window representation.
//!
//! # Modules
//!
//! - `requester` - HTTP client and the mockable [`RecordSource`] /
//!   [`AppDirectory`] collaborator traits
//! - `response_structs` - Internal data structures for API responses
//! - `structs` - Public data structures representing maintenance windows
//! - `sync` - Fetch-and-convert logic with fail-soft record handling
//!
//! # Examples
//!
//! ```no_run
//! use upkeep::maintenance::MaintenanceRequester;
//!
//! let requester = MaintenanceRequester::new("https://service.example.com", "api_key");
//! // Fetch windows and feed them to the evaluator
//! ```

pub mod requester;
mod response_structs;
mod structs;
mod sync;

pub use crate::maintenance::requester::{AppDirectory, MaintenanceRequester, RecordSource};
pub use crate::maintenance::response_structs::WindowRecord;
pub use crate::maintenance::structs::{AlertFrequency, MaintenanceWindow, SYSTEM_SCOPE};
pub use crate::maintenance::sync::MaintenanceSync;

/// Errors that can occur while calling the maintenance service.
///
/// Both variants are recovered locally: the engine logs them and treats
/// the affected cycle as having no records, so no call ever takes the
/// host application down.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The service was unreachable or returned an unreadable payload.
    #[error("transport error while calling the maintenance service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service rejected the request with HTTP 401 or 403.
    #[error("maintenance service denied access (http {0})")]
    Permission(u16),
}
