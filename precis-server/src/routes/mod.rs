//! API route handlers
//!
//! - `abstracts`: fetch a page and summarize it
//! - `save`: persist a result document as JSON
//! - `health`: liveness

pub mod abstracts;
pub mod health;
pub mod save;

use crate::error::ServerError;

/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
