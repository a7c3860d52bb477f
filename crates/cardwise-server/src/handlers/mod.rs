//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analysis;
pub mod classify;
pub mod health;
pub mod link;
pub mod risk;
pub mod simulate;
pub mod transactions;

// Re-export all handlers for use in router
pub use analysis::*;
pub use classify::*;
pub use health::*;
pub use link::*;
pub use risk::*;
pub use simulate::*;
pub use transactions::*;

use axum::extract::Request;
use serde::de::DeserializeOwned;

use crate::{AppError, MAX_BODY_SIZE};

/// Read and parse a JSON request body; an empty body yields `None`
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> Result<Option<T>, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// Like [`read_json`], but the body is mandatory
pub(crate) async fn require_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    read_json(request)
        .await?
        .ok_or_else(|| AppError::bad_request("Request body is required"))
}
