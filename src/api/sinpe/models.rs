use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FeedPage, Movement};

/// Response from GET /balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

/// Response from GET /movements
///
/// The cursor is whatever the backing store hands back as its last
/// evaluated key: usually a string, sometimes a key object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementPageResponse {
    pub items: Option<Vec<Movement>>,
    #[serde(default, alias = "nextCursor")]
    pub last_evaluated_key: Option<serde_json::Value>,
}

impl MovementPageResponse {
    /// Convert to a feed page, rejecting responses without an `items` array
    pub fn into_page(self) -> Result<FeedPage, String> {
        let items = self
            .items
            .ok_or_else(|| "response has no `items` array".to_string())?;

        Ok(FeedPage {
            items,
            cursor: decode_cursor(self.last_evaluated_key),
        })
    }
}

/// Opaque cursor text for a raw key. Objects are carried as compact JSON
/// so they can be sent back verbatim.
pub fn decode_cursor(raw: Option<serde_json::Value>) -> Option<String> {
    match raw? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Request body for POST /movements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementRequest {
    pub name: String,
    pub phone_number: String,
    pub amount: f64,
    pub detail: String,
}

/// Rate limit information from API response headers
#[derive(Debug, Clone, Default)]
pub struct RateLimitInfo {
    pub limit: Option<i32>,
    pub remaining: Option<i32>,
    pub reset: Option<i64>,
}

/// 429 Rate limit response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub retry_after: Option<i64>,
}

/// Comprehensive error type for API operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    /// The account balance does not cover the transfer
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Rate Limited. Retry after {retry_after} ms")]
    RateLimited { retry_after: i64 },
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
