use std::time::Duration;

use thiserror::Error;

use crate::api::sinpe::ApiError;

/// A page of movements could not be obtained
#[derive(Debug, Clone, Error)]
pub enum UpstreamFetchError {
    #[error("movement request failed: {0}")]
    Api(#[from] ApiError),
    /// The page arrived but cannot be admitted into the feed
    #[error("malformed movement page: {0}")]
    Malformed(String),
    #[error("movement request timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors from a shared feed handle
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    #[error(transparent)]
    Upstream(#[from] UpstreamFetchError),
    #[error("the movement list is already updating")]
    Busy,
}
