//! Movement feed: a deduplicated, newest-first view of the movement history
//! built from a cursor-paginated source.
//!
//! State only changes after a page has been fetched and validated, so a
//! failed `refresh` or `load_more` leaves items, cursor and exhaustion
//! exactly as they were.

mod error;
mod source;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub use error::{FeedError, UpstreamFetchError};
pub use source::MovementSource;
pub use state::FeedState;

use crate::models::{FeedPage, Movement};

pub struct MovementFeed<S> {
    source: S,
    state: FeedState,
    timeout: Option<Duration>,
}

impl<S: MovementSource> MovementFeed<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: FeedState::new(),
            timeout: None,
        }
    }

    /// Bound every upstream call; expiry fails the operation with `Timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn items(&self) -> &[Movement] {
        &self.state.items
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    async fn fetch(&self, cursor: Option<&str>) -> Result<FeedPage, UpstreamFetchError> {
        let request = self.source.fetch_movements_page(cursor);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| UpstreamFetchError::Timeout(limit))?,
            None => request.await,
        }
    }

    /// Reload from the first page, discarding everything known so far
    pub async fn refresh(&mut self) -> Result<&FeedState, UpstreamFetchError> {
        debug!("Refreshing movement feed");

        let page = self.fetch(None).await.map_err(|e| {
            warn!("Movement refresh failed: {}", e);
            e
        })?;
        let next = self.state.replaced_with(page)?;

        info!(
            "Movement feed refreshed: {} items, more pages: {}",
            next.items.len(),
            next.has_more()
        );
        self.state = next;
        Ok(&self.state)
    }

    /// Append the next page. Does nothing once the history is exhausted.
    pub async fn load_more(&mut self) -> Result<&FeedState, UpstreamFetchError> {
        if self.state.exhausted {
            debug!("Movement feed exhausted, skipping fetch");
            return Ok(&self.state);
        }

        let cursor = self.state.cursor.clone();
        debug!("Loading more movements (cursor: {:?})", cursor);

        let page = self.fetch(cursor.as_deref()).await.map_err(|e| {
            warn!("Loading more movements failed: {}", e);
            e
        })?;
        let received = page.items.len();
        let next = self.state.merged_with(page)?;

        info!(
            "Merged {} movements into feed ({} total, more pages: {})",
            received,
            next.items.len(),
            next.has_more()
        );
        self.state = next;
        Ok(&self.state)
    }
}

/// Shared entry point for hosts that can trigger feed operations
/// concurrently. A call made while another is in flight is rejected with
/// [`FeedError::Busy`] without touching the state.
pub struct FeedHandle<S> {
    inner: Arc<Mutex<MovementFeed<S>>>,
}

impl<S> Clone for FeedHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MovementSource> FeedHandle<S> {
    pub fn new(feed: MovementFeed<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(feed)),
        }
    }

    pub async fn refresh(&self) -> Result<FeedState, FeedError> {
        let mut feed = self.inner.try_lock().map_err(|_| FeedError::Busy)?;
        let state = feed.refresh().await?.clone();
        Ok(state)
    }

    pub async fn load_more(&self) -> Result<FeedState, FeedError> {
        let mut feed = self.inner.try_lock().map_err(|_| FeedError::Busy)?;
        let state = feed.load_more().await?.clone();
        Ok(state)
    }

    /// Current state, waiting for any in-flight operation to settle
    pub async fn snapshot(&self) -> FeedState {
        self.inner.lock().await.state().clone()
    }
}
