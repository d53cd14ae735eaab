use std::sync::Arc;

use async_trait::async_trait;

use super::UpstreamFetchError;
use crate::api::sinpe::SinpeClient;
use crate::models::FeedPage;

/// A cursor-paginated supplier of movements.
///
/// Repeating a call with the same cursor may return fresher copies of the
/// same records but must not drop records at that position.
#[async_trait]
pub trait MovementSource: Send + Sync {
    async fn fetch_movements_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<FeedPage, UpstreamFetchError>;
}

#[async_trait]
impl MovementSource for SinpeClient {
    async fn fetch_movements_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<FeedPage, UpstreamFetchError> {
        self.get_movements_page(cursor)
            .await?
            .into_page()
            .map_err(UpstreamFetchError::Malformed)
    }
}

#[async_trait]
impl<S: MovementSource + ?Sized> MovementSource for Arc<S> {
    async fn fetch_movements_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<FeedPage, UpstreamFetchError> {
        (**self).fetch_movements_page(cursor).await
    }
}
