use async_trait::async_trait;

use super::errors::StoreResult;
use super::models::PageRecord;

/// Persistence seam behind the slug registry.
///
/// Slugs passed to a store are already normalized. Implementations must
/// reject a second insert of the same slug with
/// [`StoreError::AlreadyExists`](super::StoreError::AlreadyExists); the
/// registry relies on that rather than on its own existence check.
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn exists(&self, slug: &str) -> StoreResult<bool>;

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<PageRecord>>;

    async fn insert(&self, record: &PageRecord) -> StoreResult<()>;

    /// Pages ordered by `created_at` descending, then slug ascending.
    /// `None` returns every page.
    async fn list_recent(&self, limit: Option<usize>) -> StoreResult<Vec<PageRecord>>;
}
