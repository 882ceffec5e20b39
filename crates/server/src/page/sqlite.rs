use async_trait::async_trait;
use sqlx::SqlitePool;

use super::errors::{StoreError, StoreResult};
use super::models::PageRecord;
use super::store::PageStore;

/// Table-backed page store over the `pages` table.
///
/// The schema is created by the migrations run in [`crate::db::init_pool`].
#[derive(Clone, Debug)]
pub struct SqlitePageStore {
    pool: SqlitePool,
}

impl SqlitePageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageStore for SqlitePageStore {
    async fn exists(&self, slug: &str) -> StoreResult<bool> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM pages WHERE slug = ? LIMIT 1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(exists.is_some())
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<PageRecord>> {
        let record = sqlx::query_as::<_, PageRecord>(
            "SELECT slug, title, content, created_at FROM pages WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn insert(&self, record: &PageRecord) -> StoreResult<()> {
        let result = sqlx::query(
            "INSERT INTO pages (slug, title, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.slug)
        .bind(&record.title)
        .bind(&record.content)
        .bind(record.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::AlreadyExists(record.slug.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_recent(&self, limit: Option<usize>) -> StoreResult<Vec<PageRecord>> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit
            .and_then(|limit| i64::try_from(limit).ok())
            .unwrap_or(-1);

        let records = sqlx::query_as::<_, PageRecord>(
            "SELECT slug, title, content, created_at FROM pages \
             ORDER BY created_at DESC, slug ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
