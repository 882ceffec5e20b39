use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::page::{SlugRegistry, SqlitePageStore};

/// Creates an in-memory SQLite pool with the `pages` table
pub async fn create_test_pool() -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory databases should use a single connection
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Creates a registry over a fresh in-memory database
pub async fn create_test_registry() -> Result<SlugRegistry> {
    let pool = create_test_pool().await?;
    Ok(SlugRegistry::new(Arc::new(SqlitePageStore::new(pool))))
}
