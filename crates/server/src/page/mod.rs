pub mod errors;
pub mod files;
pub mod models;
pub mod registry;
pub mod sqlite;
pub mod store;

pub use errors::{RegistryError, StoreError};
pub use files::FilePageStore;
pub use models::{Availability, PageRecord, UnavailableReason};
pub use registry::SlugRegistry;
pub use sqlite::SqlitePageStore;
pub use store::PageStore;

use std::sync::Arc;

use crate::config::{Config, Storage};

/// Open the configured page store and wrap it in a registry.
///
/// Creates the database schema or pages directory on first use.
pub async fn open_registry(config: &Config) -> anyhow::Result<SlugRegistry> {
    let store: Arc<dyn PageStore> = match &config.storage {
        Storage::Sqlite { path } => {
            tracing::info!("Using SQLite page store at {}", path.display());
            Arc::new(SqlitePageStore::new(crate::db::init_pool(path).await?))
        }
        Storage::Files { dir } => {
            tracing::info!("Using file page store at {}", dir.display());
            Arc::new(FilePageStore::open(dir).await?)
        }
    };

    Ok(SlugRegistry::new(store).with_list_limit(config.pages.list_limit))
}
