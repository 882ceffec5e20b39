use std::path::PathBuf;

use thiserror::Error;

use crate::validation::slug::SlugError;

/// Failures reported by a [`PageStore`](super::PageStore) adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page `{0}` already exists")]
    AlreadyExists(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt page file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode page `{slug}`: {source}")]
    Encode {
        slug: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcomes of registry operations other than success.
///
/// Everything except `StorageUnavailable` is an expected business outcome
/// that callers render as a distinct response.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidSlug(#[from] SlugError),
    #[error("{0}")]
    InvalidInput(String),
    #[error("`{0}` is a reserved name")]
    Reserved(String),
    #[error("page `{0}` not found")]
    NotFound(String),
    #[error("page name `{0}` already exists")]
    DuplicateSlug(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] StoreError),
}

impl RegistryError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        RegistryError::InvalidInput(message.into())
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(slug) => RegistryError::DuplicateSlug(slug),
            other => {
                metrics::counter!("doxify.storage_errors").increment(1);
                RegistryError::StorageUnavailable(other)
            }
        }
    }
}
