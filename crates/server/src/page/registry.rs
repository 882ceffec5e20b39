use std::sync::Arc;

use chrono::Utc;

use super::errors::RegistryError;
use super::models::{Availability, PageRecord, UnavailableReason};
use super::store::PageStore;
use crate::validation::slug::{SlugError, is_reserved, normalize_slug};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_LIST_LIMIT: usize = 50;

/// Single source of truth for slug validity, uniqueness and page lookup.
#[derive(Clone)]
pub struct SlugRegistry {
    store: Arc<dyn PageStore>,
    list_limit: usize,
}

impl SlugRegistry {
    pub fn new(store: Arc<dyn PageStore>) -> Self {
        Self {
            store,
            list_limit: MAX_LIST_LIMIT,
        }
    }

    /// Caps every listing at `limit` (clamped to `1..=MAX_LIST_LIMIT`).
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit.clamp(1, MAX_LIST_LIMIT);
        self
    }

    pub fn list_limit(&self) -> usize {
        self.list_limit
    }

    pub async fn check_available(&self, raw_slug: &str) -> Result<Availability, RegistryError> {
        let slug = match normalize_slug(raw_slug) {
            Ok(slug) => slug,
            Err(_) => {
                return Ok(Availability::unavailable(
                    None,
                    UnavailableReason::InvalidFormat,
                ));
            }
        };

        if is_reserved(&slug) {
            return Ok(Availability::unavailable(
                Some(slug),
                UnavailableReason::Reserved,
            ));
        }

        if self.store.exists(&slug).await? {
            Ok(Availability::unavailable(Some(slug), UnavailableReason::Taken))
        } else {
            Ok(Availability::available(slug))
        }
    }

    pub async fn create(
        &self,
        raw_slug: &str,
        title: &str,
        content: &str,
    ) -> Result<PageRecord, RegistryError> {
        let slug = normalize_slug(raw_slug).map_err(|err| match err {
            SlugError::Missing => {
                RegistryError::invalid_input("All fields are required: slug, title, and content.")
            }
            SlugError::InvalidFormat => RegistryError::invalid_input(
                "Invalid page name format. Use only letters, numbers and hyphens (3-50 characters).",
            ),
        })?;

        if is_reserved(&slug) {
            return Err(RegistryError::invalid_input(format!(
                "`{slug}` is reserved. Please choose a different URL name."
            )));
        }
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(RegistryError::invalid_input(
                "All fields are required: slug, title, and content.",
            ));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(RegistryError::invalid_input(
                "Title must be at most 200 characters.",
            ));
        }

        // Fast path only: the store's uniqueness guarantee decides races.
        if self.store.exists(&slug).await? {
            return Err(RegistryError::DuplicateSlug(slug));
        }

        let record = PageRecord {
            slug,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert(&record).await?;

        metrics::counter!("doxify.pages_created").increment(1);
        tracing::info!(
            slug = %record.slug,
            title_len = record.title.len(),
            content_len = record.content.len(),
            "Page created"
        );
        Ok(record)
    }

    pub async fn get(&self, raw_slug: &str) -> Result<PageRecord, RegistryError> {
        let slug = normalize_slug(raw_slug)?;
        if is_reserved(&slug) {
            return Err(RegistryError::Reserved(slug));
        }

        let page = self.store.find_by_slug(&slug).await?;
        page.ok_or(RegistryError::NotFound(slug))
    }

    /// Newest pages first, optionally filtered by a case-insensitive search.
    ///
    /// Storage failures degrade to an empty listing.
    pub async fn list(&self, limit: Option<usize>, query: Option<&str>) -> Vec<PageRecord> {
        let limit = limit
            .unwrap_or(self.list_limit)
            .clamp(1, self.list_limit);
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let pages = match needle {
            None => self.store.list_recent(Some(limit)).await,
            Some(ref needle) => self.store.list_recent(None).await.map(|pages| {
                pages
                    .into_iter()
                    .filter(|page| page.matches(needle))
                    .take(limit)
                    .collect()
            }),
        };

        pages.unwrap_or_else(|err| {
            metrics::counter!("doxify.storage_errors").increment(1);
            tracing::warn!("Listing pages failed, serving empty list: {}", err);
            Vec::new()
        })
    }
}
