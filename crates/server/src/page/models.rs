use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published page, keyed by its normalized slug.
///
/// Serialized as `{slug, title, content, createdAt}`, which is both the
/// on-disk format of the file store and the JSON shape served over HTTP.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl PageRecord {
    pub fn url(&self) -> String {
        format!("/{}", self.slug)
    }

    /// Case-insensitive substring match against slug, title and content.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        [&self.slug, &self.title, &self.content]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    InvalidFormat,
    Reserved,
    Taken,
}

/// Result of a slug availability check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
}

impl Availability {
    pub fn available(slug: String) -> Self {
        Self {
            available: true,
            slug: Some(slug),
            reason: None,
        }
    }

    pub fn unavailable(slug: Option<String>, reason: UnavailableReason) -> Self {
        Self {
            available: false,
            slug,
            reason: Some(reason),
        }
    }
}
