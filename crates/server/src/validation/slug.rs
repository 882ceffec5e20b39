use thiserror::Error;

pub const MIN_SLUG_LEN: usize = 3;
pub const MAX_SLUG_LEN: usize = 50;

/// Slugs that collide with system routes or static assets.
pub const RESERVED_SLUGS: &[&str] = &[
    "create",
    "write",
    "api",
    "public",
    "list",
    "check-slug",
    "search",
    "pages",
    "static",
    "assets",
    "favicon",
    "robots",
    "sitemap",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("slug is required")]
    Missing,
    #[error("slug must be 3-50 characters of letters, numbers and hyphens")]
    InvalidFormat,
}

/// Lowercases and trims a user-supplied slug, then checks its format.
///
/// The returned value is the storage key for the page.
pub fn normalize_slug(raw: &str) -> Result<String, SlugError> {
    let slug = raw.trim().to_lowercase();
    if slug.is_empty() {
        return Err(SlugError::Missing);
    }

    let is_valid = (MIN_SLUG_LEN..=MAX_SLUG_LEN).contains(&slug.len())
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');

    if is_valid {
        Ok(slug)
    } else {
        Err(SlugError::InvalidFormat)
    }
}

/// Like [`normalize_slug`], treating an absent value as [`SlugError::Missing`].
pub fn normalize_optional_slug(raw: Option<&str>) -> Result<String, SlugError> {
    raw.map_or(Err(SlugError::Missing), normalize_slug)
}

pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}
