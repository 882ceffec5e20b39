use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use super::errors::{StoreError, StoreResult};
use super::models::PageRecord;
use super::store::PageStore;

/// File-backed page store: one `<slug>.json` file per page.
#[derive(Clone, Debug)]
pub struct FilePageStore {
    root: PathBuf,
}

impl FilePageStore {
    /// Opens the store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed to create pages directory: {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn page_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.json"))
    }

    async fn read_page(path: &Path) -> StoreResult<Option<PageRecord>> {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[async_trait]
impl PageStore for FilePageStore {
    async fn exists(&self, slug: &str) -> StoreResult<bool> {
        Ok(tokio::fs::try_exists(self.page_path(slug)).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<PageRecord>> {
        Self::read_page(&self.page_path(slug)).await
    }

    async fn insert(&self, record: &PageRecord) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(record).map_err(|source| StoreError::Encode {
            slug: record.slug.clone(),
            source,
        })?;

        let root = self.root.clone();
        let path = self.page_path(&record.slug);
        let published = tokio::task::spawn_blocking(move || publish(&root, &path, &body))
            .await
            .map_err(io::Error::other)?;

        match published {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists(record.slug.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_recent(&self, limit: Option<usize>) -> StoreResult<Vec<PageRecord>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut pages = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match Self::read_page(&path).await {
                Ok(Some(page)) => pages.push(page),
                Ok(None) => {}
                Err(err) => tracing::warn!("Skipping unreadable page file: {}", err),
            }
        }

        pages.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        if let Some(limit) = limit {
            pages.truncate(limit);
        }
        Ok(pages)
    }
}

/// Stages `body` in a temp file next to `path`, then links it into place.
///
/// The page becomes visible fully written or not at all. Linking fails with
/// `AlreadyExists` when the slug is taken, so concurrent writers of the same
/// slug cannot both succeed. Staged files end in `.tmp` and are never read.
fn publish(root: &Path, path: &Path, body: &[u8]) -> io::Result<()> {
    let mut staged = tempfile::Builder::new()
        .prefix(".staged-")
        .suffix(".tmp")
        .tempfile_in(root)?;
    staged.write_all(body)?;
    staged.as_file().sync_all()?;
    staged.persist_noclobber(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn page(slug: &str, minutes_ago: i64) -> PageRecord {
        PageRecord {
            slug: slug.to_string(),
            title: format!("Title of {slug}"),
            content: format!("Content of {slug}"),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("pages");

        let store = FilePageStore::open(&root).await.unwrap();
        assert!(store.root().is_dir());

        // Opening again is a no-op.
        FilePageStore::open(&root).await.unwrap();
    }

    #[tokio::test]
    async fn writes_one_json_file_per_page() {
        let temp = TempDir::new().unwrap();
        let store = FilePageStore::open(temp.path()).await.unwrap();
        let record = page("hello-world", 0);

        store.insert(&record).await.unwrap();

        let raw = std::fs::read_to_string(temp.path().join("hello-world.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["slug"], "hello-world");
        assert_eq!(json["title"], "Title of hello-world");
        assert!(json["createdAt"].is_string());

        assert!(store.exists("hello-world").await.unwrap());
        assert_eq!(store.find_by_slug("hello-world").await.unwrap(), Some(record));
        assert_eq!(store.find_by_slug("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn second_insert_does_not_overwrite() {
        let temp = TempDir::new().unwrap();
        let store = FilePageStore::open(temp.path()).await.unwrap();
        let original = page("taken", 1);
        store.insert(&original).await.unwrap();

        let mut second = page("taken", 0);
        second.content = "overwritten".to_string();
        let err = store.insert(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));

        let stored = store.find_by_slug("taken").await.unwrap().unwrap();
        assert_eq!(stored.content, original.content);
    }

    #[tokio::test]
    async fn list_skips_foreign_and_corrupt_files() {
        let temp = TempDir::new().unwrap();
        let store = FilePageStore::open(temp.path()).await.unwrap();
        store.insert(&page("older", 20)).await.unwrap();
        store.insert(&page("newer", 2)).await.unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(temp.path().join("broken.json"), "{not json").unwrap();

        let pages = store.list_recent(None).await.unwrap();
        let slugs: Vec<_> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["newer", "older"]);

        assert_eq!(store.list_recent(Some(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn staged_files_are_never_visible() {
        let temp = TempDir::new().unwrap();
        let store = FilePageStore::open(temp.path()).await.unwrap();
        // What an insert interrupted before publishing leaves behind.
        std::fs::write(temp.path().join(".staged-inflight.tmp"), "{\"slug\": \"infl").unwrap();

        assert!(!store.exists("inflight").await.unwrap());
        assert_eq!(store.find_by_slug("inflight").await.unwrap(), None);
        assert!(store.list_recent(None).await.unwrap().is_empty());

        let record = page("inflight", 0);
        store.insert(&record).await.unwrap();
        assert_eq!(store.find_by_slug("inflight").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn rejected_insert_leaves_no_staged_file() {
        let temp = TempDir::new().unwrap();
        let store = FilePageStore::open(temp.path()).await.unwrap();
        store.insert(&page("taken", 1)).await.unwrap();
        assert!(store.insert(&page("taken", 0)).await.is_err());

        let names: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["taken.json"]);
    }

    #[tokio::test]
    async fn corrupt_page_is_an_error_on_lookup() {
        let temp = TempDir::new().unwrap();
        let store = FilePageStore::open(temp.path()).await.unwrap();
        std::fs::write(temp.path().join("broken.json"), "{").unwrap();

        let err = store.find_by_slug("broken").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
