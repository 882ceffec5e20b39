//! Registry behaviour against both page stores

use std::sync::Arc;

use chrono::Utc;
use doxify_server::page::{
    FilePageStore, RegistryError, SlugRegistry, SqlitePageStore, UnavailableReason,
};
use doxify_server::test_helpers::create_test_pool;
use tempfile::TempDir;

/// Keeps the temp directory alive for as long as the registry is in use.
struct Fixture {
    registry: SlugRegistry,
    dir: Option<TempDir>,
}

async fn sqlite_fixture() -> Fixture {
    let pool = create_test_pool().await.unwrap();
    Fixture {
        registry: SlugRegistry::new(Arc::new(SqlitePageStore::new(pool))),
        dir: None,
    }
}

async fn file_fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = FilePageStore::open(dir.path().join("pages")).await.unwrap();
    Fixture {
        registry: SlugRegistry::new(Arc::new(store)),
        dir: Some(dir),
    }
}

async fn fixtures() -> Vec<(&'static str, Fixture)> {
    vec![
        ("sqlite", sqlite_fixture().await),
        ("files", file_fixture().await),
    ]
}

#[tokio::test]
async fn create_then_get_round_trips() {
    for (backend, fixture) in fixtures().await {
        let registry = &fixture.registry;
        let before = Utc::now();

        let created = registry
            .create("New-Page1", "A title", "Some content")
            .await
            .unwrap();
        assert_eq!(created.slug, "new-page1", "{backend}");

        let fetched = registry.get("new-page1").await.unwrap();
        assert_eq!(fetched.slug, "new-page1", "{backend}");
        assert_eq!(fetched.title, "A title", "{backend}");
        assert_eq!(fetched.content, "Some content", "{backend}");
        assert!(fetched.created_at >= before, "{backend}");

        // Lookups are case-insensitive and trimmed.
        assert_eq!(registry.get("  NEW-PAGE1 ").await.unwrap(), fetched, "{backend}");
    }
}

#[tokio::test]
async fn second_create_is_a_duplicate() {
    for (backend, fixture) in fixtures().await {
        let registry = &fixture.registry;
        registry.create("same-slug", "Winner", "first").await.unwrap();

        let err = registry
            .create("SAME-slug", "Loser", "second")
            .await
            .unwrap_err();
        assert!(
            matches!(err, RegistryError::DuplicateSlug(ref s) if s == "same-slug"),
            "{backend}: {err:?}"
        );

        let stored = registry.get("same-slug").await.unwrap();
        assert_eq!(stored.title, "Winner", "{backend}");
        assert_eq!(stored.content, "first", "{backend}");
    }
}

#[tokio::test]
async fn concurrent_creates_admit_exactly_one_winner() {
    for (backend, fixture) in fixtures().await {
        let registry = Arc::new(fixture.registry.clone());

        let attempts = (0..8).map(|i| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .create("contested", &format!("Writer {i}"), "body")
                    .await
            })
        });

        let mut winners = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            match attempt.await.unwrap() {
                Ok(_) => winners += 1,
                Err(RegistryError::DuplicateSlug(_)) => {}
                Err(other) => panic!("{backend}: unexpected error {other:?}"),
            }
        }
        assert_eq!(winners, 1, "{backend}");
    }
}

#[tokio::test]
async fn availability_flips_after_creation() {
    for (backend, fixture) in fixtures().await {
        let registry = &fixture.registry;

        let before = registry.check_available("abc").await.unwrap();
        assert!(before.available, "{backend}");

        registry.create("abc", "Title", "Body").await.unwrap();

        let after = registry.check_available("ABC").await.unwrap();
        assert!(!after.available, "{backend}");
        assert_eq!(after.reason, Some(UnavailableReason::Taken), "{backend}");
    }
}

#[tokio::test]
async fn invalid_slugs_fail_validation() {
    for (backend, fixture) in fixtures().await {
        let registry = &fixture.registry;

        assert!(
            matches!(
                registry.get("ab").await,
                Err(RegistryError::InvalidSlug(_))
            ),
            "{backend}"
        );
        let availability = registry.check_available("ab").await.unwrap();
        assert!(!availability.available, "{backend}");
        assert_eq!(
            availability.reason,
            Some(UnavailableReason::InvalidFormat),
            "{backend}"
        );
    }
}

#[tokio::test]
async fn reserved_slugs_never_resolve() {
    let fixture = file_fixture().await;
    let dir = fixture.dir.as_ref().unwrap().path().join("pages");

    // Plant pages under reserved names behind the registry's back.
    for slug in ["create", "api"] {
        let body = serde_json::json!({
            "slug": slug,
            "title": "planted",
            "content": "planted",
            "createdAt": Utc::now(),
        });
        std::fs::write(dir.join(format!("{slug}.json")), body.to_string()).unwrap();
    }

    for slug in ["create", "api", "API"] {
        let err = fixture.registry.get(slug).await.unwrap_err();
        assert!(matches!(err, RegistryError::Reserved(_)), "{slug}: {err:?}");
    }
}

#[tokio::test]
async fn list_and_search_scenario() {
    for (backend, fixture) in fixtures().await {
        let registry = &fixture.registry;
        registry
            .create("hello-world", "Hi", "Body text")
            .await
            .unwrap();

        let all = registry.list(Some(10), None).await;
        assert_eq!(
            all.iter().filter(|p| p.slug == "hello-world").count(),
            1,
            "{backend}"
        );

        let by_content = registry.list(Some(10), Some("body")).await;
        assert!(by_content.iter().any(|p| p.slug == "hello-world"), "{backend}");

        let by_title = registry.list(Some(10), Some("HI")).await;
        assert!(by_title.iter().any(|p| p.slug == "hello-world"), "{backend}");

        let none = registry.list(Some(10), Some("zzz")).await;
        assert!(none.is_empty(), "{backend}");
    }
}

#[tokio::test]
async fn list_is_newest_first() {
    for (backend, fixture) in fixtures().await {
        let registry = &fixture.registry;
        for slug in ["first", "second", "third"] {
            registry.create(slug, "Title", "Body").await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let slugs: Vec<_> = registry
            .list(None, None)
            .await
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, ["third", "second", "first"], "{backend}");

        assert_eq!(registry.list(Some(2), None).await.len(), 2, "{backend}");
    }
}
