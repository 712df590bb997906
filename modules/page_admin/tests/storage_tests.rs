//! Service tests over the SeaORM repositories on an in-memory SQLite database

mod common;

use common::*;
use page_admin::contract::*;
use page_admin::domain::{ContentRepository, Service};
use page_admin::infra::storage::SeaOrmContentRepository;
use page_admin::PageAdminModule;
use sea_orm::Database;
use std::sync::Arc;

async fn sqlite_service() -> Arc<Service> {
    sqlite_service_and_contents().await.0
}

/// Service plus a content repository sharing the same in-memory database
async fn sqlite_service_and_contents() -> (Arc<Service>, SeaOrmContentRepository) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    PageAdminModule::migrate(&db).await.unwrap();
    let contents = SeaOrmContentRepository::new(Arc::new(db.clone()));
    let service = PageAdminModule::with_database(test_config(), db)
        .unwrap()
        .service();
    (service, contents)
}

#[tokio::test]
async fn test_save_and_reload_through_database() {
    print_test_header(
        "test_save_and_reload_through_database",
        &["Pages and versioned slots survive a round trip through SQLite"],
    );
    let service = sqlite_service().await;

    let page = service
        .add_page(
            &admin(),
            &page_form("Hello", "hello")
                .with("template", ARTICLE)
                .with("body", "v1")
                .with("tags", "a, b"),
        )
        .await
        .unwrap();
    assert_eq!(page.tags, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(page.template.as_deref(), Some(ARTICLE));

    service
        .change_page(
            &admin(),
            &page.id.to_string(),
            &page_form("Hello", "hello").with("body", "v2"),
        )
        .await
        .unwrap();

    let view = service.change_view(&admin(), &page.id.to_string()).await.unwrap();
    assert_eq!(view.form.initial("body"), Some("v2"));
    assert_eq!(view.form.initial("title"), Some("Hello"));

    let versions: Vec<i32> = service
        .list_contents(
            &admin(),
            &ContentFilter {
                page_id: Some(page.id),
                language: Some("en".to_string()),
                slot: Some("body".to_string()),
                body_contains: None,
            },
        )
        .await
        .unwrap()
        .iter()
        .map(|c| c.version)
        .collect();
    assert_eq!(versions.len(), 2);
    assert!(versions.contains(&1) && versions.contains(&2));
}

#[tokio::test]
async fn test_tree_operations_through_database() {
    let service = sqlite_service().await;
    let a = service.add_page(&admin(), &page_form("A", "a")).await.unwrap();
    let b = service.add_page(&admin(), &page_form("B", "b")).await.unwrap();
    let c = service.add_page(&admin(), &page_form("C", "c")).await.unwrap();

    let moved = service
        .move_page(&admin(), b.id, a.id, TreePosition::LastChild)
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(a.id));
    assert_eq!(moved.level, 1);
    service
        .move_page(&admin(), c.id, b.id, TreePosition::FirstChild)
        .await
        .unwrap();

    let listing = service.list_pages(&admin(), "").await.unwrap();
    assert_eq!(listing.pages.len(), 1);
    assert_eq!(listing.pages[0].children_count, 1);

    let result = service
        .move_page(&admin(), a.id, c.id, TreePosition::Left)
        .await;
    assert!(matches!(result, Err(PageAdminError::Validation { .. })));

    let listing = service.list_pages(&admin(), "C").await.unwrap();
    assert!(listing.pages.iter().any(|s| s.page.id == c.id && s.page.level == 2));

    let mut deleted = service.delete_page(&admin(), a.id).await.unwrap();
    deleted.sort_unstable();
    assert_eq!(deleted, vec![a.id, b.id, c.id]);
    assert!(service.list_pages(&admin(), "").await.unwrap().pages.is_empty());
}

#[tokio::test]
async fn test_aliases_through_database() {
    let service = sqlite_service().await;
    let page = service.add_page(&admin(), &page_form("A", "a")).await.unwrap();

    let alias = service.create_alias(&admin(), page.id, "/a").await.unwrap();
    let result = service.create_alias(&admin(), page.id, "/a").await;
    assert!(matches!(result, Err(PageAdminError::Conflict { .. })));

    let updated = service.update_alias(&admin(), alias.id, "/b").await.unwrap();
    assert_eq!(updated.url, "/b");
    assert_eq!(service.list_aliases(&admin(), Some(page.id)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_migrations_apply_twice() {
    print_test_header(
        "test_migrations_apply_twice",
        &["Every migration is recorded under its own name so a second run is a no-op"],
    );
    let db = Database::connect("sqlite::memory:").await.unwrap();
    PageAdminModule::migrate(&db).await.unwrap();
    PageAdminModule::migrate(&db).await.unwrap();
}

#[tokio::test]
async fn test_versioned_slots_and_overwritten_metadata() {
    print_test_header(
        "test_versioned_slots_and_overwritten_metadata",
        &[
            "Placeholder slots gain a version per changed save",
            "Metadata slots are overwritten in place",
        ],
    );
    let (service, contents) = sqlite_service_and_contents().await;
    let page = service
        .add_page(
            &admin(),
            &page_form("Hello", "hello")
                .with("template", ARTICLE)
                .with("body", "v1")
                .with("meta_description", "First"),
        )
        .await
        .unwrap();

    let second = contents
        .create_content_if_changed(page.id, "en", "body", "v2")
        .await
        .unwrap();
    assert_eq!(second.version, 2);
    let unchanged = contents
        .create_content_if_changed(page.id, "en", "body", "v2")
        .await
        .unwrap();
    assert_eq!(unchanged.id, second.id);

    let first = contents.get_version(page.id, "en", "body", 1).await.unwrap().unwrap();
    assert_eq!(first.body, "v1");
    let versions = contents.list_versions(page.id, "en", "body").await.unwrap();
    assert_eq!(
        versions.iter().map(|c| c.version).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(
        contents.get_content(page.id, "en", "body").await.unwrap().as_deref(),
        Some("v2")
    );

    contents
        .set_or_create_content(page.id, "en", "meta_description", "Second")
        .await
        .unwrap();
    let descriptions = contents
        .list_versions(page.id, "en", "meta_description")
        .await
        .unwrap();
    assert_eq!(descriptions.len(), 1);
    assert_eq!(descriptions[0].version, 1);
    assert_eq!(descriptions[0].body, "Second");
}

#[tokio::test]
async fn test_search_through_database() {
    print_test_header(
        "test_search_through_database",
        &[
            "Wildcard characters in the query match literally",
            "Case folding covers non-ASCII text",
            "A page matching in several slots is listed once, at any depth",
        ],
    );
    let (service, contents) = sqlite_service_and_contents().await;
    let euros = service
        .add_page(
            &admin(),
            &page_form("Euros", "euros")
                .with("template", ARTICLE)
                .with("body", "Save 5000 euros"),
        )
        .await
        .unwrap();
    let axb = service
        .add_page(
            &admin(),
            &page_form("Letters", "letters")
                .with("template", ARTICLE)
                .with("body", "axb"),
        )
        .await
        .unwrap();
    let summer = service
        .add_page(
            &admin(),
            &page_form("Été special", "summer")
                .with("template", ARTICLE)
                .with("body", "ÉTÉ sale"),
        )
        .await
        .unwrap();
    service
        .move_page(&admin(), summer.id, axb.id, TreePosition::LastChild)
        .await
        .unwrap();

    assert!(contents.search("50%").await.unwrap().is_empty());
    assert!(contents.search("a_b").await.unwrap().is_empty());
    assert_eq!(contents.search("été").await.unwrap(), vec![summer.id]);
    assert_eq!(contents.search("5000").await.unwrap(), vec![euros.id]);

    let listing = service.list_pages(&admin(), "été").await.unwrap();
    assert_eq!(listing.pages.len(), 1);
    assert_eq!(listing.pages[0].page.id, summer.id);
    assert_eq!(listing.pages[0].page.level, 1);
    assert!(service.list_pages(&admin(), "a_b").await.unwrap().pages.is_empty());

    let filtered = contents
        .filter(&ContentFilter {
            page_id: None,
            language: None,
            slot: None,
            body_contains: Some("ÉTÉ".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|c| c.page_id == summer.id));
}
