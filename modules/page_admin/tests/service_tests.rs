//! Integration tests for the page admin service: forms, save flow and content versioning

mod common;

use common::*;
use page_admin::contract::*;
use page_admin::domain::{EventPublisher, PageEvent};
use page_admin::infra::{InMemoryAliasStore, InMemoryContentStore, InMemoryPageTree};
use page_admin::PageAdminModule;
use parking_lot::Mutex;
use std::sync::Arc;

fn slot_filter(page_id: PageId, language: &str, slot: &str) -> ContentFilter {
    ContentFilter {
        page_id: Some(page_id),
        language: Some(language.to_string()),
        slot: Some(slot.to_string()),
        body_contains: None,
    }
}

fn article_form(title: &str, slug: &str, body: &str) -> PageSubmission {
    page_form(title, slug)
        .with("template", ARTICLE)
        .with("body", body)
}

#[tokio::test]
async fn test_add_view_for_default_template() {
    print_test_header(
        "test_add_view_for_default_template",
        &["Add form holds the base fieldsets and the mandatory slots only"],
    );
    let service = test_service();

    let ctx = service.add_view(&admin()).await.unwrap();
    assert_eq!(ctx.language, "en");
    assert_eq!(ctx.template, "pages/default.html");
    assert_eq!(ctx.placeholders, vec!["title".to_string(), "slug".to_string()]);
    assert!(ctx.page.is_none());
    assert!(ctx.traduction_languages.is_empty());

    let names: Vec<&str> = ctx.form.fieldsets.iter().map(|fs| fs.name.as_str()).collect();
    assert_eq!(names, vec!["General", "Options", "Metadata"]);
    assert!(ctx.form.field("title").unwrap().required);
    assert!(ctx.form.field("slug").unwrap().required);
    assert!(ctx.form.contains("meta_description"));
    assert_eq!(ctx.form.initial("status"), Some("draft"));
}

#[tokio::test]
async fn test_template_parameter_previews_slots() {
    let service = test_service();
    let mut ctx = admin();
    ctx.template = Some(ARTICLE.to_string());

    let view = service.add_view(&ctx).await.unwrap();
    assert_eq!(view.template, ARTICLE);
    assert_eq!(&view.placeholders[..2], &["title".to_string(), "slug".to_string()]);
    assert!(view.form.contains("body"));
    let content = view.form.fieldset("Content").unwrap();
    assert_eq!(content.fields, vec!["body", "summary", "image"]);
    assert_eq!(
        view.form.field("body").unwrap().field_type,
        FieldType::RichText
    );
}

#[tokio::test]
async fn test_save_then_change_view_round_trip() {
    print_test_header(
        "test_save_then_change_view_round_trip",
        &[
            "Values saved through the add form come back as change form initials",
            "in the language they were saved in",
        ],
    );
    let service = test_service();

    let page = service
        .add_page(
            &admin(),
            &article_form("Hello", "hello", "<p>Body</p>")
                .with("meta_description", "About hello")
                .with("tags", "news, intro, news"),
        )
        .await
        .unwrap();
    assert!(page.id > 0);
    assert_eq!(page.template.as_deref(), Some(ARTICLE));
    assert_eq!(page.author.as_deref(), Some("admin"));
    assert_eq!(page.tags, vec!["news".to_string(), "intro".to_string()]);
    assert!(page.is_root());

    let view = service.change_view(&admin(), &page.id.to_string()).await.unwrap();
    assert_eq!(view.template, ARTICLE);
    assert_eq!(view.form.initial("title"), Some("Hello"));
    assert_eq!(view.form.initial("slug"), Some("hello"));
    assert_eq!(view.form.initial("body"), Some("<p>Body</p>"));
    assert_eq!(view.form.initial("meta_description"), Some("About hello"));
    assert_eq!(view.form.initial("summary"), None);
    assert_eq!(view.page.unwrap().id, page.id);
}

#[tokio::test]
async fn test_unknown_object_id_is_not_found() {
    let service = test_service();
    for object_id in ["999", "abc"] {
        let result = service.change_view(&admin(), object_id).await;
        assert!(matches!(result, Err(PageAdminError::NotFound { .. })));
    }
}

#[tokio::test]
async fn test_other_language_has_no_title_fallback() {
    print_test_header(
        "test_other_language_has_no_title_fallback",
        &["A page saved in English shows empty slots when edited in French"],
    );
    let service = test_service();
    let page = service
        .add_page(&admin(), &article_form("Hello", "hello", "Body"))
        .await
        .unwrap();

    let view = service
        .change_view(&admin_in("fr"), &page.id.to_string())
        .await
        .unwrap();
    assert_eq!(view.language, "fr");
    assert_eq!(view.form.initial("title"), None);
    assert_eq!(view.form.initial("body"), None);
    assert_eq!(view.traduction_languages, vec!["en".to_string()]);
    assert_eq!(view.form.initial("language"), Some("fr"));
}

#[tokio::test]
async fn test_session_language_used_without_query() {
    let service = test_service();
    let mut ctx = admin();
    ctx.session_language = Some("fr".to_string());
    assert_eq!(service.add_view(&ctx).await.unwrap().language, "fr");

    ctx.query_language = Some("xx".to_string());
    assert_eq!(service.active_language(&ctx), "fr");
}

#[tokio::test]
async fn test_default_content_fallback_seeds_translation() {
    print_test_header(
        "test_default_content_fallback_seeds_translation",
        &[
            "With the fallback enabled an untranslated page starts from",
            "the official language values, except title and slug",
        ],
    );
    let mut config = test_config();
    config.default_content_fallback = true;
    let service = service_with(config);
    assert!(service.uses_default_content());

    let page = service
        .add_page(&admin(), &article_form("Hello", "hello", "English body"))
        .await
        .unwrap();

    let view = service
        .change_view(&admin_in("fr"), &page.id.to_string())
        .await
        .unwrap();
    assert_eq!(view.form.initial("body"), Some("English body"));
    assert_eq!(view.form.initial("title"), None);
    assert_eq!(view.form.initial("slug"), None);

    // Once translated, the stored French values win
    service
        .change_page(
            &admin_in("fr"),
            &page.id.to_string(),
            &article_form("Bonjour", "bonjour", "Corps"),
        )
        .await
        .unwrap();
    let view = service
        .change_view(&admin_in("fr"), &page.id.to_string())
        .await
        .unwrap();
    assert_eq!(view.form.initial("body"), Some("Corps"));
    assert_eq!(view.form.initial("title"), Some("Bonjour"));
}

#[tokio::test]
async fn test_slots_are_versioned_only_when_changed() {
    let service = test_service();
    let page = service
        .add_page(&admin(), &article_form("Hello", "hello", "v1"))
        .await
        .unwrap();
    let object_id = page.id.to_string();

    service
        .change_page(&admin(), &object_id, &article_form("Hello", "hello", "v1"))
        .await
        .unwrap();
    let bodies = service
        .list_contents(&admin(), &slot_filter(page.id, "en", "body"))
        .await
        .unwrap();
    assert_eq!(bodies.len(), 1);

    service
        .change_page(&admin(), &object_id, &article_form("Hello", "hello", "v2"))
        .await
        .unwrap();
    let bodies = service
        .list_contents(&admin(), &slot_filter(page.id, "en", "body"))
        .await
        .unwrap();
    let versions: Vec<i32> = bodies.iter().map(|c| c.version).collect();
    assert_eq!(versions, vec![1, 2]);

    let view = service.change_view(&admin(), &object_id).await.unwrap();
    assert_eq!(view.form.initial("body"), Some("v2"));
}

#[tokio::test]
async fn test_metadata_is_overwritten_in_place() {
    let service = test_service();
    let page = service
        .add_page(&admin(), &page_form("Hello", "hello").with("meta_keywords", "a"))
        .await
        .unwrap();
    let object_id = page.id.to_string();

    service
        .change_page(&admin(), &object_id, &page_form("Hello", "hello").with("meta_keywords", "b"))
        .await
        .unwrap();
    let records = service
        .list_contents(&admin(), &slot_filter(page.id, "en", "meta_keywords"))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].body, "b");

    // Absent metadata is cleared
    service
        .change_page(&admin(), &object_id, &page_form("Hello", "hello"))
        .await
        .unwrap();
    let records = service
        .list_contents(&admin(), &slot_filter(page.id, "en", "meta_keywords"))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].body, "");
}

#[tokio::test]
async fn test_unsubmitted_slots_are_left_alone() {
    let service = test_service();
    let page = service
        .add_page(&admin(), &article_form("Hello", "hello", "Body").with("summary", "Short"))
        .await
        .unwrap();

    service
        .change_page(
            &admin(),
            &page.id.to_string(),
            &page_form("Hello again", "hello"),
        )
        .await
        .unwrap();
    let view = service.change_view(&admin(), &page.id.to_string()).await.unwrap();
    assert_eq!(view.form.initial("title"), Some("Hello again"));
    assert_eq!(view.form.initial("summary"), Some("Short"));
    assert_eq!(view.form.initial("body"), Some("Body"));
}

#[tokio::test]
async fn test_file_slot_upload_and_clear() {
    let service = test_service();
    let page = service
        .add_page(
            &admin_in("fr"),
            &article_form("Bonjour", "bonjour", "Corps").with("image-upload", "uploads/a.png"),
        )
        .await
        .unwrap();

    // Untranslated slots live under the official language
    let images = service
        .list_contents(&admin(), &slot_filter(page.id, "en", "image"))
        .await
        .unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].body, "uploads/a.png");

    service
        .change_page(
            &admin_in("fr"),
            &page.id.to_string(),
            &article_form("Bonjour", "bonjour", "Corps").with("image-clear", "on"),
        )
        .await
        .unwrap();
    let images = service
        .list_contents(&admin(), &slot_filter(page.id, "en", "image"))
        .await
        .unwrap();
    assert_eq!(images.last().unwrap().body, "");
}

#[tokio::test]
async fn test_invalid_submission_writes_nothing() {
    print_test_header(
        "test_invalid_submission_writes_nothing",
        &["A rejected form reports field errors and leaves storage untouched"],
    );
    let service = test_service();

    let result = service
        .add_page(&admin(), &PageSubmission::new().with("title", "No slug"))
        .await;
    match result {
        Err(PageAdminError::InvalidForm { errors }) => {
            assert!(errors.iter().any(|e| e.field == "slug"));
        }
        other => panic!("expected invalid form, got {:?}", other),
    }

    let result = service
        .add_page(&admin(), &page_form("Title", "not a slug"))
        .await;
    assert!(matches!(result, Err(PageAdminError::InvalidForm { .. })));

    let result = service
        .add_page(&admin(), &page_form("Title", "ok").with("template", "missing.html"))
        .await;
    assert!(matches!(result, Err(PageAdminError::InvalidForm { .. })));

    let listing = service.list_pages(&admin(), "").await.unwrap();
    assert!(listing.pages.is_empty());
    let contents = service
        .list_contents(&admin(), &ContentFilter::default())
        .await
        .unwrap();
    assert!(contents.is_empty());
}

#[tokio::test]
async fn test_move_through_form_and_stale_target() {
    print_test_header(
        "test_move_through_form_and_stale_target",
        &[
            "target/position move a saved page; a target that no longer",
            "exists is ignored and the page stays where it was saved",
        ],
    );
    let service = test_service();
    let parent = service
        .add_page(&admin(), &page_form("Parent", "parent"))
        .await
        .unwrap();
    let child = service
        .add_page(
            &admin(),
            &page_form("Child", "child").with_move(parent.id, "last-child"),
        )
        .await
        .unwrap();
    assert_eq!(child.parent_id, Some(parent.id));
    assert_eq!(child.level, 1);

    let orphan = service
        .add_page(
            &admin(),
            &page_form("Orphan", "orphan").with_move(9_999, "last-child"),
        )
        .await
        .unwrap();
    assert!(orphan.is_root());

    // A page cannot be moved under its own descendant
    let result = service
        .change_page(
            &admin(),
            &parent.id.to_string(),
            &page_form("Parent", "parent").with_move(child.id, "last-child"),
        )
        .await;
    match result {
        Err(PageAdminError::InvalidForm { errors }) => assert_eq!(errors[0].field, "target"),
        other => panic!("expected invalid form, got {:?}", other),
    }
}

#[tokio::test]
async fn test_template_is_inherited_from_ancestors() {
    let service = test_service();
    let parent = service
        .add_page(&admin(), &article_form("Parent", "parent", "Body"))
        .await
        .unwrap();
    let child = service
        .add_page(
            &admin(),
            &page_form("Child", "child").with_move(parent.id, "first-child"),
        )
        .await
        .unwrap();
    assert!(child.template.is_none());

    let view = service.change_view(&admin(), &child.id.to_string()).await.unwrap();
    assert_eq!(view.template, ARTICLE);
    assert!(view.form.contains("body"));
}

#[tokio::test]
async fn test_move_page_and_sub_menu() {
    let service = test_service();
    let a = service.add_page(&admin(), &page_form("A", "a")).await.unwrap();
    let b = service.add_page(&admin(), &page_form("B", "b")).await.unwrap();
    let c = service.add_page(&admin(), &page_form("C", "c")).await.unwrap();

    service
        .move_page(&admin(), b.id, a.id, TreePosition::LastChild)
        .await
        .unwrap();
    let moved = service
        .move_page(&admin(), c.id, b.id, TreePosition::Left)
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(a.id));

    let children = service.sub_menu(&admin(), a.id).await.unwrap();
    let ids: Vec<PageId> = children.iter().map(|s| s.page.id).collect();
    assert_eq!(ids, vec![c.id, b.id]);
    assert_eq!(children[0].title.as_deref(), Some("C"));

    let result = service
        .move_page(&admin(), a.id, b.id, TreePosition::FirstChild)
        .await;
    assert!(matches!(result, Err(PageAdminError::Validation { .. })));
}

#[tokio::test]
async fn test_list_pages_roots_and_search() {
    print_test_header(
        "test_list_pages_roots_and_search",
        &["Empty query lists root pages, a needle searches every page's content"],
    );
    let service = test_service();
    let root = service
        .add_page(&admin(), &article_form("Root", "root", "Welcome"))
        .await
        .unwrap();
    let child = service
        .add_page(
            &admin(),
            &article_form("Child", "child", "Contains the NEEDLE").with_move(root.id, "last-child"),
        )
        .await
        .unwrap();

    let listing = service.list_pages(&admin(), "  ").await.unwrap();
    assert_eq!(listing.query, "");
    assert!(listing.can_publish);
    assert_eq!(listing.pages.len(), 1);
    assert_eq!(listing.pages[0].page.id, root.id);
    assert_eq!(listing.pages[0].children_count, 1);
    assert_eq!(listing.pages[0].languages, vec!["en".to_string()]);

    let listing = service.list_pages(&admin(), "needle").await.unwrap();
    let ids: Vec<PageId> = listing.pages.iter().map(|s| s.page.id).collect();
    assert_eq!(ids, vec![child.id]);

    let listing = service.list_pages(&admin(), "nothing matches").await.unwrap();
    assert!(listing.pages.is_empty());
}

#[tokio::test]
async fn test_unique_slug_among_siblings() {
    let mut config = test_config();
    config.unique_slug_required = true;
    let service = service_with(config);

    let first = service
        .add_page(&admin(), &page_form("First", "same"))
        .await
        .unwrap();
    let result = service.add_page(&admin(), &page_form("Second", "same")).await;
    assert!(matches!(result, Err(PageAdminError::InvalidForm { .. })));

    // Re-saving the page itself is fine
    service
        .change_page(&admin(), &first.id.to_string(), &page_form("First", "same"))
        .await
        .unwrap();

    // Same slug under another parent is fine
    service
        .add_page(
            &admin(),
            &page_form("Nested", "same").with_move(first.id, "last-child"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_redirect_target_must_exist() {
    let service = test_service();
    let page = service.add_page(&admin(), &page_form("A", "a")).await.unwrap();

    let result = service
        .add_page(&admin(), &page_form("B", "b").with("redirect_to", "4242"))
        .await;
    assert!(matches!(result, Err(PageAdminError::InvalidForm { .. })));

    let b = service
        .add_page(
            &admin(),
            &page_form("B", "b").with("redirect_to", page.id.to_string()),
        )
        .await
        .unwrap();
    assert_eq!(b.redirect_to, Some(page.id));
}

#[tokio::test]
async fn test_traduction_and_delete_translation() {
    let service = test_service();
    let page = service
        .add_page(&admin(), &article_form("Hello", "hello", "Body"))
        .await
        .unwrap();
    service
        .change_page(
            &admin_in("fr"),
            &page.id.to_string(),
            &article_form("Bonjour", "bonjour", "Corps"),
        )
        .await
        .unwrap();

    let translation = service.traduction(&admin(), page.id, "fr").await.unwrap();
    assert_eq!(translation.language, "en");
    let title = translation.slots.iter().find(|(slot, _, _)| slot == "title").unwrap();
    assert_eq!(title.1.as_deref(), Some("Hello"));
    assert_eq!(title.2.as_deref(), Some("Bonjour"));

    let result = service.traduction(&admin(), page.id, "de").await;
    assert!(matches!(result, Err(PageAdminError::Validation { .. })));

    assert_eq!(
        service.traduction_languages(&admin(), page.id).await.unwrap(),
        vec!["fr".to_string()]
    );
    let deleted = service.delete_content(&admin(), page.id, "fr").await.unwrap();
    assert!(deleted >= 3);
    assert!(service
        .traduction_languages(&admin(), page.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_modify_and_get_content() {
    let service = test_service();
    let page = service
        .add_page(&admin(), &article_form("Hello", "hello", "Body"))
        .await
        .unwrap();

    let content = service
        .modify_content(&admin(), page.id, "body", "en", "New body")
        .await
        .unwrap();
    assert_eq!(content.version, 2);
    assert_eq!(
        service.get_content(&admin(), page.id, content.id).await.unwrap(),
        "New body"
    );

    let result = service.get_content(&admin(), page.id + 1, content.id).await;
    assert!(matches!(result, Err(PageAdminError::NotFound { .. })));

    let result = service
        .modify_content(&admin(), page.id, "sidebar", "en", "x")
        .await;
    assert!(matches!(result, Err(PageAdminError::Validation { .. })));

    let result = service.modify_content(&admin(), page.id, "title", "en", " ").await;
    assert!(matches!(result, Err(PageAdminError::InvalidForm { .. })));

    // The change form reads through the cache, which was invalidated
    let view = service.change_view(&admin(), &page.id.to_string()).await.unwrap();
    assert_eq!(view.form.initial("body"), Some("New body"));
}

#[tokio::test]
async fn test_change_status_and_delete() {
    let service = test_service();
    let parent = service.add_page(&admin(), &page_form("A", "a")).await.unwrap();
    let child = service
        .add_page(&admin(), &page_form("B", "b").with_move(parent.id, "last-child"))
        .await
        .unwrap();

    let page = service
        .change_status(&admin(), parent.id, PageStatus::Published)
        .await
        .unwrap();
    assert_eq!(page.status, PageStatus::Published);

    let deleted = service.delete_page(&admin(), parent.id).await.unwrap();
    assert_eq!(deleted.len(), 2);
    assert!(deleted.contains(&child.id));
    let contents = service
        .list_contents(
            &admin(),
            &ContentFilter {
                page_id: Some(child.id),
                ..ContentFilter::default()
            },
        )
        .await
        .unwrap();
    assert!(contents.is_empty());
    assert!(matches!(
        service.delete_page(&admin(), parent.id).await,
        Err(PageAdminError::NotFound { .. })
    ));
}

/// Publisher that keeps every event
#[derive(Default)]
struct RecordingPublisher {
    events: Mutex<Vec<PageEvent>>,
}

#[async_trait::async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: PageEvent) -> anyhow::Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

#[tokio::test]
async fn test_events_follow_mutations() {
    let publisher = Arc::new(RecordingPublisher::default());
    let module = PageAdminModule::new(
        test_config(),
        Arc::new(InMemoryPageTree::new()),
        Arc::new(InMemoryContentStore::new()),
        Arc::new(InMemoryAliasStore::new()),
        publisher.clone(),
    )
    .unwrap();
    let service = module.service();

    let page = service.add_page(&admin(), &page_form("A", "a")).await.unwrap();
    service
        .change_status(&admin(), page.id, PageStatus::Hidden)
        .await
        .unwrap();
    service.delete_page(&admin(), page.id).await.unwrap();

    let events = publisher.events.lock();
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], PageEvent::PageSaved(e) if e.is_new && e.language == "en"));
    assert!(matches!(&events[1], PageEvent::StatusChanged(e) if e.status == "hidden"));
    assert!(matches!(&events[2], PageEvent::PagesDeleted(e) if e.page_ids == vec![page.id]));
}

#[tokio::test]
async fn test_native_client_delegates() {
    let module = PageAdminModule::in_memory(test_config()).unwrap();
    let client = module.client();

    let page = client.add_page(&admin(), &page_form("A", "a")).await.unwrap();
    let listing = client.list_pages(&admin(), "").await.unwrap();
    assert_eq!(listing.pages.len(), 1);
    assert_eq!(listing.pages[0].page.id, page.id);
}

#[tokio::test]
async fn test_editor_without_publish_rights() {
    print_test_header(
        "test_editor_without_publish_rights",
        &[
            "An editor who may only add pages gets no status or freeze fields,",
            "a submitted status is ignored and the change view is refused",
        ],
    );
    let service = test_service();
    let ctx = RequestContext::new(Principal::new("writer").with(Capability::AddPage));

    let view = service.add_view(&ctx).await.unwrap();
    assert!(!view.form.contains("status"));
    assert!(!view.form.contains("freeze_date"));

    let page = service
        .add_page(
            &ctx,
            &page_form("Draft", "draft")
                .with("status", "published")
                .with("freeze_date", "2030-01-01"),
        )
        .await
        .unwrap();
    assert_eq!(page.status, PageStatus::Draft);
    assert!(page.freeze_date.is_none());

    let result = service.change_view(&ctx, &page.id.to_string()).await;
    assert!(matches!(result, Err(PageAdminError::Forbidden { .. })));
    let result = service.change_status(&ctx, page.id, PageStatus::Published).await;
    assert!(matches!(result, Err(PageAdminError::Forbidden { .. })));
    let result = service.delete_page(&ctx, page.id).await;
    assert!(matches!(result, Err(PageAdminError::Forbidden { .. })));

    let listing = service.list_pages(&admin(), "").await.unwrap();
    assert_eq!(listing.pages.len(), 1);
}

#[tokio::test]
async fn test_anonymous_is_refused() {
    let service = test_service();
    let result = service.add_view(&RequestContext::default()).await;
    assert!(matches!(result, Err(PageAdminError::Forbidden { .. })));
}

#[tokio::test]
async fn test_alias_lifecycle() {
    let service = test_service();
    let a = service.add_page(&admin(), &page_form("A", "a")).await.unwrap();
    let b = service.add_page(&admin(), &page_form("B", "b")).await.unwrap();

    let alias = service.create_alias(&admin(), a.id, " /old-a ").await.unwrap();
    assert_eq!(alias.url, "/old-a");
    assert_eq!(alias.page_id, a.id);

    let result = service.create_alias(&admin(), b.id, "/old-a").await;
    assert!(matches!(result, Err(PageAdminError::Conflict { .. })));
    let result = service.create_alias(&admin(), b.id, "  ").await;
    assert!(matches!(result, Err(PageAdminError::InvalidForm { .. })));
    let result = service.create_alias(&admin(), 999, "/nowhere").await;
    assert!(matches!(result, Err(PageAdminError::NotFound { .. })));

    // Keeping its own url is not a conflict
    service.update_alias(&admin(), alias.id, "/old-a").await.unwrap();
    let updated = service.update_alias(&admin(), alias.id, "/legacy-a").await.unwrap();
    assert_eq!(updated.url, "/legacy-a");

    service.create_alias(&admin(), b.id, "/old-b").await.unwrap();
    assert_eq!(service.list_aliases(&admin(), None).await.unwrap().len(), 2);
    assert_eq!(service.list_aliases(&admin(), Some(b.id)).await.unwrap().len(), 1);

    service.delete_alias(&admin(), alias.id).await.unwrap();
    let result = service.delete_alias(&admin(), alias.id).await;
    assert!(matches!(result, Err(PageAdminError::NotFound { .. })));

    // Deleting a page removes its aliases
    service.delete_page(&admin(), b.id).await.unwrap();
    assert!(service.list_aliases(&admin(), None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export_import_round_trip() {
    print_test_header(
        "test_export_import_round_trip",
        &[
            "Exported pages import as new pages under the same hierarchy;",
            "alias urls already in use are reported and skipped",
        ],
    );
    let service = test_service();
    let parent = service
        .add_page(&admin(), &article_form("Parent", "parent", "Parent body"))
        .await
        .unwrap();
    let child = service
        .add_page(
            &admin(),
            &page_form("Child", "child").with_move(parent.id, "last-child"),
        )
        .await
        .unwrap();
    service
        .change_page(
            &admin_in("fr"),
            &parent.id.to_string(),
            &article_form("Parent fr", "parent-fr", "Corps"),
        )
        .await
        .unwrap();
    service
        .change_status(&admin(), parent.id, PageStatus::Published)
        .await
        .unwrap();
    service.create_alias(&admin(), parent.id, "/parent").await.unwrap();

    let document = service.export_pages(&admin(), &[parent.id]).await.unwrap();
    let pages = document["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["id"], parent.id);
    assert_eq!(pages[1]["parent_id"], parent.id);
    assert_eq!(pages[0]["contents"]["fr"]["body"], "Corps");
    assert_eq!(pages[0]["contents"]["en"]["body"], "Parent body");

    let report = service.import_pages(&admin(), &document).await.unwrap();
    assert_eq!(report.created.len(), 2);
    assert_eq!(report.skipped_aliases, vec!["/parent".to_string()]);

    let new_parent = report.created[0];
    let new_child = report.created[1];
    assert!(new_parent != parent.id && new_child != child.id);
    let children = service.sub_menu(&admin(), new_parent).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].page.id, new_child);
    assert_eq!(children[0].title.as_deref(), Some("Child"));

    let view = service
        .change_view(&admin_in("fr"), &new_parent.to_string())
        .await
        .unwrap();
    assert_eq!(view.template, ARTICLE);
    assert_eq!(view.form.initial("body"), Some("Corps"));
    assert_eq!(view.page.unwrap().status, PageStatus::Published);
}

#[tokio::test]
async fn test_invalid_import_creates_nothing() {
    let service = test_service();

    let result = service
        .import_pages(&admin(), &serde_json::json!({ "version": 1, "pages": [] }))
        .await;
    assert!(matches!(result, Err(PageAdminError::Validation { .. })));

    let document = serde_json::json!({
        "version": 1,
        "official_language": "en",
        "pages": [
            {
                "id": 1,
                "status": "draft",
                "contents": { "en": { "title": "Ok", "slug": "ok" } }
            },
            {
                "id": 2,
                "status": "draft",
                "template": "pages/unknown.html",
                "contents": { "de": { "title": "Nein", "slug": "nein" } }
            }
        ]
    });
    match service.import_pages(&admin(), &document).await {
        Err(PageAdminError::Validation { message }) => {
            assert!(message.contains("unknown template"));
            assert!(message.contains("unknown language 'de'"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(service.list_pages(&admin(), "").await.unwrap().pages.is_empty());
}
