//! Change form that pre-fills empty translations from the official language
//!
//! Enabled with [`Service::with_default_content`](super::Service::with_default_content):
//! when a page has no content at all in the active language, every
//! non-mandatory slot starts from its official language value.

use super::placeholders::SlotDescriptor;
use super::repository::ContentRepository;
use crate::contract::{FormSchema, PageId};

/// Re-populate slot initials from the official language
///
/// Returns false when nothing was seeded: same language, or the page
/// already has content in the active language.
pub async fn seed_from_official_language(
    contents: &dyn ContentRepository,
    form: &mut FormSchema,
    page_id: PageId,
    language: &str,
    official_language: &str,
    slots: &[SlotDescriptor],
) -> anyhow::Result<bool> {
    if language == official_language {
        return Ok(false);
    }
    if contents.has_content_in_language(page_id, language).await? {
        return Ok(false);
    }
    for slot in slots.iter().filter(|s| !s.is_mandatory()) {
        let value = contents
            .get_content(page_id, official_language, &slot.name)
            .await?;
        form.set_initial(&slot.name, value);
    }
    tracing::debug!(page_id, language, "change form seeded from official language");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{FieldType, FormField};
    use crate::domain::placeholders::SlotKind;
    use crate::infra::memory::InMemoryContentStore;

    fn form() -> FormSchema {
        let mut form = FormSchema::default();
        form.insert(FormField::new("title", "Title", FieldType::Text));
        form.insert(FormField::new("body", "Body", FieldType::RichText));
        form
    }

    fn slots() -> Vec<SlotDescriptor> {
        vec![
            SlotDescriptor::new("title", SlotKind::PlainText),
            SlotDescriptor::new("slug", SlotKind::PlainText),
            SlotDescriptor::new("body", SlotKind::RichText),
        ]
    }

    #[tokio::test]
    async fn test_seeds_non_mandatory_slots_only() {
        let store = InMemoryContentStore::new();
        store.create_content_if_changed(1, "en", "title", "Hello").await.unwrap();
        store.create_content_if_changed(1, "en", "body", "Body EN").await.unwrap();

        let mut form = form();
        let seeded = seed_from_official_language(&store, &mut form, 1, "fr", "en", &slots())
            .await
            .unwrap();
        assert!(seeded);
        assert_eq!(form.initial("body"), Some("Body EN"));
        assert_eq!(form.initial("title"), None);
    }

    #[tokio::test]
    async fn test_skips_when_translation_exists() {
        let store = InMemoryContentStore::new();
        store.create_content_if_changed(1, "en", "body", "Body EN").await.unwrap();
        store.create_content_if_changed(1, "fr", "title", "Bonjour").await.unwrap();

        let mut form = form();
        let seeded = seed_from_official_language(&store, &mut form, 1, "fr", "en", &slots())
            .await
            .unwrap();
        assert!(!seeded);
        assert_eq!(form.initial("body"), None);
    }

    #[tokio::test]
    async fn test_official_language_is_never_seeded() {
        let store = InMemoryContentStore::new();
        let mut form = form();
        assert!(!seed_from_official_language(&store, &mut form, 1, "en", "en", &slots())
            .await
            .unwrap());
    }
}
