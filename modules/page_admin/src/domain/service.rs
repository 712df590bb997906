//! Domain service - page admin orchestration

use super::cache::PageCache;
use super::default_content::seed_from_official_language;
use super::events::{EventPublisher, PageEvent};
use super::export::{import_schema, ExportDocument, ExportedPage, PageContents, EXPORT_VERSION};
use super::form::{trim_for_principal, FieldLayout, SlotValues};
use super::language::resolve_language;
use super::placeholders::{is_metadata, PlaceholderRegistry, SlotDescriptor, SlotKind};
use super::repository::{AliasRepository, ContentRepository, PageRepository};
use super::tree;
use super::validation::{clean_submission, validate_against_schema, CleanedPage};
use crate::config::Config;
use crate::contract::{
    AliasId, Capability, ChangeFormContext, Content, ContentFilter, ContentId, FieldError,
    ImportReport, Page, PageAdminError, PageAlias, PageId, PageListing, PageStatus,
    PageSubmission, PageSummary, RequestContext, Translation, TreePosition,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Startup-time state shared by every request
#[derive(Debug, Clone)]
pub struct AdminSettings {
    pub config: Config,
    pub registry: PlaceholderRegistry,
    pub layout: FieldLayout,
}

impl AdminSettings {
    pub fn new(config: Config, registry: PlaceholderRegistry) -> Self {
        let layout = FieldLayout::from_config(&config);
        Self {
            config,
            registry,
            layout,
        }
    }
}

/// Log a storage failure and hide it behind `Internal`
fn internal(error: anyhow::Error) -> PageAdminError {
    tracing::error!(error = %format!("{:#}", error), "page admin storage failure");
    PageAdminError::Internal
}

/// Domain service for page administration
pub struct Service {
    pages: Arc<dyn PageRepository>,
    contents: Arc<dyn ContentRepository>,
    aliases: Arc<dyn AliasRepository>,
    cache: Arc<dyn PageCache>,
    event_publisher: Arc<dyn EventPublisher>,
    settings: Arc<AdminSettings>,
    /// Seed empty translations from the official language
    default_content: bool,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        pages: Arc<dyn PageRepository>,
        contents: Arc<dyn ContentRepository>,
        aliases: Arc<dyn AliasRepository>,
        cache: Arc<dyn PageCache>,
        event_publisher: Arc<dyn EventPublisher>,
        settings: Arc<AdminSettings>,
    ) -> Self {
        Self {
            pages,
            contents,
            aliases,
            cache,
            event_publisher,
            settings,
            default_content: false,
        }
    }

    /// Enable the default-content fallback of the change form
    pub fn with_default_content(mut self) -> Self {
        self.default_content = true;
        self
    }

    pub fn uses_default_content(&self) -> bool {
        self.default_content
    }

    pub fn settings(&self) -> &AdminSettings {
        &self.settings
    }

    fn config(&self) -> &Config {
        &self.settings.config
    }

    fn registry(&self) -> &PlaceholderRegistry {
        &self.settings.registry
    }

    fn require(&self, ctx: &RequestContext, capability: Capability) -> Result<(), PageAdminError> {
        if ctx.principal.has(capability) {
            return Ok(());
        }
        tracing::warn!(
            user = %ctx.principal.username,
            capability = capability.as_str(),
            "permission denied"
        );
        Err(PageAdminError::forbidden(capability.as_str()))
    }

    /// Editing language of a request
    pub fn active_language(&self, ctx: &RequestContext) -> String {
        resolve_language(
            self.config(),
            ctx.query_language.as_deref(),
            ctx.session_language.as_deref(),
        )
    }

    fn parse_object_id(object_id: &str) -> Result<PageId, PageAdminError> {
        object_id
            .trim()
            .parse::<PageId>()
            .map_err(|_| PageAdminError::page_not_found(object_id))
    }

    async fn load_page(&self, page_id: PageId) -> Result<Page, PageAdminError> {
        self.pages
            .get(page_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PageAdminError::page_not_found(page_id))
    }

    async fn publish(&self, event: PageEvent) {
        if let Err(e) = self.event_publisher.publish(event).await {
            tracing::warn!(error = %e, "failed to publish page event");
        }
    }

    // ===== Templates and content reads =====

    /// Page template, else the nearest ancestor template, else the default
    pub async fn resolve_template(&self, page: &Page) -> Result<String, PageAdminError> {
        if let Some(template) = &page.template {
            return Ok(template.clone());
        }
        let ancestor_ids = self.pages.ancestors(page.id).await.map_err(internal)?;
        let ancestors: HashMap<PageId, Page> = self
            .pages
            .find_by_ids(&ancestor_ids)
            .await
            .map_err(internal)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let inherited = ancestor_ids
            .iter()
            .filter_map(|id| ancestors.get(id))
            .find_map(|ancestor| ancestor.template.clone());
        Ok(inherited.unwrap_or_else(|| self.registry().default_template().to_string()))
    }

    /// A configured `template` request parameter previews that template
    fn form_template(&self, ctx: &RequestContext, resolved: String) -> String {
        match ctx.template.as_deref().map(str::trim) {
            Some(requested) if self.config().is_template(requested) => requested.to_string(),
            _ => resolved,
        }
    }

    /// Latest value of a slot, through the page cache
    async fn slot_value(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
    ) -> Result<Option<String>, PageAdminError> {
        if let Some(cached) = self.cache.get(page_id, language, slot) {
            return Ok(cached);
        }
        let value = self
            .contents
            .get_content(page_id, language, slot)
            .await
            .map_err(internal)?;
        self.cache.put(page_id, language, slot, value.clone());
        Ok(value)
    }

    async fn slot_values(
        &self,
        page_id: PageId,
        language: &str,
        slots: &[SlotDescriptor],
    ) -> Result<SlotValues, PageAdminError> {
        let official = self.config().official_language.as_str();
        let mut values = SlotValues::new();
        for slot in slots.iter().chain(self.registry().metadata_slots()) {
            let storage = slot.storage_language(language, official);
            values.insert(
                slot.name.clone(),
                self.slot_value(page_id, storage, &slot.name).await?,
            );
        }
        Ok(values)
    }

    /// Other configured languages the page has a title in
    async fn page_traduction_languages(
        &self,
        page_id: PageId,
        language: &str,
    ) -> Result<Vec<String>, PageAdminError> {
        let with_title = self
            .contents
            .languages_with_slot(page_id, "title")
            .await
            .map_err(internal)?;
        Ok(self
            .config()
            .languages
            .iter()
            .filter(|l| l.code != language && with_title.contains(&l.code))
            .map(|l| l.code.clone())
            .collect())
    }

    async fn summarize(&self, page: Page, language: &str) -> Result<PageSummary, PageAdminError> {
        let title = self.slot_value(page.id, language, "title").await?;
        let slug = self.slot_value(page.id, language, "slug").await?;
        let children_count = self.pages.children_of(page.id).await.map_err(internal)?.len();
        let with_title = self
            .contents
            .languages_with_slot(page.id, "title")
            .await
            .map_err(internal)?;
        let languages = self
            .config()
            .language_codes()
            .into_iter()
            .filter(|code| with_title.contains(code))
            .collect();
        Ok(PageSummary {
            page,
            title,
            slug,
            children_count,
            languages,
        })
    }

    // ===== Views =====

    async fn build_context(
        &self,
        ctx: &RequestContext,
        page: Option<Page>,
    ) -> Result<ChangeFormContext, PageAdminError> {
        let language = self.active_language(ctx);
        let resolved = match &page {
            Some(page) => self.resolve_template(page).await?,
            None => self.registry().default_template().to_string(),
        };
        let template = self.form_template(ctx, resolved);
        let slots = self.registry().slots_for(&template);

        let values = match &page {
            Some(page) => self.slot_values(page.id, &language, slots).await?,
            None => SlotValues::new(),
        };
        let mut form = self.settings.layout.build_form(
            page.as_ref(),
            &language,
            &template,
            slots,
            self.registry().metadata_slots(),
            &values,
        );
        trim_for_principal(&mut form, &ctx.principal);

        let mut traduction_languages = Vec::new();
        if let Some(page) = &page {
            if self.default_content {
                seed_from_official_language(
                    self.contents.as_ref(),
                    &mut form,
                    page.id,
                    &language,
                    &self.config().official_language,
                    slots,
                )
                .await
                .map_err(internal)?;
            }
            traduction_languages = self.page_traduction_languages(page.id, &language).await?;
        }

        Ok(ChangeFormContext {
            page_languages: self
                .config()
                .languages
                .iter()
                .map(|l| (l.code.clone(), l.name.clone()))
                .collect(),
            placeholders: slots.iter().map(|s| s.name.clone()).collect(),
            language,
            template,
            traduction_languages,
            page,
            form,
        })
    }

    /// Form and context of the add view
    pub async fn add_view(&self, ctx: &RequestContext) -> Result<ChangeFormContext, PageAdminError> {
        self.require(ctx, Capability::AddPage)?;
        self.build_context(ctx, None).await
    }

    /// Form and context of the change view
    pub async fn change_view(
        &self,
        ctx: &RequestContext,
        object_id: &str,
    ) -> Result<ChangeFormContext, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        let page_id = Self::parse_object_id(object_id)?;
        let page = self.load_page(page_id).await?;
        self.build_context(ctx, Some(page)).await
    }

    /// Root pages, or every page with a content body matching `query`
    pub async fn list_pages(
        &self,
        ctx: &RequestContext,
        query: &str,
    ) -> Result<PageListing, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        let language = self.active_language(ctx);
        let query = query.trim();

        let mut pages = if query.is_empty() {
            self.pages.root_pages().await.map_err(internal)?
        } else {
            let ids = self.contents.search(query).await.map_err(internal)?;
            let mut found = self.pages.find_by_ids(&ids).await.map_err(internal)?;
            found.sort_by_key(|p| p.id);
            found
        };
        let config = self.config();
        if config.hide_sites {
            pages.retain(|p| p.sites.contains(&config.site_id));
        }

        let mut summaries = Vec::with_capacity(pages.len());
        for page in pages {
            summaries.push(self.summarize(page, &language).await?);
        }
        Ok(PageListing {
            language,
            query: query.to_string(),
            can_publish: ctx.principal.has(Capability::Publish),
            pages: summaries,
        })
    }

    /// Children of a page, as shown when a tree node is expanded
    pub async fn sub_menu(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<PageSummary>, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        self.load_page(page_id).await?;
        let language = self.active_language(ctx);
        let children = self.pages.children_of(page_id).await.map_err(internal)?;
        let mut summaries = Vec::with_capacity(children.len());
        for child in children {
            summaries.push(self.summarize(child, &language).await?);
        }
        Ok(summaries)
    }

    // ===== Save flow =====

    pub async fn add_page(
        &self,
        ctx: &RequestContext,
        submission: &PageSubmission,
    ) -> Result<Page, PageAdminError> {
        self.require(ctx, Capability::AddPage)?;
        self.save(ctx, None, submission).await
    }

    pub async fn change_page(
        &self,
        ctx: &RequestContext,
        object_id: &str,
        submission: &PageSubmission,
    ) -> Result<Page, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        let page_id = Self::parse_object_id(object_id)?;
        let page = self.load_page(page_id).await?;
        self.save(ctx, Some(page), submission).await
    }

    /// Checks of a cleaned submission that need storage
    async fn check_references(
        &self,
        existing: Option<&Page>,
        cleaned: &CleanedPage,
    ) -> Result<(), PageAdminError> {
        let mut errors = Vec::new();

        let mut target_page = None;
        if let Some((target_id, position)) = cleaned.target {
            if let Some(target) = self.pages.get(target_id).await.map_err(internal)? {
                if let Some(page) = existing {
                    let ancestors = self.pages.ancestors(target_id).await.map_err(internal)?;
                    if let Err(e) = tree::check_move(page.id, target_id, &ancestors) {
                        errors.push(FieldError::new("target", e.to_string()));
                    }
                }
                target_page = Some((target, position));
            }
        }

        if let Some(Some(redirect_to)) = cleaned.redirect_to {
            let exists = self.pages.get(redirect_to).await.map_err(internal)?.is_some();
            if !exists || existing.is_some_and(|p| p.id == redirect_to) {
                errors.push(FieldError::new("redirect_to", "Select a valid page."));
            }
        }

        if self.config().unique_slug_required {
            let parent_id = match &target_page {
                Some((target, position)) => position.new_parent(target),
                None => existing.and_then(|p| p.parent_id),
            };
            let siblings = match parent_id {
                Some(parent_id) => self.pages.children_of(parent_id).await,
                None => self.pages.root_pages().await,
            }
            .map_err(internal)?;
            for sibling in siblings {
                if existing.is_some_and(|p| p.id == sibling.id) {
                    continue;
                }
                let slug = self
                    .slot_value(sibling.id, &cleaned.language, "slug")
                    .await?;
                if slug.as_deref() == Some(cleaned.slug.as_str()) {
                    errors.push(FieldError::new(
                        "slug",
                        "Another page with this slug already exists at this level.",
                    ));
                    break;
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PageAdminError::InvalidForm { errors })
        }
    }

    /// Move a saved page unless the target disappeared meanwhile
    async fn move_if_target_exists(
        &self,
        page: Page,
        target_id: PageId,
        position: TreePosition,
    ) -> Result<Page, PageAdminError> {
        if self.pages.get(target_id).await.map_err(internal)?.is_none() {
            tracing::debug!(page_id = page.id, target_id, "move target no longer exists, move skipped");
            return Ok(page);
        }
        self.cache.invalidate(target_id);
        let moved = self
            .pages
            .move_to(page.id, target_id, position)
            .await
            .map_err(internal)?;
        self.publish(PageEvent::moved(moved.id, target_id, position)).await;
        Ok(moved)
    }

    async fn save(
        &self,
        ctx: &RequestContext,
        existing: Option<Page>,
        submission: &PageSubmission,
    ) -> Result<Page, PageAdminError> {
        let config = self.config();
        let fallback_language = self.active_language(ctx);
        let cleaned = clean_submission(
            config,
            &self.settings.layout,
            &ctx.principal,
            &fallback_language,
            submission,
        )
        .map_err(|errors| PageAdminError::InvalidForm { errors })?;
        self.check_references(existing.as_ref(), &cleaned).await?;

        // Base attributes first so a new page gets its id
        let is_update = existing.is_some();
        let mut page = existing.unwrap_or_else(|| Page::new(Some(ctx.principal.username.clone())));
        cleaned.apply_to(&mut page);
        if !is_update && (config.hide_sites || (config.use_site_id && page.sites.is_empty())) {
            page.sites = vec![config.site_id];
        }
        let page = if is_update {
            self.pages.update(&page).await
        } else {
            self.pages.insert(&page).await
        }
        .map_err(internal)?;

        let page = match cleaned.target {
            Some((target_id, position)) => {
                self.move_if_target_exists(page, target_id, position).await?
            }
            None => page,
        };

        let template = self.resolve_template(&page).await?;
        let language = cleaned.language.as_str();
        let official = config.official_language.as_str();
        for slot in self.registry().slots_for(&template) {
            let extra = slot.extract_auxiliary(submission);
            let value = match slot.name.as_str() {
                "title" => cleaned.title.as_str(),
                "slug" => cleaned.slug.as_str(),
                _ if submission.contains(&slot.name) || extra.is_some() => {
                    submission.get(&slot.name).unwrap_or("")
                }
                _ => continue,
            };
            slot.persist(
                self.contents.as_ref(),
                page.id,
                slot.storage_language(language, official),
                value,
                is_update,
                extra.as_ref(),
            )
            .await
            .map_err(internal)?;
        }

        for slot in self.registry().metadata_slots() {
            let value = submission.get(&slot.name).map(str::trim).unwrap_or("");
            slot.persist(self.contents.as_ref(), page.id, language, value, is_update, None)
                .await
                .map_err(internal)?;
        }

        self.cache.invalidate(page.id);
        tracing::info!(
            page_id = page.id,
            language,
            template = %template,
            created = !is_update,
            user = %ctx.principal.username,
            "page saved"
        );
        self.publish(PageEvent::saved(page.id, language, !is_update, &ctx.principal.username))
            .await;

        self.load_page(page.id).await
    }

    // ===== Tree and status =====

    pub async fn move_page(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        target_id: PageId,
        position: TreePosition,
    ) -> Result<Page, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        let page = self.load_page(page_id).await?;
        self.load_page(target_id).await?;
        let ancestors = self.pages.ancestors(target_id).await.map_err(internal)?;
        tree::check_move(page.id, target_id, &ancestors).map_err(|e| {
            PageAdminError::Validation {
                message: e.to_string(),
            }
        })?;

        self.cache.invalidate(target_id);
        let moved = self
            .pages
            .move_to(page_id, target_id, position)
            .await
            .map_err(internal)?;
        self.cache.invalidate(page_id);
        tracing::info!(page_id, target_id, position = position.as_str(), "page moved");
        self.publish(PageEvent::moved(page_id, target_id, position)).await;
        Ok(moved)
    }

    pub async fn change_status(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        status: PageStatus,
    ) -> Result<Page, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        self.require(ctx, Capability::Publish)?;
        let mut page = self.load_page(page_id).await?;
        page.status = status;
        page.last_modification_date = chrono::Utc::now();
        let page = self.pages.update(&page).await.map_err(internal)?;
        self.cache.invalidate(page_id);
        tracing::info!(page_id, status = status.as_str(), "page status changed");
        self.publish(PageEvent::status_changed(page_id, status, &ctx.principal.username))
            .await;
        Ok(page)
    }

    /// Delete a page, its subtree and their content and aliases
    pub async fn delete_page(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<PageId>, PageAdminError> {
        self.require(ctx, Capability::DeletePage)?;
        self.load_page(page_id).await?;
        let mut ids = vec![page_id];
        ids.extend(
            self.pages
                .descendants(page_id)
                .await
                .map_err(internal)?
                .into_iter()
                .map(|p| p.id),
        );

        let contents = self.contents.delete_for_pages(&ids).await.map_err(internal)?;
        let aliases = self.aliases.delete_for_pages(&ids).await.map_err(internal)?;
        let deleted = self.pages.delete_subtree(page_id).await.map_err(internal)?;
        for id in &deleted {
            self.cache.invalidate(*id);
        }
        tracing::info!(
            page_id,
            pages = deleted.len(),
            contents,
            aliases,
            user = %ctx.principal.username,
            "page subtree deleted"
        );
        self.publish(PageEvent::deleted(deleted.clone(), &ctx.principal.username))
            .await;
        Ok(deleted)
    }

    // ===== Content =====

    pub async fn traduction_languages(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<String>, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        self.load_page(page_id).await?;
        let language = self.active_language(ctx);
        self.page_traduction_languages(page_id, &language).await
    }

    /// Slot values side by side in the active and another language
    pub async fn traduction(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        target_language: &str,
    ) -> Result<Translation, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        if !self.config().is_language(target_language) {
            return Err(PageAdminError::Validation {
                message: format!("'{}' is not an available language", target_language),
            });
        }
        let page = self.load_page(page_id).await?;
        let language = self.active_language(ctx);
        let template = self.resolve_template(&page).await?;
        let official = self.config().official_language.as_str();

        let mut slots = Vec::new();
        for slot in self.registry().slots_for(&template) {
            let current = self
                .slot_value(page_id, slot.storage_language(&language, official), &slot.name)
                .await?;
            let translated = self
                .slot_value(page_id, slot.storage_language(target_language, official), &slot.name)
                .await?;
            slots.push((slot.name.clone(), current, translated));
        }
        Ok(Translation {
            page_id,
            language,
            target_language: target_language.to_string(),
            slots,
        })
    }

    pub async fn get_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        content_id: ContentId,
    ) -> Result<String, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        self.contents
            .get_by_id(content_id)
            .await
            .map_err(internal)?
            .filter(|c| c.page_id == page_id)
            .map(|c| c.body)
            .ok_or_else(|| PageAdminError::NotFound {
                resource: "content".to_string(),
                id: content_id.to_string(),
            })
    }

    /// Save a single slot outside the page form
    pub async fn modify_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        slot_name: &str,
        language: &str,
        body: &str,
    ) -> Result<Content, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        if !self.config().is_language(language) {
            return Err(PageAdminError::Validation {
                message: format!("'{}' is not an available language", language),
            });
        }
        let page = self.load_page(page_id).await?;
        let template = self.resolve_template(&page).await?;
        let slot = self
            .registry()
            .slots_for(&template)
            .iter()
            .chain(self.registry().metadata_slots())
            .find(|s| s.name == slot_name)
            .ok_or_else(|| PageAdminError::Validation {
                message: format!("'{}' is not a placeholder of template '{}'", slot_name, template),
            })?;
        if slot.is_mandatory() && body.trim().is_empty() {
            return Err(PageAdminError::invalid_field(slot_name, "This field is required."));
        }

        let storage = slot.storage_language(language, &self.config().official_language);
        let content = if slot.kind == SlotKind::Metadata {
            self.contents
                .set_or_create_content(page_id, storage, slot_name, body)
                .await
        } else {
            self.contents
                .create_content_if_changed(page_id, storage, slot_name, body)
                .await
        }
        .map_err(internal)?;

        self.cache.invalidate(page_id);
        tracing::info!(page_id, language = storage, slot = slot_name, "content modified");
        self.publish(PageEvent::content_modified(page_id, storage, Some(slot_name)))
            .await;
        Ok(content)
    }

    /// Delete every content record of a page in one language
    pub async fn delete_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        language: &str,
    ) -> Result<u64, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        self.load_page(page_id).await?;
        let deleted = self
            .contents
            .delete_for_page_language(page_id, language)
            .await
            .map_err(internal)?;
        self.cache.invalidate(page_id);
        tracing::info!(page_id, language, deleted, "page translation deleted");
        self.publish(PageEvent::content_modified(page_id, language, None)).await;
        Ok(deleted)
    }

    pub async fn list_contents(
        &self,
        ctx: &RequestContext,
        filter: &ContentFilter,
    ) -> Result<Vec<Content>, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        self.contents.filter(filter).await.map_err(internal)
    }

    // ===== Aliases =====

    pub async fn list_aliases(
        &self,
        ctx: &RequestContext,
        page_id: Option<PageId>,
    ) -> Result<Vec<PageAlias>, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        self.aliases.list(page_id).await.map_err(internal)
    }

    fn clean_alias_url(url: &str) -> Result<&str, PageAdminError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PageAdminError::invalid_field("url", "This field is required."));
        }
        Ok(url)
    }

    async fn ensure_url_free(&self, url: &str, except: Option<AliasId>) -> Result<(), PageAdminError> {
        match self.aliases.find_by_url(url).await.map_err(internal)? {
            Some(alias) if Some(alias.id) != except => Err(PageAdminError::Conflict {
                reason: format!("alias url '{}' is already used by page {}", url, alias.page_id),
            }),
            _ => Ok(()),
        }
    }

    pub async fn create_alias(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        url: &str,
    ) -> Result<PageAlias, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        let url = Self::clean_alias_url(url)?;
        self.load_page(page_id).await?;
        self.ensure_url_free(url, None).await?;
        let alias = self.aliases.create(page_id, url).await.map_err(internal)?;
        tracing::info!(page_id, alias_id = alias.id, url, "page alias created");
        Ok(alias)
    }

    pub async fn update_alias(
        &self,
        ctx: &RequestContext,
        alias_id: AliasId,
        url: &str,
    ) -> Result<PageAlias, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        let url = Self::clean_alias_url(url)?;
        self.find_alias(alias_id).await?;
        self.ensure_url_free(url, Some(alias_id)).await?;
        self.aliases.update_url(alias_id, url).await.map_err(internal)
    }

    pub async fn delete_alias(
        &self,
        ctx: &RequestContext,
        alias_id: AliasId,
    ) -> Result<(), PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        self.find_alias(alias_id).await?;
        self.aliases.delete(alias_id).await.map_err(internal)?;
        tracing::info!(alias_id, "page alias deleted");
        Ok(())
    }

    async fn find_alias(&self, alias_id: AliasId) -> Result<PageAlias, PageAdminError> {
        self.aliases
            .get(alias_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PageAdminError::NotFound {
                resource: "alias".to_string(),
                id: alias_id.to_string(),
            })
    }

    // ===== Import / export =====

    /// Export pages with their subtrees, parents before children
    pub async fn export_pages(
        &self,
        ctx: &RequestContext,
        page_ids: &[PageId],
    ) -> Result<serde_json::Value, PageAdminError> {
        self.require(ctx, Capability::ChangePage)?;
        let mut seen = HashSet::new();
        let mut pages = Vec::new();
        for page_id in page_ids {
            let root = self.load_page(*page_id).await?;
            let descendants = self.pages.descendants(root.id).await.map_err(internal)?;
            for page in std::iter::once(root).chain(descendants) {
                if !seen.insert(page.id) {
                    continue;
                }
                let records = self
                    .contents
                    .filter(&ContentFilter {
                        page_id: Some(page.id),
                        ..ContentFilter::default()
                    })
                    .await
                    .map_err(internal)?;
                let mut contents = PageContents::new();
                for record in records {
                    contents
                        .entry(record.language)
                        .or_default()
                        .insert(record.slot, record.body);
                }
                let aliases = self.aliases.list(Some(page.id)).await.map_err(internal)?;
                pages.push(ExportedPage::from_page(&page, contents, &aliases));
            }
        }

        let document = ExportDocument {
            version: EXPORT_VERSION,
            official_language: self.config().official_language.clone(),
            pages,
        };
        tracing::info!(pages = document.pages.len(), "pages exported");
        serde_json::to_value(&document).map_err(|e| internal(e.into()))
    }

    /// Reject documents the admin cannot represent, before any write
    fn check_import(&self, document: &ExportDocument) -> Result<(), PageAdminError> {
        let config = self.config();
        let mut problems = Vec::new();
        let mut ids = HashSet::new();
        for page in &document.pages {
            if !ids.insert(page.id) {
                problems.push(format!("page {} is listed twice", page.id));
            }
            if let Some(template) = &page.template {
                if !config.is_template(template) {
                    problems.push(format!("page {}: unknown template '{}'", page.id, template));
                }
            }
            for language in page.contents.keys() {
                if !config.is_language(language) {
                    problems.push(format!("page {}: unknown language '{}'", page.id, language));
                }
            }
            let titled = page.contents.keys().any(|language| {
                page.content(language, "title").is_some_and(|t| !t.trim().is_empty())
                    && page.content(language, "slug").is_some_and(|s| !s.trim().is_empty())
            });
            if !titled {
                problems.push(format!("page {} has no title and slug", page.id));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(PageAdminError::Validation {
                message: problems.join("; "),
            })
        }
    }

    pub async fn import_pages(
        &self,
        ctx: &RequestContext,
        document: &serde_json::Value,
    ) -> Result<ImportReport, PageAdminError> {
        self.require(ctx, Capability::AddPage)?;
        validate_against_schema(document, &import_schema()).map_err(|errors| {
            PageAdminError::Validation {
                message: errors.join("; "),
            }
        })?;
        let document: ExportDocument = serde_json::from_value(document.clone()).map_err(|e| {
            PageAdminError::Validation {
                message: format!("Invalid import document: {}", e),
            }
        })?;
        self.check_import(&document)?;

        let config = self.config();
        let can_publish = ctx.principal.has(Capability::Publish);
        let mut mapping: HashMap<PageId, PageId> = HashMap::new();
        let mut report = ImportReport::default();

        for exported in &document.pages {
            let mut page = Page::new(
                exported
                    .author
                    .clone()
                    .or_else(|| Some(ctx.principal.username.clone())),
            );
            if can_publish {
                page.status = PageStatus::parse(&exported.status).unwrap_or_default();
            }
            page.template = exported.template.clone();
            page.tags = exported.tags.clone();
            page.sites = exported
                .sites
                .iter()
                .copied()
                .filter(|site| config.is_site(*site))
                .collect();
            if page.sites.is_empty() && (config.use_site_id || config.hide_sites) {
                page.sites = vec![config.site_id];
            }
            page.delegate_to = exported
                .delegate_to
                .clone()
                .filter(|name| config.delegation_registry.contains(name));
            page.redirect_to_url = exported.redirect_to_url.clone();
            page.publication_date = exported.publication_date;
            page.publication_end_date = exported.publication_end_date;
            page.freeze_date = exported.freeze_date;

            let mut stored = self.pages.insert(&page).await.map_err(internal)?;
            if let Some(parent_id) = exported.parent_id.and_then(|old| mapping.get(&old)) {
                stored = self
                    .pages
                    .move_to(stored.id, *parent_id, TreePosition::LastChild)
                    .await
                    .map_err(internal)?;
            }
            mapping.insert(exported.id, stored.id);

            for (language, slots) in &exported.contents {
                for (slot, body) in slots {
                    if is_metadata(slot) {
                        self.contents
                            .set_or_create_content(stored.id, language, slot, body)
                            .await
                    } else {
                        self.contents
                            .create_content_if_changed(stored.id, language, slot, body)
                            .await
                    }
                    .map_err(internal)?;
                }
            }

            for url in &exported.aliases {
                if self.aliases.find_by_url(url).await.map_err(internal)?.is_some() {
                    report.skipped_aliases.push(url.clone());
                    continue;
                }
                self.aliases.create(stored.id, url).await.map_err(internal)?;
            }

            self.publish(PageEvent::saved(
                stored.id,
                &document.official_language,
                true,
                &ctx.principal.username,
            ))
            .await;
            report.created.push(stored.id);
        }

        tracing::info!(
            created = report.created.len(),
            skipped_aliases = report.skipped_aliases.len(),
            user = %ctx.principal.username,
            "pages imported"
        );
        Ok(report)
    }
}
