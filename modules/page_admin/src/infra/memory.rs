//! In-memory repositories
//!
//! Same semantics as the SeaORM repositories, used by tests and by
//! deployments without a database.

use crate::contract::{
    AliasId, Content, ContentFilter, ContentId, Page, PageAlias, PageId, TreePosition,
};
use crate::domain::repository::{AliasRepository, ContentRepository, PageRepository};
use crate::domain::tree::{self, TreeError};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

// ===== Page tree =====

#[derive(Default)]
struct TreeState {
    pages: BTreeMap<PageId, Page>,
    next_id: PageId,
}

impl TreeState {
    /// Sibling ids under a parent, in position order
    fn siblings(&self, parent_id: Option<PageId>) -> Vec<PageId> {
        let mut siblings: Vec<&Page> = self
            .pages
            .values()
            .filter(|p| p.parent_id == parent_id)
            .collect();
        siblings.sort_by_key(|p| (p.position, p.id));
        siblings.into_iter().map(|p| p.id).collect()
    }

    fn parent_of(&self, page_id: PageId) -> Option<Option<PageId>> {
        self.pages.get(&page_id).map(|p| p.parent_id)
    }

    fn ancestors(&self, page_id: PageId) -> Result<Vec<PageId>, TreeError> {
        tree::ancestor_path(page_id, |id| self.parent_of(id))
    }

    fn descendants(&self, page_id: PageId) -> Vec<PageId> {
        let mut out = Vec::new();
        for child in self.siblings(Some(page_id)) {
            out.push(child);
            out.extend(self.descendants(child));
        }
        out
    }

    fn renumber(&mut self, ordered: &[(PageId, i32)]) {
        for (id, position) in ordered {
            if let Some(page) = self.pages.get_mut(id) {
                page.position = *position;
            }
        }
    }
}

/// Page tree kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryPageTree {
    state: Arc<RwLock<TreeState>>,
}

impl InMemoryPageTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PageRepository for InMemoryPageTree {
    async fn get(&self, id: PageId) -> Result<Option<Page>> {
        Ok(self.state.read().pages.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[PageId]) -> Result<Vec<Page>> {
        let state = self.state.read();
        Ok(ids.iter().filter_map(|id| state.pages.get(id).cloned()).collect())
    }

    async fn insert(&self, page: &Page) -> Result<Page> {
        let mut state = self.state.write();
        state.next_id += 1;
        let mut stored = page.clone();
        stored.id = state.next_id;
        stored.parent_id = None;
        stored.level = 0;
        stored.position = state.siblings(None).len() as i32;
        state.pages.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, page: &Page) -> Result<Page> {
        let mut state = self.state.write();
        let Some(stored) = state.pages.get_mut(&page.id) else {
            bail!(TreeError::PageNotFound(page.id));
        };
        let (parent_id, position, level) = (stored.parent_id, stored.position, stored.level);
        *stored = page.clone();
        stored.parent_id = parent_id;
        stored.position = position;
        stored.level = level;
        Ok(stored.clone())
    }

    async fn move_to(
        &self,
        page_id: PageId,
        target_id: PageId,
        position: TreePosition,
    ) -> Result<Page> {
        let mut state = self.state.write();
        let page = state
            .pages
            .get(&page_id)
            .cloned()
            .ok_or(TreeError::PageNotFound(page_id))?;
        let target = state
            .pages
            .get(&target_id)
            .cloned()
            .ok_or(TreeError::PageNotFound(target_id))?;
        tree::check_move(page_id, target_id, &state.ancestors(target_id)?)?;

        let destination = state.siblings(position.new_parent(&target));
        let origin = state.siblings(page.parent_id);
        let plan = tree::plan_move(&page, &target, position, &destination, &origin);

        for id in state.descendants(page_id) {
            if let Some(descendant) = state.pages.get_mut(&id) {
                descendant.level += plan.level_delta;
            }
        }
        if let Some(moved) = state.pages.get_mut(&page_id) {
            moved.parent_id = plan.parent_id;
            moved.level = plan.level;
        }
        state.renumber(&plan.old_siblings);
        state.renumber(&plan.new_siblings);

        state
            .pages
            .get(&page_id)
            .cloned()
            .ok_or_else(|| TreeError::PageNotFound(page_id).into())
    }

    async fn root_pages(&self) -> Result<Vec<Page>> {
        let state = self.state.read();
        Ok(state
            .siblings(None)
            .iter()
            .filter_map(|id| state.pages.get(id).cloned())
            .collect())
    }

    async fn children_of(&self, page_id: PageId) -> Result<Vec<Page>> {
        let state = self.state.read();
        Ok(state
            .siblings(Some(page_id))
            .iter()
            .filter_map(|id| state.pages.get(id).cloned())
            .collect())
    }

    async fn ancestors(&self, page_id: PageId) -> Result<Vec<PageId>> {
        Ok(self.state.read().ancestors(page_id)?)
    }

    async fn descendants(&self, page_id: PageId) -> Result<Vec<Page>> {
        let state = self.state.read();
        Ok(state
            .descendants(page_id)
            .iter()
            .filter_map(|id| state.pages.get(id).cloned())
            .collect())
    }

    async fn delete_subtree(&self, page_id: PageId) -> Result<Vec<PageId>> {
        let mut state = self.state.write();
        let Some(parent_id) = state.parent_of(page_id) else {
            return Ok(Vec::new());
        };
        let mut deleted = vec![page_id];
        deleted.extend(state.descendants(page_id));
        for id in &deleted {
            state.pages.remove(id);
        }
        let remaining: Vec<(PageId, i32)> = state
            .siblings(parent_id)
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i as i32))
            .collect();
        state.renumber(&remaining);
        Ok(deleted)
    }
}

// ===== Content =====

#[derive(Default)]
struct ContentState {
    records: Vec<Content>,
    next_id: ContentId,
}

impl ContentState {
    fn latest(&self, page_id: PageId, language: &str, slot: &str) -> Option<&Content> {
        self.records
            .iter()
            .filter(|c| c.page_id == page_id && c.language == language && c.slot == slot)
            .max_by_key(|c| c.id)
    }

    fn push(&mut self, page_id: PageId, language: &str, slot: &str, body: &str, version: i32) -> Content {
        self.next_id += 1;
        let content = Content {
            id: self.next_id,
            page_id,
            language: language.to_string(),
            slot: slot.to_string(),
            body: body.to_string(),
            version,
            creation_date: Utc::now(),
        };
        self.records.push(content.clone());
        content
    }
}

/// Versioned content kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    state: Arc<RwLock<ContentState>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records, every version included
    pub fn record_count(&self) -> usize {
        self.state.read().records.len()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentStore {
    async fn get_content(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
    ) -> Result<Option<String>> {
        Ok(self
            .state
            .read()
            .latest(page_id, language, slot)
            .map(|c| c.body.clone()))
    }

    async fn get_by_id(&self, id: ContentId) -> Result<Option<Content>> {
        Ok(self.state.read().records.iter().find(|c| c.id == id).cloned())
    }

    async fn get_version(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        version: i32,
    ) -> Result<Option<Content>> {
        Ok(self
            .state
            .read()
            .records
            .iter()
            .find(|c| {
                c.page_id == page_id
                    && c.language == language
                    && c.slot == slot
                    && c.version == version
            })
            .cloned())
    }

    async fn list_versions(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
    ) -> Result<Vec<Content>> {
        let mut versions: Vec<Content> = self
            .state
            .read()
            .records
            .iter()
            .filter(|c| c.page_id == page_id && c.language == language && c.slot == slot)
            .cloned()
            .collect();
        versions.sort_by_key(|c| c.version);
        Ok(versions)
    }

    async fn set_or_create_content(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        body: &str,
    ) -> Result<Content> {
        let mut state = self.state.write();
        if let Some(id) = state.latest(page_id, language, slot).map(|c| c.id) {
            if let Some(record) = state.records.iter_mut().find(|c| c.id == id) {
                record.body = body.to_string();
                record.creation_date = Utc::now();
                return Ok(record.clone());
            }
        }
        Ok(state.push(page_id, language, slot, body, 1))
    }

    async fn create_content_if_changed(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        body: &str,
    ) -> Result<Content> {
        let mut state = self.state.write();
        let version = match state.latest(page_id, language, slot) {
            Some(latest) if latest.body == body => return Ok(latest.clone()),
            Some(latest) => latest.version + 1,
            None => 1,
        };
        Ok(state.push(page_id, language, slot, body, version))
    }

    async fn search(&self, needle: &str) -> Result<Vec<PageId>> {
        let needle = needle.to_lowercase();
        let mut ids: Vec<PageId> = self
            .state
            .read()
            .records
            .iter()
            .filter(|c| c.body.to_lowercase().contains(&needle))
            .map(|c| c.page_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn filter(&self, filter: &ContentFilter) -> Result<Vec<Content>> {
        let needle = filter.body_contains.as_ref().map(|n| n.to_lowercase());
        Ok(self
            .state
            .read()
            .records
            .iter()
            .filter(|c| filter.page_id.map_or(true, |id| c.page_id == id))
            .filter(|c| filter.language.as_ref().map_or(true, |l| &c.language == l))
            .filter(|c| filter.slot.as_ref().map_or(true, |s| &c.slot == s))
            .filter(|c| {
                needle
                    .as_ref()
                    .map_or(true, |n| c.body.to_lowercase().contains(n.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn has_content_in_language(&self, page_id: PageId, language: &str) -> Result<bool> {
        Ok(self
            .state
            .read()
            .records
            .iter()
            .any(|c| c.page_id == page_id && c.language == language))
    }

    async fn languages_with_slot(&self, page_id: PageId, slot: &str) -> Result<Vec<String>> {
        let state = self.state.read();
        let mut languages: Vec<String> = Vec::new();
        for record in state.records.iter().filter(|c| c.page_id == page_id && c.slot == slot) {
            if languages.contains(&record.language) {
                continue;
            }
            let filled = state
                .latest(page_id, &record.language, slot)
                .is_some_and(|latest| !latest.body.is_empty());
            if filled {
                languages.push(record.language.clone());
            }
        }
        Ok(languages)
    }

    async fn delete_for_page_language(&self, page_id: PageId, language: &str) -> Result<u64> {
        let mut state = self.state.write();
        let before = state.records.len();
        state
            .records
            .retain(|c| !(c.page_id == page_id && c.language == language));
        Ok((before - state.records.len()) as u64)
    }

    async fn delete_for_pages(&self, page_ids: &[PageId]) -> Result<u64> {
        let mut state = self.state.write();
        let before = state.records.len();
        state.records.retain(|c| !page_ids.contains(&c.page_id));
        Ok((before - state.records.len()) as u64)
    }
}

// ===== Aliases =====

#[derive(Default)]
struct AliasState {
    aliases: Vec<PageAlias>,
    next_id: AliasId,
}

/// Page aliases kept in process memory, urls are unique
#[derive(Clone, Default)]
pub struct InMemoryAliasStore {
    state: Arc<RwLock<AliasState>>,
}

impl InMemoryAliasStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AliasRepository for InMemoryAliasStore {
    async fn list(&self, page_id: Option<PageId>) -> Result<Vec<PageAlias>> {
        Ok(self
            .state
            .read()
            .aliases
            .iter()
            .filter(|a| page_id.map_or(true, |id| a.page_id == id))
            .cloned()
            .collect())
    }

    async fn get(&self, id: AliasId) -> Result<Option<PageAlias>> {
        Ok(self.state.read().aliases.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<PageAlias>> {
        Ok(self.state.read().aliases.iter().find(|a| a.url == url).cloned())
    }

    async fn create(&self, page_id: PageId, url: &str) -> Result<PageAlias> {
        let mut state = self.state.write();
        if state.aliases.iter().any(|a| a.url == url) {
            bail!("alias url '{}' already exists", url);
        }
        state.next_id += 1;
        let alias = PageAlias {
            id: state.next_id,
            page_id,
            url: url.to_string(),
        };
        state.aliases.push(alias.clone());
        Ok(alias)
    }

    async fn update_url(&self, id: AliasId, url: &str) -> Result<PageAlias> {
        let mut state = self.state.write();
        if state.aliases.iter().any(|a| a.url == url && a.id != id) {
            bail!("alias url '{}' already exists", url);
        }
        let Some(alias) = state.aliases.iter_mut().find(|a| a.id == id) else {
            bail!("alias {} not found", id);
        };
        alias.url = url.to_string();
        Ok(alias.clone())
    }

    async fn delete(&self, id: AliasId) -> Result<()> {
        self.state.write().aliases.retain(|a| a.id != id);
        Ok(())
    }

    async fn delete_for_pages(&self, page_ids: &[PageId]) -> Result<u64> {
        let mut state = self.state.write();
        let before = state.aliases.len();
        state.aliases.retain(|a| !page_ids.contains(&a.page_id));
        Ok((before - state.aliases.len()) as u64)
    }
}
