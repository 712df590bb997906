//! SeaORM repository implementations

use super::entity::{alias, content, page};
use crate::contract::{
    AliasId, Content, ContentFilter, ContentId, Page, PageAlias, PageId, TreePosition,
};
use crate::domain::repository::{AliasRepository, ContentRepository, PageRepository};
use crate::domain::tree::{self, TreeError, MAX_DEPTH};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;

// ===== Page Repository =====

pub struct SeaOrmPageRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPageRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

async fn find_page<C: ConnectionTrait>(conn: &C, id: PageId) -> Result<Option<Page>> {
    page::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(Page::try_from)
        .transpose()
}

/// Sibling ids under a parent, in position order
async fn sibling_ids<C: ConnectionTrait>(conn: &C, parent_id: Option<PageId>) -> Result<Vec<PageId>> {
    let query = match parent_id {
        Some(parent_id) => page::Entity::find().filter(page::Column::ParentId.eq(parent_id)),
        None => page::Entity::find().filter(page::Column::ParentId.is_null()),
    };
    let ids = query
        .select_only()
        .column(page::Column::Id)
        .order_by_asc(page::Column::Position)
        .order_by_asc(page::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await?;
    Ok(ids)
}

async fn ancestor_ids<C: ConnectionTrait>(conn: &C, page_id: PageId) -> Result<Vec<PageId>> {
    let mut path: Vec<PageId> = Vec::new();
    let mut current = find_page(conn, page_id)
        .await?
        .ok_or(TreeError::PageNotFound(page_id))?
        .parent_id;
    while let Some(parent_id) = current {
        if parent_id == page_id || path.contains(&parent_id) {
            return Err(TreeError::InvalidHierarchy(format!(
                "Circular reference detected at page {}",
                parent_id
            ))
            .into());
        }
        path.push(parent_id);
        if path.len() > MAX_DEPTH {
            return Err(TreeError::InvalidHierarchy(format!(
                "Hierarchy depth exceeds maximum ({} levels)",
                MAX_DEPTH
            ))
            .into());
        }
        current = find_page(conn, parent_id)
            .await?
            .ok_or(TreeError::PageNotFound(parent_id))?
            .parent_id;
    }
    Ok(path)
}

/// Descendant ids in pre-order
async fn descendant_ids<C: ConnectionTrait>(conn: &C, page_id: PageId) -> Result<Vec<PageId>> {
    let mut out = Vec::new();
    let mut stack: Vec<PageId> = sibling_ids(conn, Some(page_id)).await?;
    stack.reverse();
    while let Some(id) = stack.pop() {
        out.push(id);
        let mut children = sibling_ids(conn, Some(id)).await?;
        children.reverse();
        stack.extend(children);
    }
    Ok(out)
}

async fn renumber<C: ConnectionTrait>(conn: &C, ordered: &[(PageId, i32)]) -> Result<()> {
    for (id, position) in ordered {
        page::Entity::update_many()
            .col_expr(page::Column::Position, Expr::value(*position))
            .filter(page::Column::Id.eq(*id))
            .exec(conn)
            .await?;
    }
    Ok(())
}

async fn load_pages<C: ConnectionTrait>(conn: &C, ids: &[PageId]) -> Result<Vec<Page>> {
    let mut pages: Vec<Page> = page::Entity::find()
        .filter(page::Column::Id.is_in(ids.to_vec()))
        .all(conn)
        .await?
        .into_iter()
        .map(Page::try_from)
        .collect::<Result<_>>()?;
    pages.sort_by_key(|p| ids.iter().position(|id| *id == p.id));
    Ok(pages)
}

#[async_trait]
impl PageRepository for SeaOrmPageRepository {
    async fn get(&self, id: PageId) -> Result<Option<Page>> {
        find_page(&*self.db, id).await
    }

    async fn find_by_ids(&self, ids: &[PageId]) -> Result<Vec<Page>> {
        load_pages(&*self.db, ids).await
    }

    async fn insert(&self, model: &Page) -> Result<Page> {
        let position = page::Entity::find()
            .filter(page::Column::ParentId.is_null())
            .count(&*self.db)
            .await?;

        let mut active: page::ActiveModel = model.into();
        active.id = sea_orm::ActiveValue::NotSet;
        active.parent_id = Set(None);
        active.position = Set(position as i32);
        active.level = Set(0);

        let result = page::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;
        result.try_into()
    }

    async fn update(&self, model: &Page) -> Result<Page> {
        if find_page(&*self.db, model.id).await?.is_none() {
            return Err(TreeError::PageNotFound(model.id).into());
        }
        let active: page::ActiveModel = model.into();
        let result = page::Entity::update(active).exec(&*self.db).await?;
        result.try_into()
    }

    async fn move_to(
        &self,
        page_id: PageId,
        target_id: PageId,
        position: TreePosition,
    ) -> Result<Page> {
        let txn = self.db.begin().await?;

        let moved = find_page(&txn, page_id)
            .await?
            .ok_or(TreeError::PageNotFound(page_id))?;
        let target = find_page(&txn, target_id)
            .await?
            .ok_or(TreeError::PageNotFound(target_id))?;
        tree::check_move(page_id, target_id, &ancestor_ids(&txn, target_id).await?)?;

        let destination = sibling_ids(&txn, position.new_parent(&target)).await?;
        let origin = sibling_ids(&txn, moved.parent_id).await?;
        let plan = tree::plan_move(&moved, &target, position, &destination, &origin);

        let descendants = descendant_ids(&txn, page_id).await?;
        if !descendants.is_empty() && plan.level_delta != 0 {
            page::Entity::update_many()
                .col_expr(
                    page::Column::Level,
                    Expr::col(page::Column::Level).add(plan.level_delta),
                )
                .filter(page::Column::Id.is_in(descendants))
                .exec(&txn)
                .await?;
        }
        page::Entity::update_many()
            .col_expr(page::Column::ParentId, Expr::value(plan.parent_id))
            .col_expr(page::Column::Level, Expr::value(plan.level))
            .filter(page::Column::Id.eq(page_id))
            .exec(&txn)
            .await?;
        renumber(&txn, &plan.old_siblings).await?;
        renumber(&txn, &plan.new_siblings).await?;

        let result = find_page(&txn, page_id)
            .await?
            .ok_or(TreeError::PageNotFound(page_id))?;
        txn.commit().await?;
        Ok(result)
    }

    async fn root_pages(&self) -> Result<Vec<Page>> {
        let ids = sibling_ids(&*self.db, None).await?;
        load_pages(&*self.db, &ids).await
    }

    async fn children_of(&self, page_id: PageId) -> Result<Vec<Page>> {
        let ids = sibling_ids(&*self.db, Some(page_id)).await?;
        load_pages(&*self.db, &ids).await
    }

    async fn ancestors(&self, page_id: PageId) -> Result<Vec<PageId>> {
        ancestor_ids(&*self.db, page_id).await
    }

    async fn descendants(&self, page_id: PageId) -> Result<Vec<Page>> {
        let ids = descendant_ids(&*self.db, page_id).await?;
        load_pages(&*self.db, &ids).await
    }

    async fn delete_subtree(&self, page_id: PageId) -> Result<Vec<PageId>> {
        let txn = self.db.begin().await?;
        let Some(root) = find_page(&txn, page_id).await? else {
            return Ok(Vec::new());
        };
        let mut deleted = vec![page_id];
        deleted.extend(descendant_ids(&txn, page_id).await?);

        page::Entity::delete_many()
            .filter(page::Column::Id.is_in(deleted.clone()))
            .exec(&txn)
            .await?;
        let remaining: Vec<(PageId, i32)> = sibling_ids(&txn, root.parent_id)
            .await?
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i as i32))
            .collect();
        renumber(&txn, &remaining).await?;

        txn.commit().await?;
        Ok(deleted)
    }
}

// ===== Content Repository =====

pub struct SeaOrmContentRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmContentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn latest(&self, page_id: PageId, language: &str, slot: &str) -> Result<Option<content::Model>> {
        let result = content::Entity::find()
            .filter(content::Column::PageId.eq(page_id))
            .filter(content::Column::Language.eq(language))
            .filter(content::Column::Slot.eq(slot))
            .order_by_desc(content::Column::Id)
            .one(&*self.db)
            .await?;
        Ok(result)
    }

    async fn append(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        body: &str,
        version: i32,
    ) -> Result<Content> {
        let active = content::ActiveModel {
            page_id: Set(page_id),
            language: Set(language.to_string()),
            slot: Set(slot.to_string()),
            body: Set(body.to_string()),
            version: Set(version),
            creation_date: Set(chrono::Utc::now()),
            ..Default::default()
        };
        let result = content::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;
        Ok(result.into())
    }
}

/// Case-insensitive substring match on a content body.
///
/// Folding happens here rather than in SQL: `LOWER()` only folds ASCII on
/// SQLite and `LIKE` treats `%` and `_` in the needle as wildcards.
fn body_matches(body: &str, folded_needle: &str) -> bool {
    body.to_lowercase().contains(folded_needle)
}

#[async_trait]
impl ContentRepository for SeaOrmContentRepository {
    async fn get_content(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
    ) -> Result<Option<String>> {
        Ok(self.latest(page_id, language, slot).await?.map(|c| c.body))
    }

    async fn get_by_id(&self, id: ContentId) -> Result<Option<Content>> {
        let result = content::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn get_version(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        version: i32,
    ) -> Result<Option<Content>> {
        let result = content::Entity::find()
            .filter(content::Column::PageId.eq(page_id))
            .filter(content::Column::Language.eq(language))
            .filter(content::Column::Slot.eq(slot))
            .filter(content::Column::Version.eq(version))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_versions(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
    ) -> Result<Vec<Content>> {
        let results = content::Entity::find()
            .filter(content::Column::PageId.eq(page_id))
            .filter(content::Column::Language.eq(language))
            .filter(content::Column::Slot.eq(slot))
            .order_by_asc(content::Column::Version)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn set_or_create_content(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        body: &str,
    ) -> Result<Content> {
        match self.latest(page_id, language, slot).await? {
            Some(existing) => {
                let mut active: content::ActiveModel = existing.into();
                active.body = Set(body.to_string());
                active.creation_date = Set(chrono::Utc::now());
                Ok(active.update(&*self.db).await?.into())
            }
            None => self.append(page_id, language, slot, body, 1).await,
        }
    }

    async fn create_content_if_changed(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        body: &str,
    ) -> Result<Content> {
        let version = match self.latest(page_id, language, slot).await? {
            Some(latest) if latest.body == body => return Ok(latest.into()),
            Some(latest) => latest.version + 1,
            None => 1,
        };
        self.append(page_id, language, slot, body, version).await
    }

    async fn search(&self, needle: &str) -> Result<Vec<PageId>> {
        let needle = needle.to_lowercase();
        let rows = content::Entity::find()
            .select_only()
            .column(content::Column::PageId)
            .column(content::Column::Body)
            .into_tuple::<(i64, String)>()
            .all(&*self.db)
            .await?;
        let mut ids: Vec<PageId> = rows
            .into_iter()
            .filter(|(_, body)| body_matches(body, &needle))
            .map(|(page_id, _)| page_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn filter(&self, filter: &ContentFilter) -> Result<Vec<Content>> {
        let mut query = content::Entity::find();
        if let Some(page_id) = filter.page_id {
            query = query.filter(content::Column::PageId.eq(page_id));
        }
        if let Some(language) = &filter.language {
            query = query.filter(content::Column::Language.eq(language.as_str()));
        }
        if let Some(slot) = &filter.slot {
            query = query.filter(content::Column::Slot.eq(slot.as_str()));
        }
        let needle = filter.body_contains.as_ref().map(|n| n.to_lowercase());
        let results = query
            .order_by_asc(content::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(results
            .into_iter()
            .filter(|c| needle.as_deref().map_or(true, |n| body_matches(&c.body, n)))
            .map(Into::into)
            .collect())
    }

    async fn has_content_in_language(&self, page_id: PageId, language: &str) -> Result<bool> {
        let count = content::Entity::find()
            .filter(content::Column::PageId.eq(page_id))
            .filter(content::Column::Language.eq(language))
            .count(&*self.db)
            .await?;
        Ok(count > 0)
    }

    async fn languages_with_slot(&self, page_id: PageId, slot: &str) -> Result<Vec<String>> {
        let records = content::Entity::find()
            .filter(content::Column::PageId.eq(page_id))
            .filter(content::Column::Slot.eq(slot))
            .order_by_desc(content::Column::Id)
            .all(&*self.db)
            .await?;

        // Newest first: the first record seen per language is its latest
        let mut seen = HashSet::new();
        let mut languages: Vec<(i64, String)> = Vec::new();
        for record in records {
            if seen.insert(record.language.clone()) && !record.body.is_empty() {
                languages.push((record.id, record.language));
            }
        }
        languages.sort_by_key(|(id, _)| *id);
        Ok(languages.into_iter().map(|(_, language)| language).collect())
    }

    async fn delete_for_page_language(&self, page_id: PageId, language: &str) -> Result<u64> {
        let result = content::Entity::delete_many()
            .filter(content::Column::PageId.eq(page_id))
            .filter(content::Column::Language.eq(language))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_for_pages(&self, page_ids: &[PageId]) -> Result<u64> {
        let result = content::Entity::delete_many()
            .filter(content::Column::PageId.is_in(page_ids.to_vec()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

// ===== Alias Repository =====

pub struct SeaOrmAliasRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAliasRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AliasRepository for SeaOrmAliasRepository {
    async fn list(&self, page_id: Option<PageId>) -> Result<Vec<PageAlias>> {
        let mut query = alias::Entity::find();
        if let Some(page_id) = page_id {
            query = query.filter(alias::Column::PageId.eq(page_id));
        }
        let results = query.order_by_asc(alias::Column::Id).all(&*self.db).await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: AliasId) -> Result<Option<PageAlias>> {
        let result = alias::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<PageAlias>> {
        let result = alias::Entity::find()
            .filter(alias::Column::Url.eq(url))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn create(&self, page_id: PageId, url: &str) -> Result<PageAlias> {
        let active = alias::ActiveModel {
            page_id: Set(page_id),
            url: Set(url.to_string()),
            ..Default::default()
        };
        let result = alias::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;
        Ok(result.into())
    }

    async fn update_url(&self, id: AliasId, url: &str) -> Result<PageAlias> {
        let existing = alias::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| anyhow!("alias {} not found", id))?;
        let mut active: alias::ActiveModel = existing.into();
        active.url = Set(url.to_string());
        Ok(active.update(&*self.db).await?.into())
    }

    async fn delete(&self, id: AliasId) -> Result<()> {
        alias::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn delete_for_pages(&self, page_ids: &[PageId]) -> Result<u64> {
        let result = alias::Entity::delete_many()
            .filter(alias::Column::PageId.is_in(page_ids.to_vec()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
