//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs and infra/memory.rs

use crate::contract::{
    AliasId, Content, ContentFilter, ContentId, Page, PageAlias, PageId, TreePosition,
};
use anyhow::Result;
use async_trait::async_trait;

/// Page tree storage
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Find a page by primary key
    async fn get(&self, id: PageId) -> Result<Option<Page>>;

    /// Find several pages, missing ids are skipped
    async fn find_by_ids(&self, ids: &[PageId]) -> Result<Vec<Page>>;

    /// Store a new page as the last root page; the stored page carries its id
    async fn insert(&self, page: &Page) -> Result<Page>;

    /// Update page attributes; tree fields are only changed by `move_to`
    async fn update(&self, page: &Page) -> Result<Page>;

    /// Reposition a page relative to a target, as one atomic operation
    ///
    /// Fails if the target lies inside the moved subtree
    async fn move_to(&self, page_id: PageId, target_id: PageId, position: TreePosition)
        -> Result<Page>;

    /// Root pages ordered by position
    async fn root_pages(&self) -> Result<Vec<Page>>;

    /// Children ordered by position
    async fn children_of(&self, page_id: PageId) -> Result<Vec<Page>>;

    /// Ancestor ids from the parent up to the root
    async fn ancestors(&self, page_id: PageId) -> Result<Vec<PageId>>;

    /// Descendants in pre-order, excluding the page itself
    async fn descendants(&self, page_id: PageId) -> Result<Vec<Page>>;

    /// Delete a page and its descendants, returns the deleted ids
    async fn delete_subtree(&self, page_id: PageId) -> Result<Vec<PageId>>;
}

/// Versioned content storage keyed by (page, language, slot)
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Latest body of a slot
    async fn get_content(&self, page_id: PageId, language: &str, slot: &str)
        -> Result<Option<String>>;

    /// A content record by primary key
    async fn get_by_id(&self, id: ContentId) -> Result<Option<Content>>;

    /// A specific version of a slot
    async fn get_version(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        version: i32,
    ) -> Result<Option<Content>>;

    /// Every version of a slot, oldest first
    async fn list_versions(&self, page_id: PageId, language: &str, slot: &str)
        -> Result<Vec<Content>>;

    /// Overwrite the latest record in place, or create the first one
    async fn set_or_create_content(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        body: &str,
    ) -> Result<Content>;

    /// Append a new version unless the body equals the latest one
    async fn create_content_if_changed(
        &self,
        page_id: PageId,
        language: &str,
        slot: &str,
        body: &str,
    ) -> Result<Content>;

    /// Distinct page ids with a body containing `needle`, case-insensitive
    async fn search(&self, needle: &str) -> Result<Vec<PageId>>;

    /// Content records matching a filter, ordered by id
    async fn filter(&self, filter: &ContentFilter) -> Result<Vec<Content>>;

    /// Whether the page has any content in a language
    async fn has_content_in_language(&self, page_id: PageId, language: &str) -> Result<bool>;

    /// Languages in which the page has a non-empty latest value for a slot
    async fn languages_with_slot(&self, page_id: PageId, slot: &str) -> Result<Vec<String>>;

    /// Delete every record of a page in a language
    async fn delete_for_page_language(&self, page_id: PageId, language: &str) -> Result<u64>;

    /// Delete every record of the given pages
    async fn delete_for_pages(&self, page_ids: &[PageId]) -> Result<u64>;
}

/// Page alias storage; urls are unique
#[async_trait]
pub trait AliasRepository: Send + Sync {
    async fn list(&self, page_id: Option<PageId>) -> Result<Vec<PageAlias>>;

    async fn get(&self, id: AliasId) -> Result<Option<PageAlias>>;

    async fn find_by_url(&self, url: &str) -> Result<Option<PageAlias>>;

    async fn create(&self, page_id: PageId, url: &str) -> Result<PageAlias>;

    async fn update_url(&self, id: AliasId, url: &str) -> Result<PageAlias>;

    async fn delete(&self, id: AliasId) -> Result<()>;

    async fn delete_for_pages(&self, page_ids: &[PageId]) -> Result<u64>;
}
