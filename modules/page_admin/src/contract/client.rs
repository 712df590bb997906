//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to drive the page admin.
//! NO HTTP - direct function calls.

use super::error::PageAdminError;
use super::form::{ChangeFormContext, PageSubmission};
use super::model::{
    Content, ContentFilter, ContentId, ImportReport, Page, PageAlias, PageId, PageListing,
    PageStatus, PageSummary, RequestContext, Translation, TreePosition,
};
use async_trait::async_trait;

/// Page admin API for inter-module communication
#[async_trait]
pub trait PageAdminApi: Send + Sync {
    // ===== Views =====

    /// Form and context of the add view
    async fn add_view(&self, ctx: &RequestContext) -> Result<ChangeFormContext, PageAdminError>;

    /// Form and context of the change view; `object_id` is the raw path segment
    async fn change_view(
        &self,
        ctx: &RequestContext,
        object_id: &str,
    ) -> Result<ChangeFormContext, PageAdminError>;

    /// Root pages, or pages whose content matches `query`
    async fn list_pages(
        &self,
        ctx: &RequestContext,
        query: &str,
    ) -> Result<PageListing, PageAdminError>;

    /// Children of a page
    async fn sub_menu(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<PageSummary>, PageAdminError>;

    // ===== Mutations =====

    async fn add_page(
        &self,
        ctx: &RequestContext,
        submission: &PageSubmission,
    ) -> Result<Page, PageAdminError>;

    async fn change_page(
        &self,
        ctx: &RequestContext,
        object_id: &str,
        submission: &PageSubmission,
    ) -> Result<Page, PageAdminError>;

    async fn move_page(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        target_id: PageId,
        position: TreePosition,
    ) -> Result<Page, PageAdminError>;

    async fn change_status(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        status: PageStatus,
    ) -> Result<Page, PageAdminError>;

    /// Deletes the page with its whole subtree
    async fn delete_page(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<PageId>, PageAdminError>;

    // ===== Content =====

    async fn traduction_languages(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<String>, PageAdminError>;

    async fn traduction(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        language: &str,
    ) -> Result<Translation, PageAdminError>;

    async fn get_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        content_id: ContentId,
    ) -> Result<String, PageAdminError>;

    async fn modify_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        slot: &str,
        language: &str,
        body: &str,
    ) -> Result<Content, PageAdminError>;

    async fn delete_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        language: &str,
    ) -> Result<u64, PageAdminError>;

    async fn list_contents(
        &self,
        ctx: &RequestContext,
        filter: &ContentFilter,
    ) -> Result<Vec<Content>, PageAdminError>;

    // ===== Aliases =====

    async fn list_aliases(
        &self,
        ctx: &RequestContext,
        page_id: Option<PageId>,
    ) -> Result<Vec<PageAlias>, PageAdminError>;

    async fn create_alias(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        url: &str,
    ) -> Result<PageAlias, PageAdminError>;

    async fn update_alias(
        &self,
        ctx: &RequestContext,
        alias_id: i64,
        url: &str,
    ) -> Result<PageAlias, PageAdminError>;

    async fn delete_alias(&self, ctx: &RequestContext, alias_id: i64)
        -> Result<(), PageAdminError>;

    // ===== Import / export =====

    async fn export_pages(
        &self,
        ctx: &RequestContext,
        page_ids: &[PageId],
    ) -> Result<serde_json::Value, PageAdminError>;

    async fn import_pages(
        &self,
        ctx: &RequestContext,
        document: &serde_json::Value,
    ) -> Result<ImportReport, PageAdminError>;
}
