//! Native client implementation - wraps the domain service for in-process calls

use crate::contract::{
    ChangeFormContext, Content, ContentFilter, ContentId, ImportReport, Page, PageAdminApi,
    PageAdminError, PageAlias, PageId, PageListing, PageStatus, PageSubmission, PageSummary,
    RequestContext, Translation, TreePosition,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that calls the domain service directly
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PageAdminApi for NativeClient {
    async fn add_view(&self, ctx: &RequestContext) -> Result<ChangeFormContext, PageAdminError> {
        self.service.add_view(ctx).await
    }

    async fn change_view(
        &self,
        ctx: &RequestContext,
        object_id: &str,
    ) -> Result<ChangeFormContext, PageAdminError> {
        self.service.change_view(ctx, object_id).await
    }

    async fn list_pages(
        &self,
        ctx: &RequestContext,
        query: &str,
    ) -> Result<PageListing, PageAdminError> {
        self.service.list_pages(ctx, query).await
    }

    async fn sub_menu(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<PageSummary>, PageAdminError> {
        self.service.sub_menu(ctx, page_id).await
    }

    async fn add_page(
        &self,
        ctx: &RequestContext,
        submission: &PageSubmission,
    ) -> Result<Page, PageAdminError> {
        self.service.add_page(ctx, submission).await
    }

    async fn change_page(
        &self,
        ctx: &RequestContext,
        object_id: &str,
        submission: &PageSubmission,
    ) -> Result<Page, PageAdminError> {
        self.service.change_page(ctx, object_id, submission).await
    }

    async fn move_page(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        target_id: PageId,
        position: TreePosition,
    ) -> Result<Page, PageAdminError> {
        self.service
            .move_page(ctx, page_id, target_id, position)
            .await
    }

    async fn change_status(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        status: PageStatus,
    ) -> Result<Page, PageAdminError> {
        self.service.change_status(ctx, page_id, status).await
    }

    async fn delete_page(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<PageId>, PageAdminError> {
        self.service.delete_page(ctx, page_id).await
    }

    async fn traduction_languages(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
    ) -> Result<Vec<String>, PageAdminError> {
        self.service.traduction_languages(ctx, page_id).await
    }

    async fn traduction(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        language: &str,
    ) -> Result<Translation, PageAdminError> {
        self.service.traduction(ctx, page_id, language).await
    }

    async fn get_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        content_id: ContentId,
    ) -> Result<String, PageAdminError> {
        self.service.get_content(ctx, page_id, content_id).await
    }

    async fn modify_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        slot: &str,
        language: &str,
        body: &str,
    ) -> Result<Content, PageAdminError> {
        self.service
            .modify_content(ctx, page_id, slot, language, body)
            .await
    }

    async fn delete_content(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        language: &str,
    ) -> Result<u64, PageAdminError> {
        self.service.delete_content(ctx, page_id, language).await
    }

    async fn list_contents(
        &self,
        ctx: &RequestContext,
        filter: &ContentFilter,
    ) -> Result<Vec<Content>, PageAdminError> {
        self.service.list_contents(ctx, filter).await
    }

    async fn list_aliases(
        &self,
        ctx: &RequestContext,
        page_id: Option<PageId>,
    ) -> Result<Vec<PageAlias>, PageAdminError> {
        self.service.list_aliases(ctx, page_id).await
    }

    async fn create_alias(
        &self,
        ctx: &RequestContext,
        page_id: PageId,
        url: &str,
    ) -> Result<PageAlias, PageAdminError> {
        self.service.create_alias(ctx, page_id, url).await
    }

    async fn update_alias(
        &self,
        ctx: &RequestContext,
        alias_id: i64,
        url: &str,
    ) -> Result<PageAlias, PageAdminError> {
        self.service.update_alias(ctx, alias_id, url).await
    }

    async fn delete_alias(
        &self,
        ctx: &RequestContext,
        alias_id: i64,
    ) -> Result<(), PageAdminError> {
        self.service.delete_alias(ctx, alias_id).await
    }

    async fn export_pages(
        &self,
        ctx: &RequestContext,
        page_ids: &[PageId],
    ) -> Result<serde_json::Value, PageAdminError> {
        self.service.export_pages(ctx, page_ids).await
    }

    async fn import_pages(
        &self,
        ctx: &RequestContext,
        document: &serde_json::Value,
    ) -> Result<ImportReport, PageAdminError> {
        self.service.import_pages(ctx, document).await
    }
}
