//! HTTP request handlers - thin layer that delegates to domain service

use super::{dto::*, error::Problem, extractors::AdminContext};
use crate::contract::{ContentFilter, PageStatus, TreePosition};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

// ===== Page handlers =====

#[derive(Debug, Deserialize)]
pub struct ListPagesQuery {
    /// Search text; empty lists the root pages
    #[serde(default)]
    pub q: String,
}

pub async fn list_pages(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Query(query): Query<ListPagesQuery>,
) -> Result<Json<PageListingDto>, Problem> {
    let listing = service.list_pages(&ctx, &query.q).await?;
    Ok(Json(listing.into()))
}

pub async fn add_view(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
) -> Result<Json<ChangeFormDto>, Problem> {
    let form = service.add_view(&ctx).await?;
    Ok(Json(form.into()))
}

pub async fn change_view(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(object_id): Path<String>,
) -> Result<Json<ChangeFormDto>, Problem> {
    let form = service.change_view(&ctx, &object_id).await?;
    Ok(Json(form.into()))
}

pub async fn add_page(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Json(submission): Json<PageSubmissionDto>,
) -> Result<(StatusCode, Json<PageDto>), Problem> {
    let page = service.add_page(&ctx, &submission.into()).await?;
    Ok((StatusCode::CREATED, Json(page.into())))
}

pub async fn change_page(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(object_id): Path<String>,
    Json(submission): Json<PageSubmissionDto>,
) -> Result<Json<PageDto>, Problem> {
    let page = service
        .change_page(&ctx, &object_id, &submission.into())
        .await?;
    Ok(Json(page.into()))
}

pub async fn delete_page(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(page_id): Path<i64>,
) -> Result<Json<DeletedPagesDto>, Problem> {
    let deleted = service.delete_page(&ctx, page_id).await?;
    Ok(Json(DeletedPagesDto { deleted }))
}

pub async fn sub_menu(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(page_id): Path<i64>,
) -> Result<Json<Vec<PageSummaryDto>>, Problem> {
    let children = service.sub_menu(&ctx, page_id).await?;
    Ok(Json(children.into_iter().map(Into::into).collect()))
}

pub async fn move_page(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(page_id): Path<i64>,
    Json(req): Json<MovePageRequest>,
) -> Result<Json<PageDto>, Problem> {
    let position = TreePosition::parse(&req.position).ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail(format!("Unknown tree position '{}'", req.position))
    })?;
    let page = service
        .move_page(&ctx, page_id, req.target, position)
        .await?;
    Ok(Json(page.into()))
}

pub async fn change_status(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(page_id): Path<i64>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<PageDto>, Problem> {
    let status = PageStatus::parse(&req.status).ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail(format!("Unknown page status '{}'", req.status))
    })?;
    let page = service.change_status(&ctx, page_id, status).await?;
    Ok(Json(page.into()))
}

// ===== Translation and content handlers =====

pub async fn traduction_languages(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(page_id): Path<i64>,
) -> Result<Json<Vec<String>>, Problem> {
    Ok(Json(service.traduction_languages(&ctx, page_id).await?))
}

pub async fn traduction(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path((page_id, language)): Path<(i64, String)>,
) -> Result<Json<TranslationDto>, Problem> {
    let translation = service.traduction(&ctx, page_id, &language).await?;
    Ok(Json(translation.into()))
}

pub async fn get_content(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path((page_id, content_id)): Path<(i64, i64)>,
) -> Result<Json<ContentBodyDto>, Problem> {
    let body = service.get_content(&ctx, page_id, content_id).await?;
    Ok(Json(ContentBodyDto { body }))
}

pub async fn modify_content(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(page_id): Path<i64>,
    Json(req): Json<ModifyContentRequest>,
) -> Result<Json<ContentDto>, Problem> {
    let content = service
        .modify_content(&ctx, page_id, &req.slot, &req.language, &req.body)
        .await?;
    Ok(Json(content.into()))
}

pub async fn delete_content(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path((page_id, language)): Path<(i64, String)>,
) -> Result<Json<DeletedContentDto>, Problem> {
    let deleted = service.delete_content(&ctx, page_id, &language).await?;
    Ok(Json(DeletedContentDto { deleted }))
}

/// Content listing filters
#[derive(Debug, Deserialize)]
pub struct ListContentsQuery {
    pub page_id: Option<i64>,
    pub language: Option<String>,
    pub slot: Option<String>,
    /// Body search text
    pub q: Option<String>,
}

pub async fn list_contents(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Query(query): Query<ListContentsQuery>,
) -> Result<Json<Vec<ContentDto>>, Problem> {
    let filter = ContentFilter {
        page_id: query.page_id,
        language: query.language,
        slot: query.slot,
        body_contains: query.q.filter(|q| !q.trim().is_empty()),
    };
    let contents = service.list_contents(&ctx, &filter).await?;
    Ok(Json(contents.into_iter().map(Into::into).collect()))
}

// ===== Alias handlers =====

#[derive(Debug, Deserialize)]
pub struct ListAliasesQuery {
    pub page_id: Option<i64>,
}

pub async fn list_aliases(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Query(query): Query<ListAliasesQuery>,
) -> Result<Json<Vec<AliasDto>>, Problem> {
    let aliases = service.list_aliases(&ctx, query.page_id).await?;
    Ok(Json(aliases.into_iter().map(Into::into).collect()))
}

pub async fn create_alias(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Json(req): Json<CreateAliasRequest>,
) -> Result<(StatusCode, Json<AliasDto>), Problem> {
    let alias = service.create_alias(&ctx, req.page_id, &req.url).await?;
    Ok((StatusCode::CREATED, Json(alias.into())))
}

pub async fn update_alias(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(alias_id): Path<i64>,
    Json(req): Json<UpdateAliasRequest>,
) -> Result<Json<AliasDto>, Problem> {
    let alias = service.update_alias(&ctx, alias_id, &req.url).await?;
    Ok(Json(alias.into()))
}

pub async fn delete_alias(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Path(alias_id): Path<i64>,
) -> Result<StatusCode, Problem> {
    service.delete_alias(&ctx, alias_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Import / export handlers =====

pub async fn export_pages(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Json(req): Json<ExportRequest>,
) -> Result<Json<serde_json::Value>, Problem> {
    Ok(Json(service.export_pages(&ctx, &req.page_ids).await?))
}

pub async fn import_pages(
    Extension(service): Extension<Arc<Service>>,
    AdminContext(ctx): AdminContext,
    Json(document): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<ImportReportDto>), Problem> {
    let report = service.import_pages(&ctx, &document).await?;
    Ok((StatusCode::CREATED, Json(report.into())))
}
