//! REST API route definitions

use super::{dto::*, error::*, handlers};
use crate::domain::Service;
use axum::{
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// OpenAPI components of the page admin API
#[derive(OpenApi)]
#[openapi(
    info(title = "Page Admin API"),
    components(schemas(
        PageDto,
        PageSummaryDto,
        PageListingDto,
        PageSubmissionDto,
        MovePageRequest,
        ChangeStatusRequest,
        DeletedPagesDto,
        ChoiceDto,
        FieldTypeDto,
        FormFieldDto,
        FieldsetDto,
        ChangeFormDto,
        ContentDto,
        ContentBodyDto,
        ModifyContentRequest,
        DeletedContentDto,
        TranslationSlotDto,
        TranslationDto,
        AliasDto,
        CreateAliasRequest,
        UpdateAliasRequest,
        ExportRequest,
        ImportReportDto,
        FieldErrorDto,
        Problem,
    ))
)]
pub struct PageAdminApiDoc;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // Pages
        .route("/pages", get(handlers::list_pages).post(handlers::add_page))
        .route("/pages/add", get(handlers::add_view))
        .route("/pages/export", post(handlers::export_pages))
        .route("/pages/import", post(handlers::import_pages))
        .route(
            "/pages/{id}",
            get(handlers::change_view)
                .post(handlers::change_page)
                .delete(handlers::delete_page),
        )
        .route("/pages/{id}/sub-menu", get(handlers::sub_menu))
        .route("/pages/{id}/move", post(handlers::move_page))
        .route("/pages/{id}/status", post(handlers::change_status))
        // Translations and content
        .route(
            "/pages/{id}/traduction-languages",
            get(handlers::traduction_languages),
        )
        .route("/pages/{id}/traduction/{language}", get(handlers::traduction))
        .route("/pages/{id}/contents", put(handlers::modify_content))
        .route(
            "/pages/{id}/contents/{content_id}",
            get(handlers::get_content),
        )
        .route(
            "/pages/{id}/translations/{language}",
            axum::routing::delete(handlers::delete_content),
        )
        .route("/contents", get(handlers::list_contents))
        // Aliases
        .route(
            "/aliases",
            get(handlers::list_aliases).post(handlers::create_alias),
        )
        .route(
            "/aliases/{id}",
            put(handlers::update_alias).delete(handlers::delete_alias),
        )
        .route("/openapi.json", get(openapi_json))
        .layer(Extension(service))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(PageAdminApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_components() {
        let doc = PageAdminApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.schemas.contains_key("PageDto"));
        assert!(components.schemas.contains_key("Problem"));
    }
}
