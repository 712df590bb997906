//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

// ===== Page DTOs =====

/// Page response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub position: i32,
    pub level: i32,
    pub author: Option<String>,

    /// Publication status
    #[schema(example = "published")]
    pub status: String,

    /// Explicit template, null when inherited
    pub template: Option<String>,
    pub freeze_date: Option<DateTime<Utc>>,
    pub publication_date: Option<DateTime<Utc>>,
    pub publication_end_date: Option<DateTime<Utc>>,
    pub sites: Vec<i64>,
    pub tags: Vec<String>,
    pub delegate_to: Option<String>,
    pub redirect_to: Option<i64>,
    pub redirect_to_url: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub last_modification_date: DateTime<Utc>,
}

/// A page row of the change list or a sub-menu
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageSummaryDto {
    pub page: PageDto,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub children_count: usize,
    /// Languages the page has a title in
    pub languages: Vec<String>,
}

/// Change list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageListingDto {
    pub language: String,
    /// Search text, empty for the root listing
    pub q: String,
    pub can_publish: bool,
    pub pages: Vec<PageSummaryDto>,
}

/// Raw form submission, field name to value
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PageSubmissionDto(pub HashMap<String, String>);

/// Tree move request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MovePageRequest {
    pub target: i64,

    #[schema(example = "last-child")]
    pub position: String,
}

/// Status change request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    /// Status name or numeric code
    #[schema(example = "published")]
    pub status: String,
}

/// Pages removed by a delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedPagesDto {
    pub deleted: Vec<i64>,
}

// ===== Form DTOs =====

/// A (value, label) choice of a select field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChoiceDto {
    pub value: String,
    pub label: String,
}

/// Widget of a form field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldTypeDto {
    Text,
    TextArea,
    RichText,
    DateTime,
    Select { choices: Vec<ChoiceDto> },
    MultiSelect { choices: Vec<ChoiceDto> },
    File,
    Hidden,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormFieldDto {
    pub name: String,
    pub label: String,
    pub widget: FieldTypeDto,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    pub initial: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldsetDto {
    pub name: String,
    pub classes: Vec<String>,
    pub fields: Vec<String>,
}

/// Add or change view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeFormDto {
    pub language: String,
    pub page_languages: Vec<ChoiceDto>,
    pub template: String,
    pub placeholders: Vec<String>,
    pub traduction_languages: Vec<String>,
    pub page: Option<PageDto>,
    pub fieldsets: Vec<FieldsetDto>,
    /// Fields in render order
    pub fields: Vec<FormFieldDto>,
}

// ===== Content DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentDto {
    pub id: i64,
    pub page_id: i64,
    pub language: String,
    pub slot: String,
    pub body: String,
    pub version: i32,
    pub creation_date: DateTime<Utc>,
}

/// Body of one content record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentBodyDto {
    pub body: String,
}

/// Single slot edit
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ModifyContentRequest {
    #[schema(example = "body")]
    pub slot: String,
    #[schema(example = "en-us")]
    pub language: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedContentDto {
    pub deleted: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslationSlotDto {
    pub slot: String,
    /// Value in the active language
    pub current: Option<String>,
    /// Value in the requested language
    pub translated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslationDto {
    pub page_id: i64,
    pub language: String,
    pub target_language: String,
    pub slots: Vec<TranslationSlotDto>,
}

// ===== Alias DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AliasDto {
    pub id: i64,
    pub page_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAliasRequest {
    pub page_id: i64,
    #[schema(example = "/old/about-us")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAliasRequest {
    pub url: String,
}

// ===== Import / export DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExportRequest {
    pub page_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportReportDto {
    pub created: Vec<i64>,
    pub skipped_aliases: Vec<String>,
}
