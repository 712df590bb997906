//! Conversions between REST DTOs and contract models

use super::dto::*;
use crate::contract;

fn choices(pairs: Vec<(String, String)>) -> Vec<ChoiceDto> {
    pairs
        .into_iter()
        .map(|(value, label)| ChoiceDto { value, label })
        .collect()
}

// ===== Page conversions =====

impl From<contract::Page> for PageDto {
    fn from(page: contract::Page) -> Self {
        Self {
            id: page.id,
            parent_id: page.parent_id,
            position: page.position,
            level: page.level,
            author: page.author,
            status: page.status.as_str().to_string(),
            template: page.template,
            freeze_date: page.freeze_date,
            publication_date: page.publication_date,
            publication_end_date: page.publication_end_date,
            sites: page.sites,
            tags: page.tags,
            delegate_to: page.delegate_to,
            redirect_to: page.redirect_to,
            redirect_to_url: page.redirect_to_url,
            creation_date: page.creation_date,
            last_modification_date: page.last_modification_date,
        }
    }
}

impl From<contract::PageSummary> for PageSummaryDto {
    fn from(summary: contract::PageSummary) -> Self {
        Self {
            page: summary.page.into(),
            title: summary.title,
            slug: summary.slug,
            children_count: summary.children_count,
            languages: summary.languages,
        }
    }
}

impl From<contract::PageListing> for PageListingDto {
    fn from(listing: contract::PageListing) -> Self {
        Self {
            language: listing.language,
            q: listing.query,
            can_publish: listing.can_publish,
            pages: listing.pages.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PageSubmissionDto> for contract::PageSubmission {
    fn from(dto: PageSubmissionDto) -> Self {
        dto.0.into_iter().collect()
    }
}

// ===== Form conversions =====

impl From<contract::FieldType> for FieldTypeDto {
    fn from(field_type: contract::FieldType) -> Self {
        use contract::FieldType;
        match field_type {
            FieldType::Text => Self::Text,
            FieldType::TextArea => Self::TextArea,
            FieldType::RichText => Self::RichText,
            FieldType::DateTime => Self::DateTime,
            FieldType::Select { choices: pairs } => Self::Select {
                choices: choices(pairs),
            },
            FieldType::MultiSelect { choices: pairs } => Self::MultiSelect {
                choices: choices(pairs),
            },
            FieldType::File => Self::File,
            FieldType::Hidden => Self::Hidden,
        }
    }
}

impl From<contract::FormField> for FormFieldDto {
    fn from(field: contract::FormField) -> Self {
        Self {
            name: field.name,
            label: field.label,
            widget: field.field_type.into(),
            required: field.required,
            help_text: field.help_text,
            initial: field.initial,
        }
    }
}

impl From<contract::ChangeFormContext> for ChangeFormDto {
    fn from(context: contract::ChangeFormContext) -> Self {
        Self {
            language: context.language,
            page_languages: choices(context.page_languages),
            template: context.template,
            placeholders: context.placeholders,
            traduction_languages: context.traduction_languages,
            page: context.page.map(Into::into),
            fieldsets: context
                .form
                .fieldsets
                .into_iter()
                .map(|fs| FieldsetDto {
                    name: fs.name,
                    classes: fs.classes,
                    fields: fs.fields,
                })
                .collect(),
            fields: context.form.fields.into_values().map(Into::into).collect(),
        }
    }
}

// ===== Content conversions =====

impl From<contract::Content> for ContentDto {
    fn from(content: contract::Content) -> Self {
        Self {
            id: content.id,
            page_id: content.page_id,
            language: content.language,
            slot: content.slot,
            body: content.body,
            version: content.version,
            creation_date: content.creation_date,
        }
    }
}

impl From<contract::Translation> for TranslationDto {
    fn from(translation: contract::Translation) -> Self {
        Self {
            page_id: translation.page_id,
            language: translation.language,
            target_language: translation.target_language,
            slots: translation
                .slots
                .into_iter()
                .map(|(slot, current, translated)| TranslationSlotDto {
                    slot,
                    current,
                    translated,
                })
                .collect(),
        }
    }
}

// ===== Alias and import conversions =====

impl From<contract::PageAlias> for AliasDto {
    fn from(alias: contract::PageAlias) -> Self {
        Self {
            id: alias.id,
            page_id: alias.page_id,
            url: alias.url,
        }
    }
}

impl From<contract::ImportReport> for ImportReportDto {
    fn from(report: contract::ImportReport) -> Self {
        Self {
            created: report.created,
            skipped_aliases: report.skipped_aliases,
        }
    }
}
