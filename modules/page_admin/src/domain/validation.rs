//! Submission cleaning and JSON Schema validation

use super::form::FieldLayout;
use crate::config::Config;
use crate::contract::{
    Capability, FieldError, Page, PageId, PageStatus, PageSubmission, Principal, SiteId,
    TreePosition,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use jsonschema::Validator;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Submitted page attributes after validation
///
/// For the `Option<Option<_>>` fields the outer None means "not submitted,
/// keep the stored value" and `Some(None)` means "submitted blank, clear it".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanedPage {
    /// Language the slots are saved in
    pub language: String,
    pub title: String,
    pub slug: String,
    /// Only set when the editor may publish
    pub status: Option<PageStatus>,
    pub template: Option<Option<String>>,
    /// Only set when the editor may freeze
    pub freeze_date: Option<Option<DateTime<Utc>>>,
    pub publication_date: Option<Option<DateTime<Utc>>>,
    pub publication_end_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
    pub sites: Option<Vec<SiteId>>,
    pub delegate_to: Option<Option<String>>,
    pub redirect_to: Option<Option<PageId>>,
    pub redirect_to_url: Option<Option<String>>,
    /// Requested tree move
    pub target: Option<(PageId, TreePosition)>,
}

impl CleanedPage {
    /// Copy the submitted attributes onto a page
    pub fn apply_to(&self, page: &mut Page) {
        if let Some(status) = self.status {
            page.status = status;
        }
        if let Some(template) = &self.template {
            page.template = template.clone();
        }
        if let Some(freeze_date) = self.freeze_date {
            page.freeze_date = freeze_date;
        }
        if let Some(date) = self.publication_date {
            page.publication_date = date;
        }
        if let Some(date) = self.publication_end_date {
            page.publication_end_date = date;
        }
        if let Some(tags) = &self.tags {
            page.tags = tags.clone();
        }
        if let Some(sites) = &self.sites {
            page.sites = sites.clone();
        }
        if let Some(delegate_to) = &self.delegate_to {
            page.delegate_to = delegate_to.clone();
        }
        if let Some(redirect_to) = self.redirect_to {
            page.redirect_to = redirect_to;
        }
        if let Some(url) = &self.redirect_to_url {
            page.redirect_to_url = url.clone();
        }
        page.last_modification_date = Utc::now();
    }
}

fn slug_pattern() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| {
        Regex::new(r"^[-\w]+$").unwrap_or_else(|e| unreachable!("slug pattern: {e}"))
    })
}

/// Accepts RFC 3339 and the usual admin widget formats, interpreted as UTC
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Comma separated list, blanks dropped, duplicates removed
pub fn split_list(value: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in value.split(',').map(str::trim).filter(|i| !i.is_empty()) {
        if !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

/// Validate a submission without touching storage
///
/// Checks needing storage (move cycles, slug uniqueness, redirect target)
/// are done by the service afterwards.
pub fn clean_submission(
    config: &Config,
    layout: &FieldLayout,
    principal: &Principal,
    fallback_language: &str,
    submission: &PageSubmission,
) -> Result<CleanedPage, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut cleaned = CleanedPage::default();

    cleaned.language = match submission.non_empty("language") {
        Some(language) if config.is_language(language) => language.to_string(),
        Some(language) => {
            errors.push(FieldError::new(
                "language",
                format!("'{}' is not an available language", language),
            ));
            fallback_language.to_string()
        }
        None => fallback_language.to_string(),
    };

    match submission.non_empty("title") {
        Some(title) => cleaned.title = title.to_string(),
        None => errors.push(FieldError::new("title", "This field is required.")),
    }
    match submission.non_empty("slug") {
        Some(slug) if slug_pattern().is_match(slug) => cleaned.slug = slug.to_string(),
        Some(_) => errors.push(FieldError::new(
            "slug",
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
        )),
        None => errors.push(FieldError::new("slug", "This field is required.")),
    }

    if principal.has(Capability::Publish) {
        if let Some(raw) = submission.non_empty("status") {
            match PageStatus::parse(raw) {
                Some(status) => cleaned.status = Some(status),
                None => errors.push(FieldError::new(
                    "status",
                    format!("'{}' is not a valid status", raw),
                )),
            }
        }
    }

    if submission.contains("template") {
        cleaned.template = match submission.non_empty("template") {
            None => Some(None),
            Some(template) if config.is_template(template) => Some(Some(template.to_string())),
            Some(template) => {
                errors.push(FieldError::new(
                    "template",
                    format!("'{}' is not an available template", template),
                ));
                None
            }
        };
    }

    cleaned.publication_date = date_field(submission, "publication_date", &mut errors);
    cleaned.publication_end_date = date_field(submission, "publication_end_date", &mut errors);
    if let (Some(Some(start)), Some(Some(end))) =
        (cleaned.publication_date, cleaned.publication_end_date)
    {
        if end < start {
            errors.push(FieldError::new(
                "publication_end_date",
                "The end of publication must come after its start.",
            ));
        }
    }
    if principal.has(Capability::Freeze) {
        cleaned.freeze_date = date_field(submission, "freeze_date", &mut errors);
    }

    if config.tagging {
        cleaned.tags = submission.get("tags").map(split_list);
    }

    if layout.shows_sites() {
        if let Some(raw) = submission.get("sites") {
            let mut sites = Vec::new();
            for item in split_list(raw) {
                match item.parse::<SiteId>() {
                    Ok(site) if config.is_site(site) => sites.push(site),
                    _ => errors.push(FieldError::new(
                        "sites",
                        format!("'{}' is not an available site", item),
                    )),
                }
            }
            cleaned.sites = Some(sites);
        }
    }

    if submission.contains("delegate_to") {
        cleaned.delegate_to = match submission.non_empty("delegate_to") {
            None => Some(None),
            Some(name) if config.delegation_registry.iter().any(|d| d == name) => {
                Some(Some(name.to_string()))
            }
            Some(name) => {
                errors.push(FieldError::new(
                    "delegate_to",
                    format!("'{}' is not a registered application", name),
                ));
                None
            }
        };
    }

    if submission.contains("redirect_to") {
        cleaned.redirect_to = match submission.non_empty("redirect_to") {
            None => Some(None),
            Some(raw) => match raw.parse::<PageId>() {
                Ok(id) => Some(Some(id)),
                Err(_) => {
                    errors.push(FieldError::new("redirect_to", "Select a valid page."));
                    None
                }
            },
        };
    }
    if submission.contains("redirect_to_url") {
        cleaned.redirect_to_url = Some(submission.non_empty("redirect_to_url").map(str::to_string));
    }

    if let (Some(target), Some(position)) =
        (submission.non_empty("target"), submission.non_empty("position"))
    {
        match (target.parse::<PageId>(), TreePosition::parse(position)) {
            (Ok(target), Some(position)) => cleaned.target = Some((target, position)),
            (Err(_), _) => errors.push(FieldError::new("target", "Select a valid page.")),
            (_, None) => errors.push(FieldError::new(
                "position",
                format!("'{}' is not a valid position", position),
            )),
        }
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(errors)
    }
}

fn date_field(
    submission: &PageSubmission,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Option<DateTime<Utc>>> {
    if !submission.contains(name) {
        return None;
    }
    match submission.non_empty(name) {
        None => Some(None),
        Some(raw) => match parse_datetime(raw) {
            Some(date) => Some(Some(date)),
            None => {
                errors.push(FieldError::new(name, "Enter a valid date/time."));
                None
            }
        },
    }
}

/// Validate a document against a JSON Schema, returning every violation
pub fn validate_against_schema(data: &Value, schema: &Value) -> Result<(), Vec<String>> {
    let validator =
        Validator::new(schema).map_err(|e| vec![format!("Invalid JSON Schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|error| format!("{}: {}", error.instance_path, error))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
