//! Placeholder registry: the named content slots each template declares

use super::repository::ContentRepository;
use crate::config::{Config, PlaceholderConfig};
use crate::contract::{FieldType, FormField, PageId, PageSubmission};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Slots every template has, in this order
pub const MANDATORY_SLOTS: [&str; 2] = ["title", "slug"];

/// Reserved slot names of the metadata fields
pub const METADATA_SLOTS: [&str; 6] = [
    "meta_title",
    "meta_description",
    "meta_keywords",
    "meta_author",
    "fb_page_type",
    "fb_image",
];

/// Maximum `{% extends %}` chain length
const MAX_EXTENDS_DEPTH: usize = 32;

pub fn is_mandatory(name: &str) -> bool {
    MANDATORY_SLOTS.contains(&name)
}

pub fn is_metadata(name: &str) -> bool {
    METADATA_SLOTS.contains(&name)
}

/// Error type for registry construction
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Template source not found: {0}")]
    SourceNotFound(String),

    #[error("Template '{0}' extends itself through {1}")]
    ExtendsCycle(String, String),

    #[error("Template '{0}' exceeds the maximum extends depth")]
    ExtendsTooDeep(String),

    #[error("Slot name '{slot}' in template '{template}' is reserved for metadata")]
    ReservedName { template: String, slot: String },
}

/// Kind of content a slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    #[default]
    PlainText,
    RichText,
    File,
    /// Overwritten in place instead of versioned
    Metadata,
}

/// Auxiliary data submitted next to a slot value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuxiliaryData {
    /// Pointer to a freshly uploaded file
    Upload(String),
    /// Clear the stored file
    Clear,
}

/// A named content slot of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub name: String,
    pub kind: SlotKind,
    /// Stored once under the official language
    pub untranslated: bool,
    pub label: Option<String>,
}

impl SlotDescriptor {
    pub fn new(name: impl Into<String>, kind: SlotKind) -> Self {
        Self {
            name: name.into(),
            kind,
            untranslated: false,
            label: None,
        }
    }

    pub fn untranslated(mut self) -> Self {
        self.untranslated = true;
        self
    }

    pub fn metadata(name: impl Into<String>) -> Self {
        Self::new(name, SlotKind::Metadata)
    }

    pub fn is_mandatory(&self) -> bool {
        is_mandatory(&self.name)
    }

    /// Language the slot is stored and read under
    pub fn storage_language<'a>(&self, language: &'a str, official: &'a str) -> &'a str {
        if self.untranslated {
            official
        } else {
            language
        }
    }

    pub fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| humanize(&self.name))
    }

    /// Form field editing this slot
    pub fn render_field(&self, existing: Option<String>) -> FormField {
        let field_type = match self.kind {
            SlotKind::PlainText => FieldType::Text,
            SlotKind::RichText => FieldType::RichText,
            SlotKind::File => FieldType::File,
            SlotKind::Metadata if self.name.ends_with("description")
                || self.name.ends_with("keywords") =>
            {
                FieldType::TextArea
            }
            SlotKind::Metadata => FieldType::Text,
        };
        let field = FormField::new(&self.name, self.label(), field_type).with_initial(existing);
        if self.is_mandatory() {
            field.required()
        } else if self.untranslated {
            field.with_help_text("Shared by every language")
        } else {
            field
        }
    }

    /// Auxiliary data submitted next to the slot value
    pub fn extract_auxiliary(&self, submission: &PageSubmission) -> Option<AuxiliaryData> {
        match self.kind {
            SlotKind::File => {
                if let Some(upload) = submission.non_empty(&format!("{}-upload", self.name)) {
                    return Some(AuxiliaryData::Upload(upload.to_string()));
                }
                match submission.non_empty(&format!("{}-clear", self.name)) {
                    Some("on") | Some("true") | Some("1") => Some(AuxiliaryData::Clear),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Store a submitted value; returns false when nothing was written
    pub async fn persist(
        &self,
        store: &dyn ContentRepository,
        page_id: PageId,
        language: &str,
        value: &str,
        is_update: bool,
        extra: Option<&AuxiliaryData>,
    ) -> anyhow::Result<bool> {
        match self.kind {
            SlotKind::Metadata => {
                store
                    .set_or_create_content(page_id, language, &self.name, value)
                    .await?;
                Ok(true)
            }
            SlotKind::File => {
                let body = match extra {
                    Some(AuxiliaryData::Upload(pointer)) => pointer.as_str(),
                    Some(AuxiliaryData::Clear) => "",
                    // An update without a new upload keeps the stored file
                    None if is_update && value.trim().is_empty() => return Ok(false),
                    None => value,
                };
                store
                    .create_content_if_changed(page_id, language, &self.name, body)
                    .await?;
                Ok(true)
            }
            SlotKind::PlainText | SlotKind::RichText => {
                store
                    .create_content_if_changed(page_id, language, &self.name, value)
                    .await?;
                Ok(true)
            }
        }
    }

    fn from_config(config: &PlaceholderConfig) -> Self {
        Self {
            name: config.name.clone(),
            kind: config.kind,
            untranslated: config.untranslated,
            label: config.label.clone(),
        }
    }
}

/// "meta_description" -> "Meta description"
fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Source of template text for placeholder scanning
pub trait TemplateLoader: Send + Sync {
    fn load(&self, name: &str) -> Option<String>;
}

/// Loads templates from the configured directories
#[derive(Debug, Clone, Default)]
pub struct FsTemplateLoader {
    dirs: Vec<PathBuf>,
}

impl FsTemplateLoader {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl TemplateLoader for FsTemplateLoader {
    fn load(&self, name: &str) -> Option<String> {
        self.dirs
            .iter()
            .map(|dir| dir.join(name))
            .find_map(|path| std::fs::read_to_string(path).ok())
    }
}

impl TemplateLoader for HashMap<String, String> {
    fn load(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn placeholder_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(
            r#"\{%\s*(placeholder|imageplaceholder|fileplaceholder)\s+"?([\w-]+)"?([^%]*)%\}"#,
        )
        .unwrap_or_else(|e| unreachable!("placeholder tag pattern: {e}"))
    })
}

fn extends_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r#"\{%\s*extends\s+["']([^"']+)["']\s*%\}"#)
            .unwrap_or_else(|e| unreachable!("extends tag pattern: {e}"))
    })
}

/// Placeholders declared by a template source, parents first
pub fn scan_template(
    name: &str,
    loader: &dyn TemplateLoader,
) -> Result<Vec<SlotDescriptor>, RegistryError> {
    let mut chain = Vec::new();
    let mut current = name.to_string();
    loop {
        if chain.contains(&current) {
            return Err(RegistryError::ExtendsCycle(name.to_string(), current));
        }
        if chain.len() >= MAX_EXTENDS_DEPTH {
            return Err(RegistryError::ExtendsTooDeep(name.to_string()));
        }
        let source = loader
            .load(&current)
            .ok_or_else(|| RegistryError::SourceNotFound(current.clone()))?;
        chain.push(current.clone());
        match extends_tag().captures(&source) {
            Some(parent) => current = parent[1].to_string(),
            None => break,
        }
    }

    let mut slots: Vec<SlotDescriptor> = Vec::new();
    for template in chain.iter().rev() {
        let source = loader
            .load(template)
            .ok_or_else(|| RegistryError::SourceNotFound(template.clone()))?;
        for tag in placeholder_tag().captures_iter(&source) {
            let slot_name = &tag[2];
            if slots.iter().any(|s| s.name == slot_name) {
                continue;
            }
            let options = &tag[3];
            let kind = match &tag[1] {
                "imageplaceholder" | "fileplaceholder" => SlotKind::File,
                _ if options.contains("RichTextarea") || options.contains("Textarea") => {
                    SlotKind::RichText
                }
                _ => SlotKind::PlainText,
            };
            let mut slot = SlotDescriptor::new(slot_name, kind);
            slot.untranslated = options.split_whitespace().any(|w| w == "untranslated");
            slots.push(slot);
        }
    }
    Ok(slots)
}

/// Ordered slot sets per template, built once at startup
#[derive(Debug, Clone)]
pub struct PlaceholderRegistry {
    default_template: String,
    templates: HashMap<String, Vec<SlotDescriptor>>,
    metadata: Vec<SlotDescriptor>,
}

impl PlaceholderRegistry {
    pub fn from_config(
        config: &Config,
        loader: &dyn TemplateLoader,
    ) -> Result<Self, RegistryError> {
        let mut templates = HashMap::new();
        for template in &config.templates {
            let mut declared: Vec<SlotDescriptor> = match &template.source {
                Some(source) => scan_template(source, loader)?,
                None => Vec::new(),
            };
            for placeholder in &template.placeholders {
                let slot = SlotDescriptor::from_config(placeholder);
                match declared.iter_mut().find(|s| s.name == slot.name) {
                    Some(existing) => *existing = slot,
                    None => declared.push(slot),
                }
            }
            if let Some(reserved) = declared.iter().find(|s| is_metadata(&s.name)) {
                return Err(RegistryError::ReservedName {
                    template: template.id.clone(),
                    slot: reserved.name.clone(),
                });
            }
            templates.insert(template.id.clone(), with_mandatory(declared));
        }
        templates
            .entry(config.default_template.clone())
            .or_insert_with(|| with_mandatory(Vec::new()));

        tracing::debug!(templates = templates.len(), "placeholder registry built");
        Ok(Self {
            default_template: config.default_template.clone(),
            templates,
            metadata: METADATA_SLOTS
                .iter()
                .map(|name| SlotDescriptor::metadata(*name))
                .collect(),
        })
    }

    /// Ordered slots of a template; unknown templates use the default template
    pub fn slots_for(&self, template_id: &str) -> &[SlotDescriptor] {
        if let Some(slots) = self.templates.get(template_id) {
            return slots;
        }
        tracing::warn!(
            template = template_id,
            fallback = %self.default_template,
            "unknown template, using default template slots"
        );
        self.templates
            .get(&self.default_template)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn knows(&self, template_id: &str) -> bool {
        self.templates.contains_key(template_id)
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    /// Fixed metadata fields, independent of templates
    pub fn metadata_slots(&self) -> &[SlotDescriptor] {
        &self.metadata
    }
}

fn with_mandatory(declared: Vec<SlotDescriptor>) -> Vec<SlotDescriptor> {
    let mut slots: Vec<SlotDescriptor> = MANDATORY_SLOTS
        .iter()
        .map(|name| {
            declared
                .iter()
                .find(|s| s.name == *name)
                .cloned()
                .map(|mut s| {
                    s.untranslated = false;
                    s
                })
                .unwrap_or_else(|| SlotDescriptor::new(*name, SlotKind::PlainText))
        })
        .collect();
    let seen: HashSet<&str> = MANDATORY_SLOTS.iter().copied().collect();
    slots.extend(
        declared
            .into_iter()
            .filter(|s| !seen.contains(s.name.as_str())),
    );
    slots
}
