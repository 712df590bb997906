//! Dynamic form builder
//!
//! The base fields depend only on the configuration and are computed once
//! into a [`FieldLayout`]. Slot fields are generated per request from the
//! template's placeholders.

use super::placeholders::SlotDescriptor;
use crate::config::Config;
use crate::contract::{
    Capability, FieldType, Fieldset, FormField, FormSchema, Page, PageStatus, Principal,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub const GENERAL_FIELDSET: &str = "General";
pub const OPTIONS_FIELDSET: &str = "Options";
pub const METADATA_FIELDSET: &str = "Metadata";
pub const CONTENT_FIELDSET: &str = "Content";

/// Label of the default template choice
pub const DEFAULT_TEMPLATE_LABEL: &str = "Default template";

/// Existing slot values keyed by slot name
pub type SlotValues = HashMap<String, Option<String>>;

/// Base form fields for the active configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    /// General fieldset, title and slug included
    general: Vec<FormField>,
    options: Vec<FormField>,
    shows_sites: bool,
}

impl FieldLayout {
    pub fn from_config(config: &Config) -> Self {
        let mut general = vec![
            FormField::new("title", "Title", FieldType::Text).required(),
            FormField::new("slug", "Slug", FieldType::Text)
                .required()
                .with_help_text("The slug will be used to create the page URL."),
            FormField::new(
                "status",
                "Status",
                FieldType::Select {
                    choices: PageStatus::ALL
                        .iter()
                        .map(|s| (s.as_str().to_string(), capitalize(s.as_str())))
                        .collect(),
                },
            ),
        ];
        if config.show_start_date {
            general.push(
                FormField::new("publication_date", "Publication date", FieldType::DateTime)
                    .with_help_text("When the page should go live, leave blank to publish now."),
            );
        }
        if config.show_end_date {
            general.push(
                FormField::new("publication_end_date", "Publication end date", FieldType::DateTime)
                    .with_help_text("When to expire the page, leave blank to keep it published."),
            );
        }
        if config.tagging {
            general.push(
                FormField::new("tags", "Tags", FieldType::Text)
                    .with_help_text("Comma separated list of tags."),
            );
        }
        general.push(FormField::new("target", "Target", FieldType::Hidden));
        general.push(FormField::new("position", "Position", FieldType::Hidden));
        general.push(
            FormField::new("freeze_date", "Freeze date", FieldType::DateTime).with_help_text(
                "Don't publish any content after this date. Format is 'Y-m-d H:M:S'.",
            ),
        );

        let shows_sites = config.use_site_id && !config.hide_sites;
        if shows_sites {
            let mut choices: Vec<(String, String)> = Vec::new();
            if !config.sites.iter().any(|s| s.id == config.site_id) {
                choices.push((config.site_id.to_string(), format!("Site {}", config.site_id)));
            }
            choices.extend(config.sites.iter().map(|s| (s.id.to_string(), s.domain.clone())));
            general.push(FormField::new(
                "sites",
                "Sites",
                FieldType::MultiSelect { choices },
            ));
        }
        if !config.delegation_registry.is_empty() {
            let choices = std::iter::once((String::new(), "---------".to_string()))
                .chain(
                    config
                        .delegation_registry
                        .iter()
                        .map(|name| (name.clone(), name.clone())),
                )
                .collect();
            general.push(
                FormField::new("delegate_to", "Delegate to", FieldType::Select { choices })
                    .with_help_text("Delegate the rest of the URL to this application."),
            );
        }

        let mut options = vec![FormField::new(
            "language",
            "Language",
            FieldType::Select {
                choices: config
                    .languages
                    .iter()
                    .map(|l| (l.code.clone(), l.name.clone()))
                    .collect(),
            },
        )];
        if !config.templates.is_empty() {
            let mut choices = vec![(
                config.default_template.clone(),
                DEFAULT_TEMPLATE_LABEL.to_string(),
            )];
            choices.extend(
                config
                    .templates
                    .iter()
                    .filter(|t| t.id != config.default_template)
                    .map(|t| (t.id.clone(), t.name.clone())),
            );
            options.push(FormField::new(
                "template",
                "Template",
                FieldType::Select { choices },
            ));
        }
        options.push(
            FormField::new("redirect_to", "Redirect to", FieldType::Text)
                .with_help_text("Redirect this page to another page."),
        );
        options.push(
            FormField::new("redirect_to_url", "Redirect to URL", FieldType::Text)
                .with_help_text("Redirect this page to an external URL."),
        );

        Self {
            general,
            options,
            shows_sites,
        }
    }

    pub fn shows_sites(&self) -> bool {
        self.shows_sites
    }

    pub fn general_field_names(&self) -> Vec<&str> {
        self.general.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn option_field_names(&self) -> Vec<&str> {
        self.options.iter().map(|f| f.name.as_str()).collect()
    }

    /// Build the request-time form
    ///
    /// `slots` are the template slots (title and slug first), `values` the
    /// existing values already read in the right storage language.
    pub fn build_form(
        &self,
        page: Option<&Page>,
        language: &str,
        template: &str,
        slots: &[SlotDescriptor],
        metadata: &[SlotDescriptor],
        values: &SlotValues,
    ) -> FormSchema {
        let mut form = FormSchema::default();
        let existing = |name: &str| values.get(name).cloned().flatten();

        for field in &self.general {
            let initial = match field.name.as_str() {
                "title" | "slug" => existing(&field.name),
                name => base_initial(name, page),
            };
            form.insert(field.clone().with_initial(initial));
        }
        for field in &self.options {
            let initial = match field.name.as_str() {
                "language" => Some(language.to_string()),
                "template" => Some(template.to_string()),
                name => base_initial(name, page),
            };
            form.insert(field.clone().with_initial(initial));
        }

        // Slot widgets replace the generic title and slug fields
        for slot in slots.iter().filter(|s| s.is_mandatory()) {
            let mut field = slot.render_field(existing(&slot.name));
            if let Some(base) = form.field(&slot.name) {
                field.help_text = field.help_text.or_else(|| base.help_text.clone());
            }
            form.insert(field);
        }

        let metadata_names: Vec<String> = metadata.iter().map(|s| s.name.clone()).collect();
        for slot in metadata {
            form.insert(slot.render_field(existing(&slot.name)));
        }

        let mut content_names = Vec::new();
        for slot in slots.iter().filter(|s| !s.is_mandatory()) {
            form.insert(slot.render_field(existing(&slot.name)));
            content_names.push(slot.name.clone());
        }

        form.fieldsets = vec![
            Fieldset::new(GENERAL_FIELDSET, &[], owned(self.general_field_names())),
            Fieldset::new(OPTIONS_FIELDSET, &["collapse"], owned(self.option_field_names())),
            Fieldset::new(METADATA_FIELDSET, &["collapse"], metadata_names),
        ];
        if !content_names.is_empty() {
            form.fieldsets
                .push(Fieldset::new(CONTENT_FIELDSET, &[], content_names));
        }
        form
    }
}

/// Remove the fields the editor is not allowed to change
pub fn trim_for_principal(form: &mut FormSchema, principal: &Principal) {
    if !principal.has(Capability::Freeze) {
        form.remove("freeze_date");
    }
    if !principal.has(Capability::Publish) {
        form.remove("status");
    }
}

fn base_initial(name: &str, page: Option<&Page>) -> Option<String> {
    let Some(page) = page else {
        return match name {
            "status" => Some(PageStatus::default().as_str().to_string()),
            _ => None,
        };
    };
    match name {
        "status" => Some(page.status.as_str().to_string()),
        "publication_date" => page.publication_date.map(format_datetime),
        "publication_end_date" => page.publication_end_date.map(format_datetime),
        "freeze_date" => page.freeze_date.map(format_datetime),
        "tags" if !page.tags.is_empty() => Some(page.tags.join(", ")),
        "sites" if !page.sites.is_empty() => Some(
            page.sites
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        "delegate_to" => page.delegate_to.clone(),
        "redirect_to" => page.redirect_to.map(|id| id.to_string()),
        "redirect_to_url" => page.redirect_to_url.clone(),
        _ => None,
    }
}

pub fn format_datetime(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SiteConfig, TemplateConfig};
    use crate::domain::placeholders::{SlotKind, METADATA_SLOTS};

    fn slots() -> Vec<SlotDescriptor> {
        vec![
            SlotDescriptor::new("title", SlotKind::PlainText),
            SlotDescriptor::new("slug", SlotKind::PlainText),
            SlotDescriptor::new("body", SlotKind::RichText),
            SlotDescriptor::new("banner", SlotKind::File).untranslated(),
        ]
    }

    fn metadata() -> Vec<SlotDescriptor> {
        METADATA_SLOTS.iter().map(|n| SlotDescriptor::metadata(*n)).collect()
    }

    fn template(id: &str, name: &str) -> TemplateConfig {
        TemplateConfig {
            id: id.to_string(),
            name: name.to_string(),
            placeholders: Vec::new(),
            source: None,
        }
    }

    #[test]
    fn test_default_general_fields() {
        let layout = FieldLayout::from_config(&Config::default());
        assert_eq!(
            layout.general_field_names(),
            vec![
                "title",
                "slug",
                "status",
                "publication_date",
                "publication_end_date",
                "tags",
                "target",
                "position",
                "freeze_date",
            ]
        );
        assert_eq!(
            layout.option_field_names(),
            vec!["language", "redirect_to", "redirect_to_url"]
        );
    }

    #[test]
    fn test_layout_follows_configuration() {
        let config = Config {
            show_start_date: false,
            show_end_date: false,
            tagging: false,
            use_site_id: true,
            sites: vec![SiteConfig {
                id: 1,
                domain: "example.com".to_string(),
            }],
            delegation_registry: vec!["blog".to_string()],
            templates: vec![template("pages/article.html", "Article")],
            ..Config::default()
        };
        let layout = FieldLayout::from_config(&config);
        assert_eq!(
            layout.general_field_names(),
            vec!["title", "slug", "status", "target", "position", "freeze_date", "sites", "delegate_to"]
        );
        assert_eq!(
            layout.option_field_names(),
            vec!["language", "template", "redirect_to", "redirect_to_url"]
        );

        let hidden = Config {
            hide_sites: true,
            ..config
        };
        assert!(!FieldLayout::from_config(&hidden).general_field_names().contains(&"sites"));
    }

    #[test]
    fn test_template_choices_start_with_default() {
        let config = Config {
            templates: vec![
                template("pages/article.html", "Article"),
                template("pages/default.html", "Plain"),
            ],
            ..Config::default()
        };
        let form = FieldLayout::from_config(&config).build_form(
            None,
            "en-us",
            "pages/article.html",
            &slots(),
            &metadata(),
            &SlotValues::new(),
        );
        let field = form.field("template").unwrap();
        match &field.field_type {
            FieldType::Select { choices } => {
                assert_eq!(choices[0].0, "pages/default.html");
                assert_eq!(choices[0].1, DEFAULT_TEMPLATE_LABEL);
                assert_eq!(choices.len(), 2);
            }
            other => panic!("unexpected field type {:?}", other),
        }
        assert_eq!(field.initial.as_deref(), Some("pages/article.html"));
    }

    #[test]
    fn test_build_form_fieldsets_and_initials() {
        let layout = FieldLayout::from_config(&Config::default());
        let mut page = Page::new(Some("alice".to_string()));
        page.status = PageStatus::Published;
        page.tags = vec!["a".to_string(), "b".to_string()];

        let mut values = SlotValues::new();
        values.insert("title".to_string(), Some("Hello".to_string()));
        values.insert("slug".to_string(), None);
        values.insert("body".to_string(), Some("<p>Hi</p>".to_string()));
        values.insert("meta_title".to_string(), Some("Meta".to_string()));

        let form = layout.build_form(
            Some(&page),
            "en-us",
            "pages/default.html",
            &slots(),
            &metadata(),
            &values,
        );

        assert_eq!(form.initial("title"), Some("Hello"));
        assert_eq!(form.initial("slug"), None);
        assert_eq!(form.initial("status"), Some("published"));
        assert_eq!(form.initial("tags"), Some("a, b"));
        assert_eq!(form.initial("language"), Some("en-us"));
        assert_eq!(form.initial("body"), Some("<p>Hi</p>"));
        assert_eq!(form.initial("meta_title"), Some("Meta"));
        assert_eq!(form.initial("meta_author"), None);
        assert!(form.field("title").unwrap().required);
        assert_eq!(form.field("banner").unwrap().field_type, FieldType::File);

        let names: Vec<&str> = form.fieldsets.iter().map(|fs| fs.name.as_str()).collect();
        assert_eq!(names, vec!["General", "Options", "Metadata", "Content"]);
        assert_eq!(form.fieldset("Content").unwrap().fields, vec!["body", "banner"]);
        assert_eq!(form.fieldset("Metadata").unwrap().fields.len(), 6);
    }

    #[test]
    fn test_trim_for_principal() {
        let layout = FieldLayout::from_config(&Config::default());
        let build = || {
            layout.build_form(None, "en-us", "pages/default.html", &slots(), &metadata(), &SlotValues::new())
        };

        let mut form = build();
        trim_for_principal(&mut form, &Principal::new("bob"));
        assert!(!form.contains("status"));
        assert!(!form.contains("freeze_date"));
        assert!(!form.fieldset("General").unwrap().fields.contains(&"status".to_string()));

        let mut form = build();
        trim_for_principal(&mut form, &Principal::superuser("root"));
        assert!(form.contains("status"));
        assert!(form.contains("freeze_date"));
    }
}
