//! Common test utilities: a two-language site with an article template

#![allow(dead_code)]

use page_admin::config::{Config, LanguageConfig, PlaceholderConfig, TemplateConfig};
use page_admin::domain::{Service, SlotKind};
use page_admin::{PageAdminModule, PageSubmission, Principal, RequestContext};
use std::sync::Arc;

pub const ARTICLE: &str = "pages/article.html";

pub fn placeholder(name: &str, kind: SlotKind) -> PlaceholderConfig {
    PlaceholderConfig {
        name: name.to_string(),
        kind,
        untranslated: false,
        label: None,
    }
}

/// English (official) and French, default template plus an article template
pub fn test_config() -> Config {
    let mut image = placeholder("image", SlotKind::File);
    image.untranslated = true;
    Config {
        languages: vec![
            LanguageConfig {
                code: "en".to_string(),
                name: "English".to_string(),
            },
            LanguageConfig {
                code: "fr".to_string(),
                name: "French".to_string(),
            },
        ],
        official_language: "en".to_string(),
        templates: vec![TemplateConfig {
            id: ARTICLE.to_string(),
            name: "Article".to_string(),
            placeholders: vec![
                placeholder("body", SlotKind::RichText),
                placeholder("summary", SlotKind::PlainText),
                image,
            ],
            source: None,
        }],
        ..Config::default()
    }
}

pub fn service_with(config: Config) -> Arc<Service> {
    PageAdminModule::in_memory(config)
        .unwrap()
        .service()
}

pub fn test_service() -> Arc<Service> {
    service_with(test_config())
}

pub fn admin() -> RequestContext {
    RequestContext::new(Principal::superuser("admin"))
}

pub fn admin_in(language: &str) -> RequestContext {
    admin().with_language(language)
}

/// Minimal valid submission
pub fn page_form(title: &str, slug: &str) -> PageSubmission {
    PageSubmission::new().with("title", title).with("slug", slug)
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}
