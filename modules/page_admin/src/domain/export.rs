//! JSON export and import documents

use crate::contract::{Page, PageAlias, PageId, SiteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Current document format
pub const EXPORT_VERSION: u32 = 1;

/// language -> slot -> latest body
pub type PageContents = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    pub official_language: String,
    pub pages: Vec<ExportedPage>,
}

/// A page with its latest content, parents always listed before children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPage {
    pub id: PageId,
    #[serde(default)]
    pub parent_id: Option<PageId>,
    pub status: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sites: Vec<SiteId>,
    #[serde(default)]
    pub delegate_to: Option<String>,
    #[serde(default)]
    pub redirect_to_url: Option<String>,
    #[serde(default)]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub publication_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub freeze_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    pub contents: PageContents,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ExportedPage {
    pub fn from_page(page: &Page, contents: PageContents, aliases: &[PageAlias]) -> Self {
        Self {
            id: page.id,
            parent_id: page.parent_id,
            status: page.status.as_str().to_string(),
            template: page.template.clone(),
            author: page.author.clone(),
            tags: page.tags.clone(),
            sites: page.sites.clone(),
            delegate_to: page.delegate_to.clone(),
            redirect_to_url: page.redirect_to_url.clone(),
            publication_date: page.publication_date,
            publication_end_date: page.publication_end_date,
            freeze_date: page.freeze_date,
            creation_date: Some(page.creation_date),
            contents,
            aliases: aliases.iter().map(|a| a.url.clone()).collect(),
        }
    }

    pub fn content(&self, language: &str, slot: &str) -> Option<&str> {
        self.contents
            .get(language)
            .and_then(|slots| slots.get(slot))
            .map(String::as_str)
    }
}

/// JSON Schema every import document must satisfy
pub fn import_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["version", "official_language", "pages"],
        "properties": {
            "version": { "type": "integer", "const": EXPORT_VERSION },
            "official_language": { "type": "string", "minLength": 1 },
            "pages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "status", "contents"],
                    "properties": {
                        "id": { "type": "integer" },
                        "parent_id": { "type": ["integer", "null"] },
                        "status": { "enum": ["draft", "published", "expired", "hidden"] },
                        "template": { "type": ["string", "null"] },
                        "author": { "type": ["string", "null"] },
                        "tags": { "type": "array", "items": { "type": "string" } },
                        "sites": { "type": "array", "items": { "type": "integer" } },
                        "delegate_to": { "type": ["string", "null"] },
                        "redirect_to_url": { "type": ["string", "null"] },
                        "publication_date": { "type": ["string", "null"] },
                        "publication_end_date": { "type": ["string", "null"] },
                        "freeze_date": { "type": ["string", "null"] },
                        "creation_date": { "type": ["string", "null"] },
                        "contents": {
                            "type": "object",
                            "additionalProperties": {
                                "type": "object",
                                "additionalProperties": { "type": "string" }
                            }
                        },
                        "aliases": { "type": "array", "items": { "type": "string" } }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::validate_against_schema;

    fn document() -> Value {
        json!({
            "version": 1,
            "official_language": "en",
            "pages": [{
                "id": 10,
                "parent_id": null,
                "status": "published",
                "template": "pages/article.html",
                "contents": { "en": { "title": "Home", "slug": "home" } },
                "aliases": ["/start"]
            }]
        })
    }

    #[test]
    fn test_document_matches_schema_and_parses() {
        let doc = document();
        assert!(validate_against_schema(&doc, &import_schema()).is_ok());

        let parsed: ExportDocument = serde_json::from_value(doc).unwrap();
        assert_eq!(parsed.pages[0].content("en", "title"), Some("Home"));
        assert_eq!(parsed.pages[0].aliases, vec!["/start".to_string()]);
        assert!(parsed.pages[0].tags.is_empty());
    }

    #[test]
    fn test_schema_rejects_bad_status_and_contents() {
        let mut doc = document();
        doc["pages"][0]["status"] = json!("live");
        doc["pages"][0]["contents"]["en"]["title"] = json!(42);
        let errors = validate_against_schema(&doc, &import_schema()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_exported_page_from_page() {
        let mut page = Page::new(Some("alice".to_string()));
        page.id = 3;
        page.tags = vec!["news".to_string()];
        let alias = PageAlias {
            id: 1,
            page_id: 3,
            url: "/news".to_string(),
        };
        let exported = ExportedPage::from_page(&page, PageContents::new(), &[alias]);
        assert_eq!(exported.status, "draft");
        assert_eq!(exported.author.as_deref(), Some("alice"));
        assert_eq!(exported.aliases, vec!["/news".to_string()]);
    }
}
