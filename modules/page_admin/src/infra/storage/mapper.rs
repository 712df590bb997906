//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{alias, content, page};
use crate::contract::{Content, Page, PageAlias, PageStatus, SiteId};
use anyhow::anyhow;

// ===== Page Conversions =====

impl TryFrom<page::Model> for Page {
    type Error = anyhow::Error;

    fn try_from(entity: page::Model) -> Result<Self, Self::Error> {
        let status = PageStatus::from_code(entity.status)
            .ok_or_else(|| anyhow!("page {} has unknown status code {}", entity.id, entity.status))?;
        let sites: Vec<SiteId> = serde_json::from_value(entity.sites)?;
        let tags: Vec<String> = serde_json::from_value(entity.tags)?;

        Ok(Self {
            id: entity.id,
            parent_id: entity.parent_id,
            position: entity.position,
            level: entity.level,
            author: entity.author,
            status,
            template: entity.template,
            freeze_date: entity.freeze_date,
            publication_date: entity.publication_date,
            publication_end_date: entity.publication_end_date,
            sites,
            tags,
            delegate_to: entity.delegate_to,
            redirect_to: entity.redirect_to,
            redirect_to_url: entity.redirect_to_url,
            creation_date: entity.creation_date,
            last_modification_date: entity.last_modification_date,
        })
    }
}

/// Attribute columns only; the tree columns are written by the repository
impl From<&Page> for page::ActiveModel {
    fn from(model: &Page) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: if model.id > 0 { Unchanged(model.id) } else { NotSet },
            parent_id: NotSet,
            position: NotSet,
            level: NotSet,
            author: Set(model.author.clone()),
            status: Set(model.status.code()),
            template: Set(model.template.clone()),
            freeze_date: Set(model.freeze_date),
            publication_date: Set(model.publication_date),
            publication_end_date: Set(model.publication_end_date),
            sites: Set(serde_json::Value::from(model.sites.clone())),
            tags: Set(serde_json::Value::from(model.tags.clone())),
            delegate_to: Set(model.delegate_to.clone()),
            redirect_to: Set(model.redirect_to),
            redirect_to_url: Set(model.redirect_to_url.clone()),
            creation_date: Set(model.creation_date),
            last_modification_date: Set(model.last_modification_date),
        }
    }
}

// ===== Content Conversions =====

impl From<content::Model> for Content {
    fn from(entity: content::Model) -> Self {
        Self {
            id: entity.id,
            page_id: entity.page_id,
            language: entity.language,
            slot: entity.slot,
            body: entity.body,
            version: entity.version,
            creation_date: entity.creation_date,
        }
    }
}

// ===== Alias Conversions =====

impl From<alias::Model> for PageAlias {
    fn from(entity: alias::Model) -> Self {
        Self {
            id: entity.id,
            page_id: entity.page_id,
            url: entity.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn entity() -> page::Model {
        page::Model {
            id: 7,
            parent_id: Some(1),
            position: 2,
            level: 1,
            author: Some("alice".to_string()),
            status: 1,
            template: None,
            freeze_date: None,
            publication_date: None,
            publication_end_date: None,
            sites: json!([1, 2]),
            tags: json!(["news"]),
            delegate_to: None,
            redirect_to: None,
            redirect_to_url: None,
            creation_date: Utc::now(),
            last_modification_date: Utc::now(),
        }
    }

    #[test]
    fn test_page_from_entity() {
        let page = Page::try_from(entity()).unwrap();
        assert_eq!(page.status, PageStatus::Published);
        assert_eq!(page.sites, vec![1, 2]);
        assert_eq!(page.tags, vec!["news".to_string()]);
        assert_eq!(page.parent_id, Some(1));
    }

    #[test]
    fn test_unknown_status_code_is_an_error() {
        let mut bad = entity();
        bad.status = 42;
        assert!(Page::try_from(bad).is_err());
    }

    #[test]
    fn test_active_model_leaves_tree_columns_alone() {
        let page = Page::try_from(entity()).unwrap();
        let active: page::ActiveModel = (&page).into();
        assert!(active.parent_id.is_not_set());
        assert!(active.position.is_not_set());
        assert_eq!(active.status.clone().unwrap(), 1);
    }
}
