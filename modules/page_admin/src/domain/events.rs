/// Domain events for the page admin
///
/// Published after a mutation has completed:
/// - PageSaved: add or change form saved
/// - PageMoved: tree repositioning
/// - StatusChanged, ContentModified, PagesDeleted

use crate::contract::{PageId, PageStatus, TreePosition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain event types for pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PageEvent {
    PageSaved(PageSavedEvent),
    PageMoved(PageMovedEvent),
    StatusChanged(StatusChangedEvent),
    ContentModified(ContentModifiedEvent),
    PagesDeleted(PagesDeletedEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSavedEvent {
    pub page_id: PageId,
    pub language: String,
    /// Whether this was a create or update
    pub is_new: bool,
    pub timestamp: DateTime<Utc>,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMovedEvent {
    pub page_id: PageId,
    pub target_id: PageId,
    pub position: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangedEvent {
    pub page_id: PageId,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModifiedEvent {
    pub page_id: PageId,
    pub language: String,
    /// None when every slot of the language was deleted
    pub slot: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesDeletedEvent {
    pub page_ids: Vec<PageId>,
    pub timestamp: DateTime<Utc>,
    pub username: String,
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: PageEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: PageEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

impl PageEvent {
    pub fn saved(page_id: PageId, language: &str, is_new: bool, username: &str) -> Self {
        PageEvent::PageSaved(PageSavedEvent {
            page_id,
            language: language.to_string(),
            is_new,
            timestamp: Utc::now(),
            username: username.to_string(),
        })
    }

    pub fn moved(page_id: PageId, target_id: PageId, position: TreePosition) -> Self {
        PageEvent::PageMoved(PageMovedEvent {
            page_id,
            target_id,
            position: position.as_str().to_string(),
            timestamp: Utc::now(),
        })
    }

    pub fn status_changed(page_id: PageId, status: PageStatus, username: &str) -> Self {
        PageEvent::StatusChanged(StatusChangedEvent {
            page_id,
            status: status.as_str().to_string(),
            timestamp: Utc::now(),
            username: username.to_string(),
        })
    }

    pub fn content_modified(page_id: PageId, language: &str, slot: Option<&str>) -> Self {
        PageEvent::ContentModified(ContentModifiedEvent {
            page_id,
            language: language.to_string(),
            slot: slot.map(str::to_string),
            timestamp: Utc::now(),
        })
    }

    pub fn deleted(page_ids: Vec<PageId>, username: &str) -> Self {
        PageEvent::PagesDeleted(PagesDeletedEvent {
            page_ids,
            timestamp: Utc::now(),
            username: username.to_string(),
        })
    }

    pub fn page_id(&self) -> Option<PageId> {
        match self {
            PageEvent::PageSaved(e) => Some(e.page_id),
            PageEvent::PageMoved(e) => Some(e.page_id),
            PageEvent::StatusChanged(e) => Some(e.page_id),
            PageEvent::ContentModified(e) => Some(e.page_id),
            PageEvent::PagesDeleted(e) => e.page_ids.first().copied(),
        }
    }
}
