//! Contract models for the page admin
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

pub type PageId = i64;
pub type ContentId = i64;
pub type AliasId = i64;
pub type SiteId = i64;

/// Publication status of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Expired,
    Hidden,
}

impl PageStatus {
    pub const ALL: [PageStatus; 4] = [
        PageStatus::Draft,
        PageStatus::Published,
        PageStatus::Expired,
        PageStatus::Hidden,
    ];

    /// Stored representation
    pub fn code(self) -> i16 {
        match self {
            PageStatus::Draft => 0,
            PageStatus::Published => 1,
            PageStatus::Expired => 2,
            PageStatus::Hidden => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(PageStatus::Draft),
            1 => Some(PageStatus::Published),
            2 => Some(PageStatus::Expired),
            3 => Some(PageStatus::Hidden),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Expired => "expired",
            PageStatus::Hidden => "hidden",
        }
    }

    /// Accepts the textual name or the numeric code
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(code) = value.parse::<i16>() {
            return Self::from_code(code);
        }
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

/// A node of the page tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    /// Parent page, None for root pages
    pub parent_id: Option<PageId>,
    /// Ordering among siblings, zero based
    pub position: i32,
    /// Depth in the tree, root pages are at level 0
    pub level: i32,
    /// Username of the editor who created the page
    pub author: Option<String>,
    pub status: PageStatus,
    /// Assigned template, None means "inherit from ancestor"
    pub template: Option<String>,
    pub freeze_date: Option<DateTime<Utc>>,
    pub publication_date: Option<DateTime<Utc>>,
    pub publication_end_date: Option<DateTime<Utc>>,
    /// Sites the page is visible on (multi-site deployments)
    pub sites: Vec<SiteId>,
    pub tags: Vec<String>,
    /// Name of a URL-delegation registry entry
    pub delegate_to: Option<String>,
    pub redirect_to: Option<PageId>,
    pub redirect_to_url: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub last_modification_date: DateTime<Utc>,
}

impl Page {
    /// A page that has not been stored yet
    pub fn new(author: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            parent_id: None,
            position: 0,
            level: 0,
            author,
            status: PageStatus::Draft,
            template: None,
            freeze_date: None,
            publication_date: None,
            publication_end_date: None,
            sites: Vec::new(),
            tags: Vec::new(),
            delegate_to: None,
            redirect_to: None,
            redirect_to_url: None,
            creation_date: now,
            last_modification_date: now,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// One version of a placeholder value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub id: ContentId,
    pub page_id: PageId,
    pub language: String,
    /// Placeholder (slot) name
    pub slot: String,
    pub body: String,
    /// 1-based version counter per (page, language, slot)
    pub version: i32,
    pub creation_date: DateTime<Utc>,
}

/// Alternate URL of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAlias {
    pub id: AliasId,
    pub page_id: PageId,
    pub url: String,
}

/// Where to place a page relative to a target page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreePosition {
    FirstChild,
    LastChild,
    Left,
    Right,
}

impl TreePosition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "first-child" => Some(TreePosition::FirstChild),
            "last-child" => Some(TreePosition::LastChild),
            "left" => Some(TreePosition::Left),
            "right" => Some(TreePosition::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TreePosition::FirstChild => "first-child",
            TreePosition::LastChild => "last-child",
            TreePosition::Left => "left",
            TreePosition::Right => "right",
        }
    }

    /// The page that becomes the parent after the move
    pub fn new_parent(self, target: &Page) -> Option<PageId> {
        match self {
            TreePosition::FirstChild | TreePosition::LastChild => Some(target.id),
            TreePosition::Left | TreePosition::Right => target.parent_id,
        }
    }
}

/// Capability checked per admin operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    AddPage,
    ChangePage,
    DeletePage,
    Publish,
    Freeze,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::AddPage => "add_page",
            Capability::ChangePage => "change_page",
            Capability::DeletePage => "delete_page",
            Capability::Publish => "can_publish",
            Capability::Freeze => "can_freeze",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            Capability::AddPage,
            Capability::ChangePage,
            Capability::DeletePage,
            Capability::Publish,
            Capability::Freeze,
        ]
        .into_iter()
        .find(|cap| cap.as_str() == value.trim())
    }
}

/// Authenticated editor as seen by the admin
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Principal {
    pub username: String,
    pub capabilities: HashSet<Capability>,
}

impl Principal {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            capabilities: HashSet::new(),
        }
    }

    /// Editor holding every capability
    pub fn superuser(username: impl Into<String>) -> Self {
        Self::new(username)
            .with(Capability::AddPage)
            .with(Capability::ChangePage)
            .with(Capability::DeletePage)
            .with(Capability::Publish)
            .with(Capability::Freeze)
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Per-request inputs the admin needs besides the operation arguments
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub principal: Principal,
    /// `language` query parameter
    pub query_language: Option<String>,
    /// Language remembered in the editor session
    pub session_language: Option<String>,
    /// `template` request parameter, previews a template switch
    pub template: Option<String>,
}

impl RequestContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.query_language = Some(language.into());
        self
    }
}

/// Criteria for the content listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub page_id: Option<PageId>,
    pub language: Option<String>,
    pub slot: Option<String>,
    /// Case-insensitive substring of the body
    pub body_contains: Option<String>,
}

/// A page as shown in the change list and sub-menus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub page: Page,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub children_count: usize,
    /// Languages in which the page has a title
    pub languages: Vec<String>,
}

/// Result of the change list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageListing {
    pub language: String,
    pub query: String,
    pub can_publish: bool,
    pub pages: Vec<PageSummary>,
}

/// Side-by-side view of a page in the active language and another one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub page_id: PageId,
    pub language: String,
    pub target_language: String,
    /// (slot, value in active language, value in target language)
    pub slots: Vec<(String, Option<String>, Option<String>)>,
}

/// Outcome of a JSON import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: Vec<PageId>,
    /// Alias urls that already existed and were left untouched
    pub skipped_aliases: Vec<String>,
}
