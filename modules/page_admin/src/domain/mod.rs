//! Domain layer - business logic and services

pub mod cache;
pub mod default_content;
pub mod events;
pub mod export;
pub mod form;
pub mod language;
pub mod placeholders;
pub mod repository;
pub mod service;
pub mod tree;
pub mod validation;

pub use cache::{InMemoryPageCache, PageCache};
pub use events::{EventPublisher, NoOpEventPublisher, PageEvent};
pub use form::FieldLayout;
pub use placeholders::{PlaceholderRegistry, SlotDescriptor, SlotKind};
pub use repository::{AliasRepository, ContentRepository, PageRepository};
pub use service::{AdminSettings, Service};
