//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod form;
pub mod model;

pub use client::PageAdminApi;
pub use error::PageAdminError;
pub use form::{
    ChangeFormContext, FieldError, FieldType, Fieldset, FormField, FormSchema, PageSubmission,
};
pub use model::{
    AliasId, Capability, Content, ContentFilter, ContentId, ImportReport, Page, PageAlias,
    PageId, PageListing, PageStatus, PageSummary, Principal, RequestContext, SiteId,
    Translation, TreePosition,
};
