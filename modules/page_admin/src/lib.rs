//! Page Admin Module
//!
//! Administration layer of a hierarchical, multi-language page tree.
//! Each page template declares named placeholders; the admin builds the
//! edit form from them and stores every placeholder value as versioned
//! content per page and language.

// Public exports
pub mod contract;
pub use contract::{
    client::PageAdminApi, error::PageAdminError, Capability, ChangeFormContext, Content,
    ContentFilter, FormSchema, Page, PageAlias, PageId, PageStatus, PageSubmission, Principal,
    RequestContext, TreePosition,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::PageAdminModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
