//! REST API layer

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mapper;
pub mod routes;

pub use routes::{register_routes, PageAdminApiDoc};
