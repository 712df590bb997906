//! Storage layer - database entities and repositories

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;

pub use repositories::{SeaOrmAliasRepository, SeaOrmContentRepository, SeaOrmPageRepository};
