//! Infrastructure layer - repository implementations

pub mod memory;
pub mod storage;

pub use memory::{InMemoryAliasStore, InMemoryContentStore, InMemoryPageTree};
