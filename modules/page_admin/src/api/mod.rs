//! Transport adapters over the domain service

pub mod native;
pub mod rest;
