//! Database migrations for the page admin

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_pages;
mod m20250301_000002_create_page_contents;
mod m20250301_000003_create_page_aliases;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_pages::Migration),
            Box::new(m20250301_000002_create_page_contents::Migration),
            Box::new(m20250301_000003_create_page_aliases::Migration),
        ]
    }
}
