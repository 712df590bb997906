use super::m20250301_000001_create_pages::Pages;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PageContents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageContents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PageContents::PageId).big_integer().not_null())
                    .col(ColumnDef::new(PageContents::Language).string_len(16).not_null())
                    .col(ColumnDef::new(PageContents::Slot).string_len(100).not_null())
                    .col(ColumnDef::new(PageContents::Body).text().not_null())
                    .col(ColumnDef::new(PageContents::Version).integer().not_null())
                    .col(
                        ColumnDef::new(PageContents::CreationDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_page_contents_page")
                            .from(PageContents::Table, PageContents::PageId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_page_contents_version")
                    .table(PageContents::Table)
                    .col(PageContents::PageId)
                    .col(PageContents::Language)
                    .col(PageContents::Slot)
                    .col(PageContents::Version)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PageContents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PageContents {
    Table,
    Id,
    PageId,
    Language,
    Slot,
    Body,
    Version,
    CreationDate,
}
