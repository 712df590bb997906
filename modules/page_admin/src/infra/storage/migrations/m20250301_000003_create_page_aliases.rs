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
                    .table(PageAliases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageAliases::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PageAliases::PageId).big_integer().not_null())
                    .col(ColumnDef::new(PageAliases::Url).string().not_null().unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_page_aliases_page")
                            .from(PageAliases::Table, PageAliases::PageId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PageAliases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PageAliases {
    Table,
    Id,
    PageId,
    Url,
}
