use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pages::ParentId).big_integer())
                    .col(ColumnDef::new(Pages::Position).integer().not_null().default(0))
                    .col(ColumnDef::new(Pages::Level).integer().not_null().default(0))
                    .col(ColumnDef::new(Pages::Author).string())
                    .col(ColumnDef::new(Pages::Status).small_integer().not_null().default(0))
                    .col(ColumnDef::new(Pages::Template).string())
                    .col(ColumnDef::new(Pages::FreezeDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Pages::PublicationDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Pages::PublicationEndDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Pages::Sites).json().not_null())
                    .col(ColumnDef::new(Pages::Tags).json().not_null())
                    .col(ColumnDef::new(Pages::DelegateTo).string())
                    .col(ColumnDef::new(Pages::RedirectTo).big_integer())
                    .col(ColumnDef::new(Pages::RedirectToUrl).string())
                    .col(
                        ColumnDef::new(Pages::CreationDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Pages::LastModificationDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pages_parent")
                            .from(Pages::Table, Pages::ParentId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pages_parent_position")
                    .table(Pages::Table)
                    .col(Pages::ParentId)
                    .col(Pages::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Pages {
    Table,
    Id,
    ParentId,
    Position,
    Level,
    Author,
    Status,
    Template,
    FreezeDate,
    PublicationDate,
    PublicationEndDate,
    Sites,
    Tags,
    DelegateTo,
    RedirectTo,
    RedirectToUrl,
    CreationDate,
    LastModificationDate,
}
