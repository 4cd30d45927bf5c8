use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cards::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Cards::DisplayName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cards::Position).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Cards::Rating)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(ColumnDef::new(Cards::VisualDna).json_binary().not_null())
                    .col(
                        ColumnDef::new(Cards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Add foreign key constraints separately
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_cards_owner_id")
                    .from(Cards::Table, Cards::OwnerId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Cards::Table)
                    .name("idx_cards_owner_id")
                    .col(Cards::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cards {
    Table,
    Id,
    OwnerId,
    DisplayName,
    Position,
    Rating,
    VisualDna,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
