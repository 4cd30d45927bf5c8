use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teams::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Teams::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Teams::CaptainId).uuid().not_null())
                    .col(ColumnDef::new(Teams::ZoneId).integer().not_null())
                    .col(ColumnDef::new(Teams::LogoDna).json_binary().not_null())
                    .col(
                        ColumnDef::new(Teams::TotalMatches)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Teams::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Teams::CreatedAt)
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
                    .name("fk_teams_captain_id")
                    .from(Teams::Table, Teams::CaptainId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Name uniqueness is scoped to the zone; this index is the
        // authoritative backstop for the service's check-then-create gap
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Teams::Table)
                    .name("idx_teams_name_zone_unique")
                    .col(Teams::Name)
                    .col(Teams::ZoneId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Teams::Table)
                    .name("idx_teams_zone_id")
                    .col(Teams::ZoneId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Teams::Table)
                    .name("idx_teams_captain_id")
                    .col(Teams::CaptainId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    CaptainId,
    ZoneId,
    LogoDna,
    TotalMatches,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
