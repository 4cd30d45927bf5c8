// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

mod m20260828_000001_create_users_table;
mod m20260828_000002_create_cards_table;
mod m20260828_000003_create_teams_table;
mod m20260828_000004_create_team_members_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. Base tables (no dependencies)
            Box::new(m20260828_000001_create_users_table::Migration),
            // 2. Cards depend on users
            Box::new(m20260828_000002_create_cards_table::Migration),
            // 3. Teams depend on users (captain)
            Box::new(m20260828_000003_create_teams_table::Migration),
            // 4. Memberships depend on teams, users and cards
            Box::new(m20260828_000004_create_team_members_table::Migration),
        ]
    }
}
