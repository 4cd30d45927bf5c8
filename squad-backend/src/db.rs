// squad-backend/src/db.rs
use crate::config::Config;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_db_pool(config: &Config) -> Result<DbPool, DbErr> {
    Database::connect(&config.database_url).await
}

// 接続オプションを指定するバージョン
pub async fn create_db_pool_with_options(config: &Config) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8 * 60));

    Database::connect(opt).await
}
