// squad-backend/src/config.rs
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let database_url = env::var("DATABASE_URL")?;

        Ok(Config { database_url })
    }
}
