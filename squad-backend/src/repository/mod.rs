// squad-backend/src/repository/mod.rs

pub mod in_memory;
pub mod membership_repository;
pub mod team_repository;

use sea_orm::DbErr;
use thiserror::Error;

/// Failure signal of the backing store.
///
/// Repositories express "no matching row" as `Ok(None)`; this error only
/// means the operation itself failed.
#[derive(Error, Debug, Clone)]
#[error("store operation failed: {0}")]
pub struct StoreError(pub String);

pub type StoreResult<T> = Result<T, StoreError>;

// Helper function to convert SeaORM errors to StoreError
pub(crate) fn map_db_error(err: DbErr) -> StoreError {
    StoreError(err.to_string())
}
