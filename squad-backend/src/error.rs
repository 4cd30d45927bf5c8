// squad-backend/src/error.rs

use thiserror::Error;
use validator::ValidationErrors;

/// Domain error taxonomy for the team membership service.
///
/// Store-level failures are re-signaled as the kind matching the operation
/// that hit them; raw store errors never cross this boundary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create team: {0}")]
    TeamCreationFailed(String),

    #[error("Failed to assign captain: {0}")]
    CaptainAssignmentFailed(String),

    #[error("Failed to check team name availability: {0}")]
    NameCheckFailed(String),

    #[error("Failed to fetch team roster: {0}")]
    RosterFetchFailed(String),

    #[error("User already belongs to a team")]
    AlreadyOnTeam,

    #[error("Team roster is full")]
    TeamFull,

    #[error("Failed to join team: {0}")]
    JoinFailed(String),

    #[error("Captain cannot leave the team")]
    CaptainCannotLeave,

    #[error("Failed to leave team: {0}")]
    LeaveFailed(String),

    #[error("Insufficient privilege: {0}")]
    InsufficientPrivilege(String),

    #[error("Failed to kick member: {0}")]
    KickFailed(String),

    #[error("Failed to promote member: {0}")]
    PromotionFailed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;
