// squad-backend/src/domain/mod.rs

pub mod card_model;
pub mod membership_model;
pub mod team_model;
pub mod team_status;
pub mod user_model;
