// squad-backend/src/dto/mod.rs

pub mod team_dto;
