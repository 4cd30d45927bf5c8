// squad-backend/src/service/mod.rs

pub mod team_service;
