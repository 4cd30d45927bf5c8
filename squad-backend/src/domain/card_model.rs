// squad-backend/src/domain/card_model.rs
//
// Cards carry a player's visual appearance and performance statistics.
// They are computed elsewhere and are read-only to this service.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub owner_id: Uuid,

    pub display_name: String,

    pub position: String,

    pub rating: i32,

    #[sea_orm(column_type = "JsonBinary")]
    pub visual_dna: Json,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::OwnerId",
        to = "super::user_model::Column::Id"
    )]
    Owner,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
