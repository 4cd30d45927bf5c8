// squad-backend/src/domain/membership_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Jersey number assigned to a captain at team creation
pub const CAPTAIN_JERSEY_NUMBER: i32 = 10;

/// チームメンバーシップエンティティ
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    #[sea_orm(nullable)]
    pub jersey_number: Option<i32>,
    #[sea_orm(nullable)]
    pub card_id: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team_model::Entity",
        from = "Column::TeamId",
        to = "super::team_model::Column::Id"
    )]
    Team,
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::UserId",
        to = "super::user_model::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::card_model::Entity",
        from = "Column::CardId",
        to = "super::card_model::Column::Id"
    )]
    Card,
}

impl Related<super::team_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::card_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            joined_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

/// チーム内の役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Captain, // チームキャプテン
    Vice,    // 副キャプテン
    Player,  // 一般プレイヤー
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Captain => write!(f, "captain"),
            MemberRole::Vice => write!(f, "vice"),
            MemberRole::Player => write!(f, "player"),
        }
    }
}

impl std::str::FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "captain" => Ok(MemberRole::Captain),
            "vice" => Ok(MemberRole::Vice),
            "player" => Ok(MemberRole::Player),
            _ => Err(format!("Invalid member role: {}", s)),
        }
    }
}

impl MemberRole {
    /// Check if role can manage the roster (kick, promote)
    pub fn can_manage_roster(&self) -> bool {
        matches!(self, MemberRole::Captain)
    }

    /// Check if role is allowed to leave the team
    pub fn can_leave(&self) -> bool {
        !matches!(self, MemberRole::Captain)
    }
}

impl Model {
    /// キャプテンメンバーシップを作成（背番号10）
    pub fn new_captain(team_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            role: MemberRole::Captain.to_string(),
            jersey_number: Some(CAPTAIN_JERSEY_NUMBER),
            card_id: None,
            joined_at: Utc::now(),
        }
    }

    /// 一般プレイヤーメンバーシップを作成
    pub fn new_player(team_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            role: MemberRole::Player.to_string(),
            jersey_number: None,
            card_id: None,
            joined_at: Utc::now(),
        }
    }

    /// 役割を取得
    pub fn get_role(&self) -> MemberRole {
        self.role.parse().unwrap_or(MemberRole::Player)
    }

    pub fn is_captain(&self) -> bool {
        self.get_role() == MemberRole::Captain
    }
}
