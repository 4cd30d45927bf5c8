// squad-backend/src/domain/team_model.rs

use super::team_status::TeamStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Hard cap on memberships per team
pub const MAX_TEAM_MEMBERS: u64 = 16;

/// Membership count at which a draft team becomes active
pub const ACTIVATION_MEMBER_COUNT: u64 = 5;

/// チームエンティティ
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub captain_id: Uuid,
    pub zone_id: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub logo_dna: Json,
    pub total_matches: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::CaptainId",
        to = "super::user_model::Column::Id"
    )]
    Captain,
    #[sea_orm(has_many = "super::membership_model::Entity")]
    TeamMembers,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Captain.def()
    }
}

impl Related<super::membership_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    /// 新しいチームを作成（ドラフト状態、試合数ゼロ）
    pub fn new_team(name: String, zone_id: i32, captain_id: Uuid, logo_dna: Json) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            captain_id,
            zone_id,
            logo_dna,
            total_matches: 0,
            status: TeamStatus::Draft.to_string(),
            created_at: Utc::now(),
        }
    }

    /// ステータスを取得
    pub fn get_status(&self) -> TeamStatus {
        self.status.parse().unwrap_or(TeamStatus::Draft)
    }

    pub fn is_active(&self) -> bool {
        self.get_status().is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_team_creation_defaults() {
        let captain_id = Uuid::new_v4();
        let team = Model::new_team(
            "Falcons".to_string(),
            3,
            captain_id,
            json!({"base": 1, "accent": "red"}),
        );

        assert_eq!(team.name, "Falcons");
        assert_eq!(team.zone_id, 3);
        assert_eq!(team.captain_id, captain_id);
        assert_eq!(team.total_matches, 0);
        assert_eq!(team.get_status(), TeamStatus::Draft);
        assert!(!team.is_active());
    }

    #[test]
    fn test_logo_dna_passes_through_unmodified() {
        let logo = json!({"layers": [1, 2, 3], "palette": {"primary": "#102030"}});
        let team = Model::new_team("Kites".to_string(), 1, Uuid::new_v4(), logo.clone());
        assert_eq!(team.logo_dna, logo);
    }

    #[test]
    fn test_unknown_status_falls_back_to_draft() {
        let mut team = Model::new_team("Owls".to_string(), 2, Uuid::new_v4(), json!({}));
        team.status = "corrupted".to_string();
        assert_eq!(team.get_status(), TeamStatus::Draft);
    }

    #[test]
    fn test_member_limits() {
        assert_eq!(MAX_TEAM_MEMBERS, 16);
        assert!(ACTIVATION_MEMBER_COUNT < MAX_TEAM_MEMBERS);
    }
}
