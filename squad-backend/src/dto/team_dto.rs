// squad-backend/src/dto/team_dto.rs

use crate::domain::membership_model::{MemberRole, Model as Membership};
use crate::domain::team_model::Model as Team;
use crate::domain::team_status::TeamStatus;
use crate::repository::membership_repository::RosterRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

/// Rating shown for a member whose card is missing
pub const DEFAULT_RATING: i32 = 60;

/// Placeholder shown when neither a card name nor a username is available
pub const UNKNOWN_NAME: &str = "unknown";

/// Placeholder shown when no card carries a position
pub const UNKNOWN_POSITION: &str = "N/A";

/// チーム作成リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100, message = "Team name must be 1-100 characters"))]
    pub name: String,

    pub zone_id: i32,

    /// Opaque logo descriptor, stored as-is
    pub logo_dna: Value,
}

/// チーム詳細レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub captain_id: Uuid,
    pub zone_id: i32,
    pub logo_dna: Value,
    pub total_matches: i32,
    pub status: TeamStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        let status = team.get_status();
        Self {
            id: team.id,
            name: team.name,
            captain_id: team.captain_id,
            zone_id: team.zone_id,
            logo_dna: team.logo_dna,
            total_matches: team.total_matches,
            status,
            created_at: team.created_at,
        }
    }
}

/// 自分のチームレスポンス（チーム情報＋自分の役割）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyTeamResponse {
    pub id: Uuid,
    pub name: String,
    pub captain_id: Uuid,
    pub zone_id: i32,
    pub logo_dna: Value,
    pub total_matches: i32,
    pub status: TeamStatus,
    pub created_at: DateTime<Utc>,
    pub my_role: MemberRole,
}

impl From<(Team, &Membership)> for MyTeamResponse {
    fn from((team, membership): (Team, &Membership)) -> Self {
        let status = team.get_status();
        Self {
            id: team.id,
            name: team.name,
            captain_id: team.captain_id,
            zone_id: team.zone_id,
            logo_dna: team.logo_dna,
            total_matches: team.total_matches,
            status,
            created_at: team.created_at,
            my_role: membership.get_role(),
        }
    }
}

/// ロースターエントリ（メンバーシップ＋外部アイデンティティ情報）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    pub reputation: i32,
    pub name: String,
    pub position: String,
    pub rating: i32,
    pub visual: Value,
}

impl From<RosterRow> for RosterEntry {
    fn from(row: RosterRow) -> Self {
        // A card from the user's own collection wins over one attached
        // through the team role
        let card = row.owned_card.or(row.attached_card);

        let name = card
            .as_ref()
            .map(|c| c.display_name.clone())
            .or_else(|| row.user.as_ref().map(|u| u.username.clone()))
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Self {
            user_id: row.membership.user_id,
            role: row.membership.get_role(),
            joined_at: row.membership.joined_at,
            reputation: row.user.as_ref().map_or(0, |u| u.reputation_score),
            name,
            position: card
                .as_ref()
                .map_or_else(|| UNKNOWN_POSITION.to_string(), |c| c.position.clone()),
            rating: card.as_ref().map_or(DEFAULT_RATING, |c| c.rating),
            visual: card.map_or_else(|| json!({}), |c| c.visual_dna),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card_model::Model as Card;
    use crate::domain::user_model::Model as User;

    fn make_user(username: &str, reputation: i32) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            reputation_score: reputation,
            created_at: Utc::now(),
        }
    }

    fn make_card(owner_id: Uuid, display_name: &str, rating: i32) -> Card {
        Card {
            id: Uuid::new_v4(),
            owner_id,
            display_name: display_name.to_string(),
            position: "ST".to_string(),
            rating,
            visual_dna: json!({"kit": 7}),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_team_request_validation() {
        let request = CreateTeamRequest {
            name: "Falcons".to_string(),
            zone_id: 3,
            logo_dna: json!({}),
        };
        assert!(request.validate().is_ok());

        let request = CreateTeamRequest {
            name: String::new(),
            zone_id: 3,
            logo_dna: json!({}),
        };
        assert!(request.validate().is_err());

        let request = CreateTeamRequest {
            name: "x".repeat(101),
            zone_id: 3,
            logo_dna: json!({}),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_roster_entry_uses_card_data_when_present() {
        let user = make_user("kenji", 42);
        let card = make_card(user.id, "K. Nakamura", 88);
        let membership = Membership::new_player(Uuid::new_v4(), user.id);

        let entry = RosterEntry::from(RosterRow {
            membership,
            user: Some(user),
            owned_card: Some(card),
            attached_card: None,
        });

        assert_eq!(entry.name, "K. Nakamura");
        assert_eq!(entry.position, "ST");
        assert_eq!(entry.rating, 88);
        assert_eq!(entry.reputation, 42);
        assert_eq!(entry.visual, json!({"kit": 7}));
    }

    #[test]
    fn test_roster_entry_falls_back_to_username() {
        let user = make_user("kenji", 10);
        let membership = Membership::new_player(Uuid::new_v4(), user.id);

        let entry = RosterEntry::from(RosterRow {
            membership,
            user: Some(user),
            owned_card: None,
            attached_card: None,
        });

        assert_eq!(entry.name, "kenji");
        assert_eq!(entry.position, UNKNOWN_POSITION);
        assert_eq!(entry.rating, DEFAULT_RATING);
        assert_eq!(entry.visual, json!({}));
    }

    #[test]
    fn test_roster_entry_placeholders_without_user_or_card() {
        let membership = Membership::new_player(Uuid::new_v4(), Uuid::new_v4());

        let entry = RosterEntry::from(RosterRow {
            membership,
            user: None,
            owned_card: None,
            attached_card: None,
        });

        assert_eq!(entry.name, UNKNOWN_NAME);
        assert_eq!(entry.position, UNKNOWN_POSITION);
        assert_eq!(entry.rating, DEFAULT_RATING);
        assert_eq!(entry.reputation, 0);
    }

    #[test]
    fn test_owned_card_preferred_over_attached_card() {
        let user = make_user("kenji", 5);
        let owned = make_card(user.id, "Own Collection", 70);
        let attached = make_card(user.id, "Role Attachment", 95);
        let membership = Membership::new_player(Uuid::new_v4(), user.id);

        let entry = RosterEntry::from(RosterRow {
            membership,
            user: Some(user),
            owned_card: Some(owned),
            attached_card: Some(attached),
        });

        assert_eq!(entry.name, "Own Collection");
        assert_eq!(entry.rating, 70);
    }

    #[test]
    fn test_attached_card_used_when_no_owned_card() {
        let user = make_user("kenji", 5);
        let attached = make_card(user.id, "Role Attachment", 95);
        let membership = Membership::new_player(Uuid::new_v4(), user.id);

        let entry = RosterEntry::from(RosterRow {
            membership,
            user: Some(user),
            owned_card: None,
            attached_card: Some(attached),
        });

        assert_eq!(entry.name, "Role Attachment");
        assert_eq!(entry.rating, 95);
    }
}
