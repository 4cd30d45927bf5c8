// squad-backend/src/service/team_service.rs

use crate::domain::membership_model::{MemberRole, Model as Membership};
use crate::domain::team_model::{Model as Team, ACTIVATION_MEMBER_COUNT, MAX_TEAM_MEMBERS};
use crate::dto::team_dto::{CreateTeamRequest, MyTeamResponse, RosterEntry, TeamResponse};
use crate::error::{AppError, AppResult};
use crate::repository::membership_repository::MembershipRepository;
use crate::repository::team_repository::TeamRepository;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct TeamService {
    team_repository: Arc<dyn TeamRepository>,
    membership_repository: Arc<dyn MembershipRepository>,
}

impl TeamService {
    pub fn new(
        team_repository: Arc<dyn TeamRepository>,
        membership_repository: Arc<dyn MembershipRepository>,
    ) -> Self {
        Self {
            team_repository,
            membership_repository,
        }
    }

    /// チーム名が使用済みかチェック
    ///
    /// Returns `true` when the name is already taken in the zone.
    pub async fn check_name_availability(&self, name: &str, zone_id: i32) -> AppResult<bool> {
        let existing = self
            .team_repository
            .find_by_name_in_zone(name, zone_id)
            .await
            .map_err(|e| AppError::NameCheckFailed(e.to_string()))?;

        Ok(existing.is_some())
    }

    /// チームを作成（キャプテンのメンバーシップ付き）
    ///
    /// Two writes with a compensating delete: if the captain membership
    /// cannot be inserted, the freshly created team row is removed on a
    /// best-effort basis. Name uniqueness is not checked here; callers are
    /// expected to use `check_name_availability`, and the store's unique
    /// index is the authoritative backstop.
    pub async fn create_team(
        &self,
        captain_id: Uuid,
        request: CreateTeamRequest,
    ) -> AppResult<TeamResponse> {
        request.validate()?;

        let team = Team::new_team(request.name, request.zone_id, captain_id, request.logo_dna);

        let created_team = self
            .team_repository
            .create_team(&team)
            .await
            .map_err(|e| AppError::TeamCreationFailed(e.to_string()))?;

        let captain_member = Membership::new_captain(created_team.id, captain_id);
        if let Err(e) = self.membership_repository.add_member(&captain_member).await {
            warn!(
                team_id = %created_team.id,
                captain_id = %captain_id,
                error = %e,
                "Captain membership insert failed, removing team row"
            );

            // Compensating delete; its own failure must not mask the
            // original error
            if let Err(cleanup_err) = self.team_repository.delete_team(created_team.id).await {
                warn!(
                    team_id = %created_team.id,
                    error = %cleanup_err,
                    "Compensating team delete failed, orphaned team row remains"
                );
            }

            return Err(AppError::CaptainAssignmentFailed(e.to_string()));
        }

        info!(
            team_id = %created_team.id,
            team_name = %created_team.name,
            zone_id = created_team.zone_id,
            captain_id = %captain_id,
            "Team created"
        );

        Ok(TeamResponse::from(created_team))
    }

    /// 呼び出し元のチームを取得（メンバーシップがなければNone）
    ///
    /// Read-only soft-fail: a store failure is logged and reported as
    /// "no team". Callers that must tell the two cases apart use
    /// [`try_get_my_team`](Self::try_get_my_team).
    pub async fn get_my_team(&self, user_id: Uuid) -> Option<MyTeamResponse> {
        match self.try_get_my_team(user_id).await {
            Ok(result) => result,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Team lookup failed");
                None
            }
        }
    }

    /// `get_my_team` のハードフェイル版
    pub async fn try_get_my_team(&self, user_id: Uuid) -> AppResult<Option<MyTeamResponse>> {
        let membership = match self
            .membership_repository
            .find_by_user(user_id)
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?
        {
            Some(membership) => membership,
            None => return Ok(None),
        };

        let team = self
            .team_repository
            .find_by_id(membership.team_id)
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;

        Ok(team.map(|team| MyTeamResponse::from((team, &membership))))
    }

    /// チームのロースターを参加日時順で取得
    ///
    /// All-or-nothing: any store failure yields no partial list.
    pub async fn get_team_roster(&self, team_id: Uuid) -> AppResult<Vec<RosterEntry>> {
        let rows = self
            .membership_repository
            .find_roster(team_id)
            .await
            .map_err(|e| AppError::RosterFetchFailed(e.to_string()))?;

        Ok(rows.into_iter().map(RosterEntry::from).collect())
    }

    /// チームに参加
    pub async fn join_team(&self, user_id: Uuid, team_id: Uuid) -> AppResult<()> {
        // One membership system-wide
        let existing = self
            .membership_repository
            .find_by_user(user_id)
            .await
            .map_err(|e| AppError::JoinFailed(e.to_string()))?;
        if existing.is_some() {
            return Err(AppError::AlreadyOnTeam);
        }

        // Capacity check; check-then-act, a concurrent joiner can still
        // slip past (see the store-side constraints for what is enforced)
        let current_count = self
            .membership_repository
            .count_members(team_id)
            .await
            .map_err(|e| AppError::JoinFailed(e.to_string()))?;
        if current_count >= MAX_TEAM_MEMBERS {
            return Err(AppError::TeamFull);
        }

        let member = Membership::new_player(team_id, user_id);
        self.membership_repository
            .add_member(&member)
            .await
            .map_err(|e| AppError::JoinFailed(e.to_string()))?;

        info!(
            team_id = %team_id,
            user_id = %user_id,
            member_count = current_count + 1,
            "User joined team"
        );

        // Fire-and-forget activation once the roster reaches the threshold;
        // the conditional update makes concurrent attempts harmless
        if current_count + 1 == ACTIVATION_MEMBER_COUNT {
            match self.team_repository.activate_if_draft(team_id).await {
                Ok(true) => {
                    info!(team_id = %team_id, "Team activated");
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(team_id = %team_id, error = %e, "Team activation attempt failed");
                }
            }
        }

        Ok(())
    }

    /// チームから脱退（キャプテンは不可）
    pub async fn leave_team(&self, user_id: Uuid, team_id: Uuid) -> AppResult<()> {
        let membership = self
            .membership_repository
            .find_by_user_and_team(user_id, team_id)
            .await
            .map_err(|e| AppError::LeaveFailed(e.to_string()))?
            .ok_or_else(|| {
                AppError::LeaveFailed("User is not a member of this team".to_string())
            })?;

        if !membership.get_role().can_leave() {
            return Err(AppError::CaptainCannotLeave);
        }

        self.membership_repository
            .remove_member(membership.id)
            .await
            .map_err(|e| AppError::LeaveFailed(e.to_string()))?;

        info!(team_id = %team_id, user_id = %user_id, "User left team");
        Ok(())
    }

    /// メンバーをキックする（キャプテンのみ）
    pub async fn kick_member(
        &self,
        captain_id: Uuid,
        team_id: Uuid,
        member_id: Uuid,
    ) -> AppResult<()> {
        self.verify_captain(captain_id, team_id, AppError::KickFailed)
            .await?;

        let target = self
            .membership_repository
            .find_by_user_and_team(member_id, team_id)
            .await
            .map_err(|e| AppError::KickFailed(e.to_string()))?
            .ok_or_else(|| {
                AppError::KickFailed("Target user is not a member of this team".to_string())
            })?;

        self.membership_repository
            .remove_member(target.id)
            .await
            .map_err(|e| AppError::KickFailed(e.to_string()))?;

        info!(
            team_id = %team_id,
            captain_id = %captain_id,
            member_id = %member_id,
            "Member kicked from team"
        );
        Ok(())
    }

    /// メンバーを副キャプテンに昇格する（キャプテンのみ）
    ///
    /// The target's current role is not inspected; promoting an existing
    /// vice is a no-op-equivalent update.
    pub async fn promote_member(
        &self,
        captain_id: Uuid,
        team_id: Uuid,
        member_id: Uuid,
    ) -> AppResult<()> {
        self.verify_captain(captain_id, team_id, AppError::PromotionFailed)
            .await?;

        let target = self
            .membership_repository
            .find_by_user_and_team(member_id, team_id)
            .await
            .map_err(|e| AppError::PromotionFailed(e.to_string()))?
            .ok_or_else(|| {
                AppError::PromotionFailed("Target user is not a member of this team".to_string())
            })?;

        self.membership_repository
            .update_role(target.id, MemberRole::Vice)
            .await
            .map_err(|e| AppError::PromotionFailed(e.to_string()))?;

        info!(
            team_id = %team_id,
            captain_id = %captain_id,
            member_id = %member_id,
            "Member promoted to vice captain"
        );
        Ok(())
    }

    // ヘルパーメソッド

    /// Re-verify the caller's persisted role; caller-supplied role claims
    /// are never trusted.
    async fn verify_captain<F>(
        &self,
        captain_id: Uuid,
        team_id: Uuid,
        store_err: F,
    ) -> AppResult<()>
    where
        F: Fn(String) -> AppError,
    {
        let membership = self
            .membership_repository
            .find_by_user_and_team(captain_id, team_id)
            .await
            .map_err(|e| store_err(e.to_string()))?
            .ok_or_else(|| {
                AppError::InsufficientPrivilege("Caller is not a member of this team".to_string())
            })?;

        if !membership.get_role().can_manage_roster() {
            return Err(AppError::InsufficientPrivilege(
                "Only the captain can manage the roster".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::in_memory::{InMemoryMembershipRepository, InMemoryTeamRepository};
    use serde_json::json;

    fn make_service() -> (
        TeamService,
        Arc<InMemoryTeamRepository>,
        Arc<InMemoryMembershipRepository>,
    ) {
        let team_repo = Arc::new(InMemoryTeamRepository::new());
        let membership_repo = Arc::new(InMemoryMembershipRepository::new());
        let service = TeamService::new(team_repo.clone(), membership_repo.clone());
        (service, team_repo, membership_repo)
    }

    fn make_request(name: &str, zone_id: i32) -> CreateTeamRequest {
        CreateTeamRequest {
            name: name.to_string(),
            zone_id,
            logo_dna: json!({}),
        }
    }

    #[tokio::test]
    async fn test_create_team_assigns_captain() {
        let (service, _, membership_repo) = make_service();
        let captain_id = Uuid::new_v4();

        let team = service
            .create_team(captain_id, make_request("Falcons", 3))
            .await
            .unwrap();

        assert_eq!(team.captain_id, captain_id);

        let membership = membership_repo
            .find_by_user(captain_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.team_id, team.id);
        assert!(membership.is_captain());
    }

    #[tokio::test]
    async fn test_create_team_rejects_invalid_name() {
        let (service, team_repo, _) = make_service();

        let result = service
            .create_team(Uuid::new_v4(), make_request("", 3))
            .await;

        assert!(matches!(result, Err(AppError::ValidationFailure(_))));
        assert_eq!(team_repo.team_count(), 0);
    }
}
