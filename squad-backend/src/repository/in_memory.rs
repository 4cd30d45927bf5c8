// squad-backend/src/repository/in_memory.rs
//
// In-memory repository implementations backing the service test suite and
// local experimentation. They mirror the store-level constraints the
// migrations install (unique team name per zone, one membership per user)
// and can be told to fail specific operations to exercise error paths.

use crate::domain::card_model::Model as Card;
use crate::domain::membership_model::{MemberRole, Model as Membership};
use crate::domain::team_model::Model as Team;
use crate::domain::team_status::TeamStatus;
use crate::domain::user_model::Model as User;
use crate::repository::membership_repository::{MembershipRepository, RosterRow};
use crate::repository::team_repository::TeamRepository;
use crate::repository::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use uuid::Uuid;

fn check_failure(failing_ops: &RwLock<HashSet<String>>, op: &str) -> StoreResult<()> {
    let ops = failing_ops.read().expect("lock poisoned");
    if ops.contains(op) {
        return Err(StoreError(format!("injected failure for '{}'", op)));
    }
    Ok(())
}

#[derive(Default)]
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<Uuid, Team>>,
    failing_ops: RwLock<HashSet<String>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation fail until cleared.
    pub fn fail_on(&self, op: &str) {
        self.failing_ops
            .write()
            .expect("lock poisoned")
            .insert(op.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing_ops.write().expect("lock poisoned").clear();
    }

    pub fn team_count(&self) -> usize {
        self.teams.read().expect("lock poisoned").len()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create_team(&self, team: &Team) -> StoreResult<Team> {
        check_failure(&self.failing_ops, "create_team")?;
        let mut teams = self.teams.write().expect("lock poisoned");

        // Unique (name, zone_id), as enforced by idx_teams_name_zone_unique
        if teams
            .values()
            .any(|t| t.name == team.name && t.zone_id == team.zone_id)
        {
            return Err(StoreError(format!(
                "duplicate key: team '{}' already exists in zone {}",
                team.name, team.zone_id
            )));
        }

        teams.insert(team.id, team.clone());
        Ok(team.clone())
    }

    async fn find_by_id(&self, team_id: Uuid) -> StoreResult<Option<Team>> {
        check_failure(&self.failing_ops, "find_by_id")?;
        Ok(self
            .teams
            .read()
            .expect("lock poisoned")
            .get(&team_id)
            .cloned())
    }

    async fn find_by_name_in_zone(&self, name: &str, zone_id: i32) -> StoreResult<Option<Team>> {
        check_failure(&self.failing_ops, "find_by_name_in_zone")?;
        Ok(self
            .teams
            .read()
            .expect("lock poisoned")
            .values()
            .find(|t| t.name == name && t.zone_id == zone_id)
            .cloned())
    }

    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool> {
        check_failure(&self.failing_ops, "delete_team")?;
        Ok(self
            .teams
            .write()
            .expect("lock poisoned")
            .remove(&team_id)
            .is_some())
    }

    async fn activate_if_draft(&self, team_id: Uuid) -> StoreResult<bool> {
        check_failure(&self.failing_ops, "activate_if_draft")?;
        let mut teams = self.teams.write().expect("lock poisoned");
        match teams.get_mut(&team_id) {
            Some(team) if team.get_status().is_draft() => {
                team.status = TeamStatus::Active.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryMembershipRepository {
    members: RwLock<HashMap<Uuid, Membership>>,
    users: RwLock<HashMap<Uuid, User>>,
    cards: RwLock<Vec<Card>>,
    failing_ops: RwLock<HashSet<String>>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, op: &str) {
        self.failing_ops
            .write()
            .expect("lock poisoned")
            .insert(op.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing_ops.write().expect("lock poisoned").clear();
    }

    /// Seed external user data for roster joins.
    pub fn insert_user(&self, user: User) {
        self.users
            .write()
            .expect("lock poisoned")
            .insert(user.id, user);
    }

    /// Seed external card data for roster joins.
    pub fn insert_card(&self, card: Card) {
        self.cards.write().expect("lock poisoned").push(card);
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn add_member(&self, member: &Membership) -> StoreResult<Membership> {
        check_failure(&self.failing_ops, "add_member")?;
        let mut members = self.members.write().expect("lock poisoned");

        // Unique user_id, as enforced by idx_team_members_user_unique
        if members.values().any(|m| m.user_id == member.user_id) {
            return Err(StoreError(format!(
                "duplicate key: user {} already holds a membership",
                member.user_id
            )));
        }

        members.insert(member.id, member.clone());
        Ok(member.clone())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<Membership>> {
        check_failure(&self.failing_ops, "find_by_user")?;
        Ok(self
            .members
            .read()
            .expect("lock poisoned")
            .values()
            .find(|m| m.user_id == user_id)
            .cloned())
    }

    async fn find_by_user_and_team(
        &self,
        user_id: Uuid,
        team_id: Uuid,
    ) -> StoreResult<Option<Membership>> {
        check_failure(&self.failing_ops, "find_by_user_and_team")?;
        Ok(self
            .members
            .read()
            .expect("lock poisoned")
            .values()
            .find(|m| m.user_id == user_id && m.team_id == team_id)
            .cloned())
    }

    async fn count_members(&self, team_id: Uuid) -> StoreResult<u64> {
        check_failure(&self.failing_ops, "count_members")?;
        Ok(self
            .members
            .read()
            .expect("lock poisoned")
            .values()
            .filter(|m| m.team_id == team_id)
            .count() as u64)
    }

    async fn update_role(&self, membership_id: Uuid, role: MemberRole) -> StoreResult<()> {
        check_failure(&self.failing_ops, "update_role")?;
        let mut members = self.members.write().expect("lock poisoned");
        if let Some(member) = members.get_mut(&membership_id) {
            member.role = role.to_string();
        }
        Ok(())
    }

    async fn remove_member(&self, membership_id: Uuid) -> StoreResult<bool> {
        check_failure(&self.failing_ops, "remove_member")?;
        Ok(self
            .members
            .write()
            .expect("lock poisoned")
            .remove(&membership_id)
            .is_some())
    }

    async fn find_roster(&self, team_id: Uuid) -> StoreResult<Vec<RosterRow>> {
        check_failure(&self.failing_ops, "find_roster")?;
        let members = self.members.read().expect("lock poisoned");
        let users = self.users.read().expect("lock poisoned");
        let cards = self.cards.read().expect("lock poisoned");

        let mut memberships: Vec<Membership> = members
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.joined_at);

        let rows = memberships
            .into_iter()
            .map(|membership| {
                let user = users.get(&membership.user_id).cloned();
                let owned_card = cards
                    .iter()
                    .filter(|c| c.owner_id == membership.user_id)
                    .min_by_key(|c| c.created_at)
                    .cloned();
                let attached_card = membership
                    .card_id
                    .and_then(|card_id| cards.iter().find(|c| c.id == card_id).cloned());
                RosterRow {
                    membership,
                    user,
                    owned_card,
                    attached_card,
                }
            })
            .collect();

        Ok(rows)
    }
}
