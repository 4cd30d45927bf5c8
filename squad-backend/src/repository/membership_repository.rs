// squad-backend/src/repository/membership_repository.rs

use crate::domain::card_model::{
    Column as CardColumn, Entity as CardEntity, Model as Card,
};
use crate::domain::membership_model::{
    ActiveModel as MembershipActiveModel, Column as MembershipColumn, Entity as MembershipEntity,
    MemberRole, Model as Membership,
};
use crate::domain::user_model::{Column as UserColumn, Entity as UserEntity, Model as User};
use crate::repository::{map_db_error, StoreResult};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

/// One roster membership joined with its external identity data.
///
/// Both card candidates are surfaced so the caller decides the preference
/// order between a user's own collection and a team-role attachment.
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub membership: Membership,
    pub user: Option<User>,
    pub owned_card: Option<Card>,
    pub attached_card: Option<Card>,
}

/// Narrow store contract for membership rows, injected into the service.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn add_member(&self, member: &Membership) -> StoreResult<Membership>;

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<Membership>>;

    async fn find_by_user_and_team(
        &self,
        user_id: Uuid,
        team_id: Uuid,
    ) -> StoreResult<Option<Membership>>;

    async fn count_members(&self, team_id: Uuid) -> StoreResult<u64>;

    async fn update_role(&self, membership_id: Uuid, role: MemberRole) -> StoreResult<()>;

    async fn remove_member(&self, membership_id: Uuid) -> StoreResult<bool>;

    /// Memberships of a team joined with user and card data, ordered by
    /// `joined_at` ascending (oldest member first).
    async fn find_roster(&self, team_id: Uuid) -> StoreResult<Vec<RosterRow>>;
}

pub struct SeaOrmMembershipRepository {
    db: DatabaseConnection,
}

impl SeaOrmMembershipRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MembershipRepository for SeaOrmMembershipRepository {
    /// チームメンバーを追加
    async fn add_member(&self, member: &Membership) -> StoreResult<Membership> {
        let active_model = MembershipActiveModel {
            id: Set(member.id),
            team_id: Set(member.team_id),
            user_id: Set(member.user_id),
            role: Set(member.role.clone()),
            jersey_number: Set(member.jersey_number),
            card_id: Set(member.card_id),
            joined_at: Set(member.joined_at),
        };

        let _result = active_model.insert(&self.db).await.map_err(map_db_error)?;
        Ok(member.clone())
    }

    /// ユーザーのメンバーシップを取得（システム全体で高々1件）
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<Membership>> {
        let model = MembershipEntity::find()
            .filter(MembershipColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(model)
    }

    /// ユーザーのチームメンバーシップを取得
    async fn find_by_user_and_team(
        &self,
        user_id: Uuid,
        team_id: Uuid,
    ) -> StoreResult<Option<Membership>> {
        let model = MembershipEntity::find()
            .filter(MembershipColumn::UserId.eq(user_id))
            .filter(MembershipColumn::TeamId.eq(team_id))
            .one(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(model)
    }

    /// チームのメンバー数を取得
    async fn count_members(&self, team_id: Uuid) -> StoreResult<u64> {
        let count = MembershipEntity::find()
            .filter(MembershipColumn::TeamId.eq(team_id))
            .count(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(count)
    }

    /// メンバーの役割を更新
    async fn update_role(&self, membership_id: Uuid, role: MemberRole) -> StoreResult<()> {
        MembershipEntity::update_many()
            .col_expr(MembershipColumn::Role, Expr::value(role.to_string()))
            .filter(MembershipColumn::Id.eq(membership_id))
            .exec(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    /// チームメンバーを削除
    async fn remove_member(&self, membership_id: Uuid) -> StoreResult<bool> {
        let result = MembershipEntity::delete_by_id(membership_id)
            .exec(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected > 0)
    }

    /// チームのロースターを参加日時順で取得（ユーザー・カード情報付き）
    async fn find_roster(&self, team_id: Uuid) -> StoreResult<Vec<RosterRow>> {
        let memberships = MembershipEntity::find()
            .filter(MembershipColumn::TeamId.eq(team_id))
            .order_by_asc(MembershipColumn::JoinedAt)
            .all(&self.db)
            .await
            .map_err(map_db_error)?;

        if memberships.is_empty() {
            return Ok(vec![]);
        }

        let user_ids: Vec<Uuid> = memberships.iter().map(|m| m.user_id).collect();
        let attached_card_ids: Vec<Uuid> =
            memberships.iter().filter_map(|m| m.card_id).collect();

        let users: HashMap<Uuid, User> = UserEntity::find()
            .filter(UserColumn::Id.is_in(user_ids.clone()))
            .all(&self.db)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        // First card per owner, oldest first
        let mut owned_cards: HashMap<Uuid, Card> = HashMap::new();
        for card in CardEntity::find()
            .filter(CardColumn::OwnerId.is_in(user_ids))
            .order_by_asc(CardColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_error)?
        {
            owned_cards.entry(card.owner_id).or_insert(card);
        }

        let attached_cards: HashMap<Uuid, Card> = if attached_card_ids.is_empty() {
            HashMap::new()
        } else {
            CardEntity::find()
                .filter(CardColumn::Id.is_in(attached_card_ids))
                .all(&self.db)
                .await
                .map_err(map_db_error)?
                .into_iter()
                .map(|card| (card.id, card))
                .collect()
        };

        let rows = memberships
            .into_iter()
            .map(|membership| {
                let user = users.get(&membership.user_id).cloned();
                let owned_card = owned_cards.get(&membership.user_id).cloned();
                let attached_card = membership
                    .card_id
                    .and_then(|card_id| attached_cards.get(&card_id).cloned());
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
