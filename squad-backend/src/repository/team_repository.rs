// squad-backend/src/repository/team_repository.rs

use crate::domain::team_model::{
    ActiveModel as TeamActiveModel, Column as TeamColumn, Entity as TeamEntity, Model as Team,
};
use crate::domain::team_status::TeamStatus;
use crate::repository::{map_db_error, StoreResult};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

/// Narrow store contract for team rows, injected into the service.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create_team(&self, team: &Team) -> StoreResult<Team>;

    async fn find_by_id(&self, team_id: Uuid) -> StoreResult<Option<Team>>;

    async fn find_by_name_in_zone(&self, name: &str, zone_id: i32) -> StoreResult<Option<Team>>;

    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool>;

    /// Conditionally flip a team from draft to active.
    ///
    /// The predicate runs in the store, so concurrent callers cannot revert
    /// or double-apply the transition; returns whether a row changed.
    async fn activate_if_draft(&self, team_id: Uuid) -> StoreResult<bool>;
}

pub struct SeaOrmTeamRepository {
    db: DatabaseConnection,
}

impl SeaOrmTeamRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeamRepository for SeaOrmTeamRepository {
    /// チームを作成
    async fn create_team(&self, team: &Team) -> StoreResult<Team> {
        let active_model = TeamActiveModel {
            id: Set(team.id),
            name: Set(team.name.clone()),
            captain_id: Set(team.captain_id),
            zone_id: Set(team.zone_id),
            logo_dna: Set(team.logo_dna.clone()),
            total_matches: Set(team.total_matches),
            status: Set(team.status.clone()),
            created_at: Set(team.created_at),
        };

        let _result = active_model.insert(&self.db).await.map_err(map_db_error)?;
        Ok(team.clone())
    }

    /// チームをIDで取得
    async fn find_by_id(&self, team_id: Uuid) -> StoreResult<Option<Team>> {
        let model = TeamEntity::find_by_id(team_id)
            .one(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(model)
    }

    /// ゾーン内でチームを名前で検索
    async fn find_by_name_in_zone(&self, name: &str, zone_id: i32) -> StoreResult<Option<Team>> {
        let model = TeamEntity::find()
            .filter(TeamColumn::Name.eq(name))
            .filter(TeamColumn::ZoneId.eq(zone_id))
            .one(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(model)
    }

    /// チームを削除
    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool> {
        let result = TeamEntity::delete_by_id(team_id)
            .exec(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected > 0)
    }

    /// ドラフト状態のチームのみをアクティブ化（条件付き更新）
    async fn activate_if_draft(&self, team_id: Uuid) -> StoreResult<bool> {
        let result = TeamEntity::update_many()
            .col_expr(TeamColumn::Status, Expr::value(TeamStatus::Active.as_str()))
            .filter(TeamColumn::Id.eq(team_id))
            .filter(TeamColumn::Status.eq(TeamStatus::Draft.as_str()))
            .exec(&self.db)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected > 0)
    }
}
