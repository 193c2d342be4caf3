//! 班期成员存储操作

use super::{SeaOrmStorage, map_unique};
use crate::entity::cohort_users::{ActiveModel, Column, Entity as CohortUsers};
use crate::entity::cohorts::{Column as CohortColumn, Entity as Cohorts};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SkillLinkError};
use crate::models::cohorts::entities::{Cohort, CohortMember, CohortMembership, CohortRole};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 添加班期成员
    pub async fn add_cohort_member_impl(
        &self,
        cohort_id: i64,
        user_id: i64,
        role: CohortRole,
    ) -> Result<CohortMembership> {
        let model = ActiveModel {
            cohort_id: Set(cohort_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_unique(e, "用户已是班期成员", "添加班期成员失败"))?;

        Ok(result.into_membership())
    }

    /// 移除班期成员
    pub async fn remove_cohort_member_impl(&self, cohort_id: i64, user_id: i64) -> Result<bool> {
        let result = CohortUsers::delete_many()
            .filter(
                Condition::all()
                    .add(Column::CohortId.eq(cohort_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("移除班期成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 获取用户在班期中的成员信息
    pub async fn get_cohort_member_impl(
        &self,
        cohort_id: i64,
        user_id: i64,
    ) -> Result<Option<CohortMembership>> {
        let result = CohortUsers::find()
            .filter(Column::CohortId.eq(cohort_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询班期成员失败: {e}")))?;

        Ok(result.map(|m| m.into_membership()))
    }

    /// 列出班期成员（带用户信息）
    pub async fn list_cohort_members_impl(
        &self,
        cohort_id: i64,
        role: Option<CohortRole>,
    ) -> Result<Vec<CohortMember>> {
        let mut select = CohortUsers::find().filter(Column::CohortId.eq(cohort_id));
        if let Some(role) = role {
            select = select.filter(Column::Role.eq(role.as_str()));
        }

        let rows = select
            .find_also_related(Users)
            .order_by_asc(Column::JoinedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询班期成员失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, user)| {
                user.map(|user| CohortMember {
                    membership: member.into_membership(),
                    user: user.into_summary(),
                })
            })
            .collect())
    }

    /// 列出用户的全部成员关系
    pub async fn list_user_memberships_impl(&self, user_id: i64) -> Result<Vec<CohortMembership>> {
        let rows = CohortUsers::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CohortId)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户班期失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_membership()).collect())
    }

    /// 列出用户所在的班期
    pub async fn list_user_cohorts_impl(
        &self,
        user_id: i64,
        role: Option<CohortRole>,
    ) -> Result<Vec<Cohort>> {
        let mut member_query = CohortUsers::find()
            .select_only()
            .column(Column::CohortId)
            .filter(Column::UserId.eq(user_id));
        if let Some(role) = role {
            member_query = member_query.filter(Column::Role.eq(role.as_str()));
        }

        let cohort_ids: Vec<i64> = member_query
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户班期失败: {e}")))?;

        if cohort_ids.is_empty() {
            return Ok(Vec::new());
        }

        let cohorts = Cohorts::find()
            .filter(CohortColumn::Id.is_in(cohort_ids))
            .order_by_desc(CohortColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询班期失败: {e}")))?;

        Ok(cohorts.into_iter().map(|m| m.into_cohort()).collect())
    }

    /// 统计班期成员数量
    pub async fn count_cohort_members_impl(
        &self,
        cohort_id: i64,
        role: Option<CohortRole>,
    ) -> Result<i64> {
        let mut select = CohortUsers::find().filter(Column::CohortId.eq(cohort_id));
        if let Some(role) = role {
            select = select.filter(Column::Role.eq(role.as_str()));
        }

        let count = select.count(&self.db).await.map_err(|e| {
            SkillLinkError::database_operation(format!("统计班期成员数量失败: {e}"))
        })?;

        Ok(count as i64)
    }
}
