//! 班期存储操作

use super::{SeaOrmStorage, map_unique};
use crate::entity::cohort_users::{Column as CohortUserColumn, Entity as CohortUsers};
use crate::entity::cohorts::{ActiveModel, Column, Entity as Cohorts};
use crate::errors::{Result, SkillLinkError};
use crate::models::{
    PaginationInfo,
    cohorts::{
        entities::{Cohort, CohortStatus},
        requests::{CohortListQuery, CreateCohortRequest, UpdateCohortRequest},
        responses::CohortListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建班期
    pub async fn create_cohort_impl(
        &self,
        created_by: i64,
        req: CreateCohortRequest,
    ) -> Result<Cohort> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            start_date: Set(req.start_date.map(|d| d.timestamp())),
            end_date: Set(req.end_date.map(|d| d.timestamp())),
            status: Set(CohortStatus::Active.as_str().to_string()),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_unique(e, "班期名称已存在", "创建班期失败"))?;

        Ok(result.into_cohort())
    }

    /// 通过 ID 获取班期
    pub async fn get_cohort_by_id_impl(&self, cohort_id: i64) -> Result<Option<Cohort>> {
        let result = Cohorts::find_by_id(cohort_id)
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询班期失败: {e}")))?;

        Ok(result.map(|m| m.into_cohort()))
    }

    /// 通过名称获取班期
    pub async fn get_cohort_by_name_impl(&self, name: &str) -> Result<Option<Cohort>> {
        let result = Cohorts::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询班期失败: {e}")))?;

        Ok(result.map(|m| m.into_cohort()))
    }

    /// 分页列出班期，指定 member_id 时只返回该用户所在的班期
    pub async fn list_cohorts_with_pagination_impl(
        &self,
        query: CohortListQuery,
    ) -> Result<CohortListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Cohorts::find();

        if let Some(member_id) = query.member_id {
            let cohort_ids: Vec<i64> = CohortUsers::find()
                .select_only()
                .column(CohortUserColumn::CohortId)
                .filter(CohortUserColumn::UserId.eq(member_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| {
                    SkillLinkError::database_operation(format!("查询用户班期失败: {e}"))
                })?;
            select = select.filter(Column::Id.is_in(cohort_ids));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Description.contains(&escaped)),
            );
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询班期总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询班期页数失败: {e}")))?;
        let cohorts = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询班期列表失败: {e}")))?;

        Ok(CohortListResponse {
            items: cohorts.into_iter().map(|m| m.into_cohort()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新班期
    pub async fn update_cohort_impl(
        &self,
        cohort_id: i64,
        update: UpdateCohortRequest,
    ) -> Result<Option<Cohort>> {
        if self.get_cohort_by_id_impl(cohort_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(cohort_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(Some(start_date.timestamp()));
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(Some(end_date.timestamp()));
        }
        if let Some(status) = update.status {
            model.status = Set(status.as_str().to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| map_unique(e, "班期名称已存在", "更新班期失败"))?;

        Ok(Some(result.into_cohort()))
    }

    /// 删除班期，成员、作业、考勤、论坛内容由外键级联删除
    pub async fn delete_cohort_impl(&self, cohort_id: i64) -> Result<bool> {
        let result = Cohorts::delete_by_id(cohort_id)
            .exec(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("删除班期失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_cohorts_impl(&self) -> Result<u64> {
        Cohorts::find()
            .count(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("统计班期数量失败: {e}")))
    }
}
