//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::cohort_users::{Column as MemberColumn, Entity as CohortUsers};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{Result, SkillLinkError};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    cohorts::entities::CohortRole,
    submissions::entities::SubmissionStatus,
};
use std::collections::HashMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            cohort_id: Set(req.cohort_id),
            created_by: Set(Some(created_by)),
            title: Set(req.title),
            description: Set(req.description),
            max_score: Set(req.max_score),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出作业，按截止时间排序
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Assignments::find();
        if let Some(cohort_ids) = query.cohort_ids {
            select = select.filter(Column::CohortId.is_in(cohort_ids));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询作业总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询作业页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(AssignmentListResponse {
            items: items.into_iter().map(|m| m.into_assignment()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 列出多个班期的全部作业
    pub async fn list_assignments_by_cohorts_impl(
        &self,
        cohort_ids: &[i64],
    ) -> Result<Vec<Assignment>> {
        if cohort_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = Assignments::find()
            .filter(Column::CohortId.is_in(cohort_ids.iter().copied()))
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    /// 删除作业，提交由外键级联删除
    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 已评分提交中的最高分
    pub async fn get_highest_score_impl(&self, assignment_id: i64) -> Result<Option<f64>> {
        let scores: Vec<Option<f64>> = Submissions::find()
            .select_only()
            .column(SubmissionColumn::Score)
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .filter(SubmissionColumn::Status.eq(SubmissionStatus::Graded.as_str()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询作业成绩失败: {e}")))?;

        Ok(scores.into_iter().flatten().reduce(f64::max))
    }

    pub async fn count_assignments_impl(&self) -> Result<u64> {
        Assignments::find()
            .count(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("统计作业数量失败: {e}")))
    }

    /// 全平台应交提交数：每个作业 × 所在班期学员数
    pub async fn count_expected_submissions_impl(&self) -> Result<u64> {
        let assignment_cohorts: Vec<i64> = Assignments::find()
            .select_only()
            .column(Column::CohortId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询作业班期失败: {e}")))?;

        let student_rows: Vec<(i64, i64)> = CohortUsers::find()
            .select_only()
            .column(MemberColumn::CohortId)
            .column_as(MemberColumn::Id.count(), "student_count")
            .filter(MemberColumn::Role.eq(CohortRole::Student.as_str()))
            .group_by(MemberColumn::CohortId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("统计班期学员失败: {e}")))?;

        let students: HashMap<i64, i64> = student_rows.into_iter().collect();
        let expected = assignment_cohorts
            .iter()
            .map(|cohort_id| students.get(cohort_id).copied().unwrap_or(0))
            .sum::<i64>();

        Ok(expected.max(0) as u64)
    }
}
