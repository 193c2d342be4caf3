//! 提交存储操作

use super::{SeaOrmStorage, map_unique};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, SkillLinkError};
use crate::models::submissions::{
    entities::{NewSubmission, Submission, SubmissionStatus},
    responses::{MySubmissionItem, SubmissionWithStudent},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建提交，(作业, 学员) 唯一
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            content: Set(req.content),
            attachment_url: Set(req.attachment_url),
            status: Set(SubmissionStatus::Submitted.as_str().to_string()),
            is_late: Set(req.is_late),
            score: Set(None),
            feedback: Set(None),
            graded_by: Set(None),
            graded_at: Set(None),
            submitted_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_unique(e, "该作业已提交", "创建提交失败"))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_by_assignment_and_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出作业的全部提交（带学员信息）
    pub async fn list_submissions_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        let rows = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .find_also_related(Users)
            .order_by_asc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(submission, student)| SubmissionWithStudent {
                submission: submission.into_submission(),
                student: student.map(|u| u.into_summary()),
            })
            .collect())
    }

    /// 列出学员的全部提交，附带作业信息，最新的在前
    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<MySubmissionItem>> {
        let rows = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(Assignments)
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(submission, assignment)| {
                assignment.map(|a| MySubmissionItem {
                    submission: submission.into_submission(),
                    assignment_title: a.title,
                    cohort_id: a.cohort_id,
                    max_score: a.max_score,
                })
            })
            .collect())
    }

    pub async fn list_submissions_by_assignments_impl(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Submissions::find()
            .filter(Column::AssignmentId.is_in(assignment_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 评分，重复评分覆盖之前的成绩
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        if self.get_submission_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            status: Set(SubmissionStatus::Graded.as_str().to_string()),
            score: Set(Some(score)),
            feedback: Set(feedback),
            graded_by: Set(Some(graded_by)),
            graded_at: Set(Some(chrono::Utc::now().timestamp())),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("评分失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 指定班期中待评分的提交，最早的在前
    pub async fn list_ungraded_submissions_impl(
        &self,
        cohort_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        if cohort_ids.is_empty() {
            return Ok(Vec::new());
        }

        let assignment_ids: Vec<i64> = Assignments::find()
            .select_only()
            .column(AssignmentColumn::Id)
            .filter(AssignmentColumn::CohortId.is_in(cohort_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询作业列表失败: {e}")))?;

        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Submissions::find()
            .filter(Column::AssignmentId.is_in(assignment_ids))
            .filter(Column::Status.eq(SubmissionStatus::Submitted.as_str()))
            .find_also_related(Users)
            .order_by_asc(Column::SubmittedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| {
                SkillLinkError::database_operation(format!("查询待评分提交失败: {e}"))
            })?;

        Ok(rows
            .into_iter()
            .map(|(submission, student)| SubmissionWithStudent {
                submission: submission.into_submission(),
                student: student.map(|u| u.into_summary()),
            })
            .collect())
    }

    /// (全部提交数, 已评分提交数)
    pub async fn count_submissions_impl(&self) -> Result<(u64, u64)> {
        let total = Submissions::find()
            .count(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("统计提交数量失败: {e}")))?;
        let graded = Submissions::find()
            .filter(Column::Status.eq(SubmissionStatus::Graded.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("统计提交数量失败: {e}")))?;

        Ok((total, graded))
    }

    /// 学员提交总数，用于徽章统计
    pub(crate) async fn count_submissions_by_student(&self, student_id: i64) -> Result<i64> {
        let count = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("统计提交数量失败: {e}")))?;

        Ok(count as i64)
    }
}
