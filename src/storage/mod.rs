use std::sync::Arc;

use crate::models::{
    analytics::responses::UserRoleCounts,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    attendance::entities::{AttendanceRecord, AttendanceUpsert},
    cohorts::{
        entities::{Cohort, CohortMember, CohortMembership, CohortRole},
        requests::{CohortListQuery, CreateCohortRequest, UpdateCohortRequest},
        responses::CohortListResponse,
    },
    forum::{
        entities::{ForumAnswer, ForumPost},
        requests::{CreatePostRequest, ForumPostListQuery},
        responses::ForumPostListResponse,
    },
    gamification::entities::{Badge, EarnedBadge, NewBadge, PointAward, PointEvent, UserStats},
    submissions::{
        entities::{NewSubmission, Submission},
        responses::{MySubmissionItem, SubmissionWithStudent},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，password 字段为已哈希的密码
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users_by_role(&self) -> Result<UserRoleCounts>;

    /// 班期管理方法
    async fn create_cohort(&self, created_by: i64, cohort: CreateCohortRequest) -> Result<Cohort>;
    async fn get_cohort_by_id(&self, cohort_id: i64) -> Result<Option<Cohort>>;
    async fn get_cohort_by_name(&self, name: &str) -> Result<Option<Cohort>>;
    async fn list_cohorts_with_pagination(
        &self,
        query: CohortListQuery,
    ) -> Result<CohortListResponse>;
    async fn update_cohort(
        &self,
        cohort_id: i64,
        update: UpdateCohortRequest,
    ) -> Result<Option<Cohort>>;
    async fn delete_cohort(&self, cohort_id: i64) -> Result<bool>;
    async fn count_cohorts(&self) -> Result<u64>;

    /// 班期成员管理方法
    // 重复加入返回 Conflict
    async fn add_cohort_member(
        &self,
        cohort_id: i64,
        user_id: i64,
        role: CohortRole,
    ) -> Result<CohortMembership>;
    async fn remove_cohort_member(&self, cohort_id: i64, user_id: i64) -> Result<bool>;
    async fn get_cohort_member(
        &self,
        cohort_id: i64,
        user_id: i64,
    ) -> Result<Option<CohortMembership>>;
    async fn list_cohort_members(
        &self,
        cohort_id: i64,
        role: Option<CohortRole>,
    ) -> Result<Vec<CohortMember>>;
    async fn list_user_memberships(&self, user_id: i64) -> Result<Vec<CohortMembership>>;
    // 用户所在的班期，可按班期角色过滤
    async fn list_user_cohorts(
        &self,
        user_id: i64,
        role: Option<CohortRole>,
    ) -> Result<Vec<Cohort>>;
    async fn count_cohort_members(&self, cohort_id: i64, role: Option<CohortRole>) -> Result<i64>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn list_assignments_by_cohorts(&self, cohort_ids: &[i64]) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    // 已评分提交中的最高分
    async fn get_highest_score(&self, assignment_id: i64) -> Result<Option<f64>>;
    async fn count_assignments(&self) -> Result<u64>;
    // 全平台应交提交数（作业 × 班期学员）
    async fn count_expected_submissions(&self) -> Result<u64>;

    /// 提交管理方法
    // 同一学员重复提交返回 Conflict
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>>;
    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<MySubmissionItem>>;
    async fn list_submissions_by_assignments(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>>;
    async fn grade_submission(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>>;
    async fn list_ungraded_submissions(
        &self,
        cohort_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<SubmissionWithStudent>>;
    // (全部提交数, 已评分提交数)
    async fn count_submissions(&self) -> Result<(u64, u64)>;

    /// 考勤管理方法
    // 同一 (班期, 用户, 日期) 已存在时更新
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<AttendanceRecord>;
    async fn list_attendance(
        &self,
        cohort_id: i64,
        session_date: Option<&str>,
        user_id: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn list_user_attendance(&self, user_id: i64) -> Result<Vec<AttendanceRecord>>;

    /// 论坛方法
    async fn create_forum_post(&self, author_id: i64, post: CreatePostRequest)
    -> Result<ForumPost>;
    async fn get_forum_post(&self, id: i64) -> Result<Option<ForumPost>>;
    async fn list_forum_posts_with_pagination(
        &self,
        query: ForumPostListQuery,
    ) -> Result<ForumPostListResponse>;
    async fn delete_forum_post(&self, id: i64) -> Result<bool>;
    async fn create_forum_answer(
        &self,
        post_id: i64,
        author_id: i64,
        body: String,
    ) -> Result<ForumAnswer>;
    async fn get_forum_answer(&self, id: i64) -> Result<Option<ForumAnswer>>;
    async fn list_forum_answers(&self, post_id: i64) -> Result<Vec<ForumAnswer>>;
    // 采纳回答，同一帖子只保留一个被采纳的回答
    async fn solve_forum_post(
        &self,
        post_id: i64,
        answer_id: i64,
    ) -> Result<Option<(ForumPost, ForumAnswer)>>;
    async fn set_answer_endorsement(
        &self,
        answer_id: i64,
        endorsed_by: Option<i64>,
    ) -> Result<Option<ForumAnswer>>;
    async fn list_unanswered_posts(&self, cohort_ids: &[i64], limit: u64)
    -> Result<Vec<ForumPost>>;

    /// 积分与徽章方法
    // 同一 (用户, 来源, 关联ID) 已记录过时返回 None
    async fn record_point_event(&self, award: PointAward) -> Result<Option<PointEvent>>;
    async fn list_point_events(&self, user_id: i64) -> Result<Vec<PointEvent>>;
    // 按用户汇总积分，user_ids 为 None 时统计全部用户
    async fn sum_points_by_user(&self, user_ids: Option<&[i64]>) -> Result<Vec<(i64, i64)>>;
    // 徽章判定所需统计，current_streak 由调用方根据积分流水计算
    async fn get_user_stats(&self, user_id: i64) -> Result<UserStats>;
    async fn list_badges(&self) -> Result<Vec<Badge>>;
    async fn get_badge_by_code(&self, code: &str) -> Result<Option<Badge>>;
    async fn create_badge(&self, badge: NewBadge) -> Result<Badge>;
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<EarnedBadge>>;
    // 已拥有时返回 false
    async fn award_badge(&self, user_id: i64, badge_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
