//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod attendance;
mod cohort_users;
mod cohorts;
mod forum;
mod gamification;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SkillLinkError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM storage initialized, database: {}", db_url);
        Ok(storage)
    }

    /// 使用已有连接创建存储并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SkillLinkError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SkillLinkError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SkillLinkError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SkillLinkError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite file path"
            )))
        }
    }
}

/// 是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 唯一约束冲突映射为 Conflict，其余为数据库错误
pub(crate) fn map_unique(err: DbErr, conflict_msg: &str, context: &str) -> SkillLinkError {
    if is_unique_violation(&err) {
        SkillLinkError::conflict(conflict_msg)
    } else {
        SkillLinkError::database_operation(format!("{context}: {err}"))
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users_by_role(&self) -> Result<UserRoleCounts> {
        self.count_users_by_role_impl().await
    }

    // 班期模块
    async fn create_cohort(&self, created_by: i64, cohort: CreateCohortRequest) -> Result<Cohort> {
        self.create_cohort_impl(created_by, cohort).await
    }

    async fn get_cohort_by_id(&self, cohort_id: i64) -> Result<Option<Cohort>> {
        self.get_cohort_by_id_impl(cohort_id).await
    }

    async fn get_cohort_by_name(&self, name: &str) -> Result<Option<Cohort>> {
        self.get_cohort_by_name_impl(name).await
    }

    async fn list_cohorts_with_pagination(
        &self,
        query: CohortListQuery,
    ) -> Result<CohortListResponse> {
        self.list_cohorts_with_pagination_impl(query).await
    }

    async fn update_cohort(
        &self,
        cohort_id: i64,
        update: UpdateCohortRequest,
    ) -> Result<Option<Cohort>> {
        self.update_cohort_impl(cohort_id, update).await
    }

    async fn delete_cohort(&self, cohort_id: i64) -> Result<bool> {
        self.delete_cohort_impl(cohort_id).await
    }

    async fn count_cohorts(&self) -> Result<u64> {
        self.count_cohorts_impl().await
    }

    // 班期成员模块
    async fn add_cohort_member(
        &self,
        cohort_id: i64,
        user_id: i64,
        role: CohortRole,
    ) -> Result<CohortMembership> {
        self.add_cohort_member_impl(cohort_id, user_id, role).await
    }

    async fn remove_cohort_member(&self, cohort_id: i64, user_id: i64) -> Result<bool> {
        self.remove_cohort_member_impl(cohort_id, user_id).await
    }

    async fn get_cohort_member(
        &self,
        cohort_id: i64,
        user_id: i64,
    ) -> Result<Option<CohortMembership>> {
        self.get_cohort_member_impl(cohort_id, user_id).await
    }

    async fn list_cohort_members(
        &self,
        cohort_id: i64,
        role: Option<CohortRole>,
    ) -> Result<Vec<CohortMember>> {
        self.list_cohort_members_impl(cohort_id, role).await
    }

    async fn list_user_memberships(&self, user_id: i64) -> Result<Vec<CohortMembership>> {
        self.list_user_memberships_impl(user_id).await
    }

    async fn list_user_cohorts(
        &self,
        user_id: i64,
        role: Option<CohortRole>,
    ) -> Result<Vec<Cohort>> {
        self.list_user_cohorts_impl(user_id, role).await
    }

    async fn count_cohort_members(&self, cohort_id: i64, role: Option<CohortRole>) -> Result<i64> {
        self.count_cohort_members_impl(cohort_id, role).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn list_assignments_by_cohorts(&self, cohort_ids: &[i64]) -> Result<Vec<Assignment>> {
        self.list_assignments_by_cohorts_impl(cohort_ids).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn get_highest_score(&self, assignment_id: i64) -> Result<Option<f64>> {
        self.get_highest_score_impl(assignment_id).await
    }

    async fn count_assignments(&self) -> Result<u64> {
        self.count_assignments_impl().await
    }

    async fn count_expected_submissions(&self) -> Result<u64> {
        self.count_expected_submissions_impl().await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_assignment_and_student_impl(assignment_id, student_id)
            .await
    }

    async fn list_submissions_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        self.list_submissions_by_assignment_impl(assignment_id)
            .await
    }

    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<MySubmissionItem>> {
        self.list_submissions_by_student_impl(student_id).await
    }

    async fn list_submissions_by_assignments(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        self.list_submissions_by_assignments_impl(assignment_ids)
            .await
    }

    async fn grade_submission(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(id, score, feedback, graded_by)
            .await
    }

    async fn list_ungraded_submissions(
        &self,
        cohort_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        self.list_ungraded_submissions_impl(cohort_ids, limit).await
    }

    async fn count_submissions(&self) -> Result<(u64, u64)> {
        self.count_submissions_impl().await
    }

    // 考勤模块
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<AttendanceRecord> {
        self.upsert_attendance_impl(record).await
    }

    async fn list_attendance(
        &self,
        cohort_id: i64,
        session_date: Option<&str>,
        user_id: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_impl(cohort_id, session_date, user_id)
            .await
    }

    async fn list_user_attendance(&self, user_id: i64) -> Result<Vec<AttendanceRecord>> {
        self.list_user_attendance_impl(user_id).await
    }

    // 论坛模块
    async fn create_forum_post(
        &self,
        author_id: i64,
        post: CreatePostRequest,
    ) -> Result<ForumPost> {
        self.create_forum_post_impl(author_id, post).await
    }

    async fn get_forum_post(&self, id: i64) -> Result<Option<ForumPost>> {
        self.get_forum_post_impl(id).await
    }

    async fn list_forum_posts_with_pagination(
        &self,
        query: ForumPostListQuery,
    ) -> Result<ForumPostListResponse> {
        self.list_forum_posts_with_pagination_impl(query).await
    }

    async fn delete_forum_post(&self, id: i64) -> Result<bool> {
        self.delete_forum_post_impl(id).await
    }

    async fn create_forum_answer(
        &self,
        post_id: i64,
        author_id: i64,
        body: String,
    ) -> Result<ForumAnswer> {
        self.create_forum_answer_impl(post_id, author_id, body)
            .await
    }

    async fn get_forum_answer(&self, id: i64) -> Result<Option<ForumAnswer>> {
        self.get_forum_answer_impl(id).await
    }

    async fn list_forum_answers(&self, post_id: i64) -> Result<Vec<ForumAnswer>> {
        self.list_forum_answers_impl(post_id).await
    }

    async fn solve_forum_post(
        &self,
        post_id: i64,
        answer_id: i64,
    ) -> Result<Option<(ForumPost, ForumAnswer)>> {
        self.solve_forum_post_impl(post_id, answer_id).await
    }

    async fn set_answer_endorsement(
        &self,
        answer_id: i64,
        endorsed_by: Option<i64>,
    ) -> Result<Option<ForumAnswer>> {
        self.set_answer_endorsement_impl(answer_id, endorsed_by)
            .await
    }

    async fn list_unanswered_posts(
        &self,
        cohort_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<ForumPost>> {
        self.list_unanswered_posts_impl(cohort_ids, limit).await
    }

    // 积分与徽章模块
    async fn record_point_event(&self, award: PointAward) -> Result<Option<PointEvent>> {
        self.record_point_event_impl(award).await
    }

    async fn list_point_events(&self, user_id: i64) -> Result<Vec<PointEvent>> {
        self.list_point_events_impl(user_id).await
    }

    async fn sum_points_by_user(&self, user_ids: Option<&[i64]>) -> Result<Vec<(i64, i64)>> {
        self.sum_points_by_user_impl(user_ids).await
    }

    async fn get_user_stats(&self, user_id: i64) -> Result<UserStats> {
        self.get_user_stats_impl(user_id).await
    }

    async fn list_badges(&self) -> Result<Vec<Badge>> {
        self.list_badges_impl().await
    }

    async fn get_badge_by_code(&self, code: &str) -> Result<Option<Badge>> {
        self.get_badge_by_code_impl(code).await
    }

    async fn create_badge(&self, badge: NewBadge) -> Result<Badge> {
        self.create_badge_impl(badge).await
    }

    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<EarnedBadge>> {
        self.list_user_badges_impl(user_id).await
    }

    async fn award_badge(&self, user_id: i64, badge_id: i64) -> Result<bool> {
        self.award_badge_impl(user_id, badge_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("skilllink.db").unwrap(),
            "sqlite://skilllink.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("oracle://x").is_err());
    }
}
