use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学习营表
        manager
            .create_table(
                Table::create()
                    .table(Cohorts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cohorts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Cohorts::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cohorts::Description).text().null())
                    .col(ColumnDef::new(Cohorts::StartDate).big_integer().null())
                    .col(ColumnDef::new(Cohorts::EndDate).big_integer().null())
                    .col(ColumnDef::new(Cohorts::Status).string().not_null())
                    .col(ColumnDef::new(Cohorts::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Cohorts::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Cohorts::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Cohorts::Table, Cohorts::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学习营成员表
        manager
            .create_table(
                Table::create()
                    .table(CohortUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CohortUsers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CohortUsers::CohortId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CohortUsers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(CohortUsers::Role).string().not_null())
                    .col(
                        ColumnDef::new(CohortUsers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CohortUsers::Table, CohortUsers::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CohortUsers::Table, CohortUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CohortId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::MaxScore).double().not_null())
                    .col(ColumnDef::new(Assignments::DueDate).big_integer().null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表（评分字段直接内联）
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Content).text().not_null())
                    .col(ColumnDef::new(Submissions::AttachmentUrl).string().null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::IsLate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Submissions::Score).double().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::CohortId).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::SessionDate).string().not_null())
                    .col(ColumnDef::new(Attendance::Status).string().not_null())
                    .col(ColumnDef::new(Attendance::Note).string().null())
                    .col(ColumnDef::new(Attendance::MarkedBy).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::MarkedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建论坛帖子表
        manager
            .create_table(
                Table::create()
                    .table(ForumPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumPosts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForumPosts::CohortId).big_integer().not_null())
                    .col(ColumnDef::new(ForumPosts::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(ForumPosts::Title).string().not_null())
                    .col(ColumnDef::new(ForumPosts::Body).text().not_null())
                    .col(
                        ColumnDef::new(ForumPosts::IsSolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ForumPosts::SolvedAnswerId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(ForumPosts::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ForumPosts::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumPosts::Table, ForumPosts::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumPosts::Table, ForumPosts::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建论坛回答表
        manager
            .create_table(
                Table::create()
                    .table(ForumAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForumAnswers::PostId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ForumAnswers::AuthorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ForumAnswers::Body).text().not_null())
                    .col(
                        ColumnDef::new(ForumAnswers::IsAccepted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ForumAnswers::IsEndorsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ForumAnswers::EndorsedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ForumAnswers::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ForumAnswers::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumAnswers::Table, ForumAnswers::PostId)
                            .to(ForumPosts::Table, ForumPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumAnswers::Table, ForumAnswers::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_cohort_users_cohort_user")
                    .table(CohortUsers::Table)
                    .col(CohortUsers::CohortId)
                    .col(CohortUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_attendance_cohort_user_date")
                    .table(Attendance::Table)
                    .col(Attendance::CohortId)
                    .col(Attendance::UserId)
                    .col(Attendance::SessionDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 普通查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cohort_users_user_id")
                    .table(CohortUsers::Table)
                    .col(CohortUsers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_cohort_id")
                    .table(Assignments::Table)
                    .col(Assignments::CohortId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_student_id")
                    .table(Submissions::Table)
                    .col(Submissions::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_forum_posts_cohort_id")
                    .table(ForumPosts::Table)
                    .col(ForumPosts::CohortId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_forum_answers_post_id")
                    .table(ForumAnswers::Table)
                    .col(ForumAnswers::PostId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForumAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumPosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CohortUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cohorts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    AvatarUrl,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Cohorts {
    Table,
    Id,
    Name,
    Description,
    StartDate,
    EndDate,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CohortUsers {
    Table,
    Id,
    CohortId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    Id,
    CohortId,
    CreatedBy,
    Title,
    Description,
    MaxScore,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    AttachmentUrl,
    Status,
    IsLate,
    Score,
    Feedback,
    GradedBy,
    GradedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    CohortId,
    UserId,
    SessionDate,
    Status,
    Note,
    MarkedBy,
    MarkedAt,
}

#[derive(DeriveIden)]
enum ForumPosts {
    Table,
    Id,
    CohortId,
    AuthorId,
    Title,
    Body,
    IsSolved,
    SolvedAnswerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ForumAnswers {
    Table,
    Id,
    PostId,
    AuthorId,
    Body,
    IsAccepted,
    IsEndorsed,
    EndorsedBy,
    CreatedAt,
    UpdatedAt,
}
