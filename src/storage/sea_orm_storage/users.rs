use super::{SeaOrmStorage, map_unique};
use crate::entity::forum_answers::{Column as AnswerColumn, Entity as ForumAnswers};
use crate::entity::forum_posts::{Column as PostColumn, Entity as ForumPosts};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SkillLinkError};
use crate::models::{
    PaginationInfo,
    analytics::responses::UserRoleCounts,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
    sea_query::{Expr, Query},
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            avatar_url: Set(req.avatar_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_unique(e, "用户名或邮箱已存在", "创建用户失败"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量获取用户
    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::DisplayName.contains(&escaped)),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.as_str()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                SkillLinkError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息，password 为已哈希的密码
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }
        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| map_unique(e, "邮箱已被使用", "更新用户失败"))?;

        Ok(Some(result.into_user()))
    }

    /// 删除用户
    /// 删除用户
    ///
    /// 成员关系、提交、考勤、帖子、回答、徽章和积分随外键级联删除。
    /// 该用户创建的班期与作业保留，`created_by` 置空。
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("开启事务失败: {e}")))?;

        // 他人帖子采纳的是该用户的回答时，帖子回到未解决
        let own_answers = Query::select()
            .column(AnswerColumn::Id)
            .from(ForumAnswers)
            .and_where(AnswerColumn::AuthorId.eq(id))
            .to_owned();
        ForumPosts::update_many()
            .col_expr(PostColumn::IsSolved, Expr::value(false))
            .col_expr(PostColumn::SolvedAnswerId, Expr::value(Option::<i64>::None))
            .col_expr(PostColumn::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(PostColumn::SolvedAnswerId.in_subquery(own_answers))
            .exec(&txn)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("更新帖子失败: {e}")))?;

        let result = Users::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("删除用户失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按角色统计用户数量
    pub async fn count_users_by_role_impl(&self) -> Result<UserRoleCounts> {
        let count_role = |role: UserRole| async move {
            Users::find()
                .filter(Column::Role.eq(role.as_str()))
                .count(&self.db)
                .await
                .map(|count| count as i64)
                .map_err(|e| {
                    SkillLinkError::database_operation(format!("统计用户数量失败: {e}"))
                })
        };

        let (admin, facilitator, student) = tokio::try_join!(
            count_role(UserRole::Admin),
            count_role(UserRole::Facilitator),
            count_role(UserRole::Student),
        )?;

        Ok(UserRoleCounts {
            admin,
            facilitator,
            student,
        })
    }
}
