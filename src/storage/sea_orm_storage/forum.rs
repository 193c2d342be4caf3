//! 论坛存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::forum_answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as ForumAnswers,
};
use crate::entity::forum_posts::{ActiveModel, Column, Entity as ForumPosts};
use crate::errors::{Result, SkillLinkError};
use crate::models::{
    PaginationInfo,
    forum::{
        entities::{ForumAnswer, ForumPost},
        requests::{CreatePostRequest, ForumPostListQuery},
        responses::{ForumPostListItem, ForumPostListResponse},
    },
    users::entities::UserSummary,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Query},
};

impl SeaOrmStorage {
    /// 发帖
    pub async fn create_forum_post_impl(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<ForumPost> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            cohort_id: Set(req.cohort_id),
            author_id: Set(author_id),
            title: Set(req.title),
            body: Set(req.body),
            is_solved: Set(false),
            solved_answer_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("发帖失败: {e}")))?;

        Ok(result.into_post())
    }

    pub async fn get_forum_post_impl(&self, id: i64) -> Result<Option<ForumPost>> {
        let result = ForumPosts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询帖子失败: {e}")))?;

        Ok(result.map(|m| m.into_post()))
    }

    /// 分页列出帖子，附带回答数与作者信息
    pub async fn list_forum_posts_with_pagination_impl(
        &self,
        query: ForumPostListQuery,
    ) -> Result<ForumPostListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = ForumPosts::find().filter(Column::CohortId.eq(query.cohort_id));
        if let Some(solved) = query.solved {
            select = select.filter(Column::IsSolved.eq(solved));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Body.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询帖子总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询帖子页数失败: {e}")))?;
        let posts = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询帖子列表失败: {e}")))?;

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let mut author_ids: Vec<i64> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let answer_counts: HashMap<i64, i64> = if post_ids.is_empty() {
            HashMap::new()
        } else {
            ForumAnswers::find()
                .select_only()
                .column(AnswerColumn::PostId)
                .column_as(AnswerColumn::Id.count(), "answer_count")
                .filter(AnswerColumn::PostId.is_in(post_ids))
                .group_by(AnswerColumn::PostId)
                .into_tuple::<(i64, i64)>()
                .all(&self.db)
                .await
                .map_err(|e| {
                    SkillLinkError::database_operation(format!("统计回答数量失败: {e}"))
                })?
                .into_iter()
                .collect()
        };

        let authors: HashMap<i64, UserSummary> = self
            .get_users_by_ids_impl(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let items = posts
            .into_iter()
            .map(|post| ForumPostListItem {
                answer_count: answer_counts.get(&post.id).copied().unwrap_or(0),
                author: authors.get(&post.author_id).cloned(),
                post: post.into_post(),
            })
            .collect();

        Ok(ForumPostListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 删除帖子，回答由外键级联删除
    pub async fn delete_forum_post_impl(&self, id: i64) -> Result<bool> {
        let result = ForumPosts::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("删除帖子失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 回答帖子
    pub async fn create_forum_answer_impl(
        &self,
        post_id: i64,
        author_id: i64,
        body: String,
    ) -> Result<ForumAnswer> {
        let now = chrono::Utc::now().timestamp();

        let model = AnswerActiveModel {
            post_id: Set(post_id),
            author_id: Set(author_id),
            body: Set(body),
            is_accepted: Set(false),
            is_endorsed: Set(false),
            endorsed_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("回答失败: {e}")))?;

        Ok(result.into_answer())
    }

    pub async fn get_forum_answer_impl(&self, id: i64) -> Result<Option<ForumAnswer>> {
        let result = ForumAnswers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询回答失败: {e}")))?;

        Ok(result.map(|m| m.into_answer()))
    }

    pub async fn list_forum_answers_impl(&self, post_id: i64) -> Result<Vec<ForumAnswer>> {
        let rows = ForumAnswers::find()
            .filter(AnswerColumn::PostId.eq(post_id))
            .order_by_asc(AnswerColumn::CreatedAt)
            .order_by_asc(AnswerColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询回答列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_answer()).collect())
    }

    /// 采纳回答，在事务中取消之前的采纳
    pub async fn solve_forum_post_impl(
        &self,
        post_id: i64,
        answer_id: i64,
    ) -> Result<Option<(ForumPost, ForumAnswer)>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(post) = ForumPosts::find_by_id(post_id)
            .one(&txn)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询帖子失败: {e}")))?
        else {
            return Ok(None);
        };

        let Some(answer) = ForumAnswers::find_by_id(answer_id)
            .filter(AnswerColumn::PostId.eq(post_id))
            .one(&txn)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询回答失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        ForumAnswers::update_many()
            .col_expr(AnswerColumn::IsAccepted, Expr::value(false))
            .col_expr(AnswerColumn::UpdatedAt, Expr::value(now))
            .filter(AnswerColumn::PostId.eq(post_id))
            .filter(AnswerColumn::IsAccepted.eq(true))
            .filter(AnswerColumn::Id.ne(answer_id))
            .exec(&txn)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("取消采纳失败: {e}")))?;

        let mut answer: AnswerActiveModel = answer.into();
        answer.is_accepted = Set(true);
        answer.updated_at = Set(now);
        let answer = answer
            .update(&txn)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("采纳回答失败: {e}")))?;

        let mut post: ActiveModel = post.into();
        post.is_solved = Set(true);
        post.solved_answer_id = Set(Some(answer_id));
        post.updated_at = Set(now);
        let post = post
            .update(&txn)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("更新帖子失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some((post.into_post(), answer.into_answer())))
    }

    /// 设置或取消认可，endorsed_by 为 None 时取消
    pub async fn set_answer_endorsement_impl(
        &self,
        answer_id: i64,
        endorsed_by: Option<i64>,
    ) -> Result<Option<ForumAnswer>> {
        let Some(answer) = ForumAnswers::find_by_id(answer_id)
            .one(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("查询回答失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: AnswerActiveModel = answer.into();
        model.is_endorsed = Set(endorsed_by.is_some());
        model.endorsed_by = Set(endorsed_by);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("更新认可状态失败: {e}")))?;

        Ok(Some(result.into_answer()))
    }

    /// 还没有任何回答的帖子，最早的在前
    pub async fn list_unanswered_posts_impl(
        &self,
        cohort_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<ForumPost>> {
        if cohort_ids.is_empty() {
            return Ok(Vec::new());
        }

        let answered = Query::select()
            .column(AnswerColumn::PostId)
            .from(ForumAnswers)
            .to_owned();

        let rows = ForumPosts::find()
            .filter(Column::CohortId.is_in(cohort_ids.iter().copied()))
            .filter(Column::Id.not_in_subquery(answered))
            .order_by_asc(Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| {
                SkillLinkError::database_operation(format!("查询未回答帖子失败: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_post()).collect())
    }

    /// 被采纳的回答数量，用于徽章统计
    pub(crate) async fn count_accepted_answers_by_author(&self, author_id: i64) -> Result<i64> {
        // 自己帖子下被采纳的回答不计入
        let own_posts = Query::select()
            .column(Column::Id)
            .from(ForumPosts)
            .and_where(Column::AuthorId.eq(author_id))
            .to_owned();

        let count = ForumAnswers::find()
            .filter(AnswerColumn::AuthorId.eq(author_id))
            .filter(AnswerColumn::IsAccepted.eq(true))
            .filter(AnswerColumn::PostId.not_in_subquery(own_posts))
            .count(&self.db)
            .await
            .map_err(|e| SkillLinkError::database_operation(format!("统计回答数量失败: {e}")))?;

        Ok(count as i64)
    }
}
