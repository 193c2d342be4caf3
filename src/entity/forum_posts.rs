//! 论坛帖子实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "forum_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub cohort_id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub is_solved: bool,
    pub solved_answer_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::forum_answers::Entity")]
    Answers,
}

impl Related<super::forum_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_post(self) -> crate::models::forum::entities::ForumPost {
        crate::models::forum::entities::ForumPost {
            id: self.id,
            cohort_id: self.cohort_id,
            author_id: self.author_id,
            title: self.title,
            body: self.body,
            is_solved: self.is_solved,
            solved_answer_id: self.solved_answer_id,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
