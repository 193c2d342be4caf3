//! 论坛回答实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "forum_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
    pub is_accepted: bool,
    pub is_endorsed: bool,
    pub endorsed_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forum_posts::Entity",
        from = "Column::PostId",
        to = "super::forum_posts::Column::Id"
    )]
    Post,
}

impl Related<super::forum_posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::models::forum::entities::ForumAnswer {
        crate::models::forum::entities::ForumAnswer {
            id: self.id,
            post_id: self.post_id,
            author_id: self.author_id,
            body: self.body,
            is_accepted: self.is_accepted,
            is_endorsed: self.is_endorsed,
            endorsed_by: self.endorsed_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
