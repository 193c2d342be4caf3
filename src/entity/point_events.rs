//! 积分流水实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "point_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub cohort_id: Option<i64>,
    pub source: String,
    pub reference_id: i64,
    pub points: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_point_event(self) -> Option<crate::models::gamification::entities::PointEvent> {
        use crate::models::gamification::entities::{PointEvent, PointSource};

        let source = self.source.parse::<PointSource>().ok()?;
        Some(PointEvent {
            id: self.id,
            user_id: self.user_id,
            cohort_id: self.cohort_id,
            source,
            reference_id: self.reference_id,
            points: self.points,
            created_at: ts_to_datetime(self.created_at),
        })
    }
}
