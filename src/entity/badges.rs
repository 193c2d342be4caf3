//! 徽章实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "badges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub criterion: String,
    pub threshold: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_badges::Entity")]
    UserBadges,
}

impl Related<super::user_badges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBadges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 未知的判定条件返回 None，调用方跳过该徽章
    pub fn into_badge(self) -> Option<crate::models::gamification::entities::Badge> {
        use crate::models::gamification::entities::{Badge, BadgeCriterion};

        let criterion = self.criterion.parse::<BadgeCriterion>().ok()?;
        Some(Badge {
            id: self.id,
            code: self.code,
            name: self.name,
            description: self.description,
            icon: self.icon,
            criterion,
            threshold: self.threshold,
            created_at: ts_to_datetime(self.created_at),
        })
    }
}
