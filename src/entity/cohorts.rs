//! 班期实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cohorts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub status: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cohort_users::Entity")]
    CohortUsers,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
}

impl Related<super::cohort_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CohortUsers.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_cohort(self) -> crate::models::cohorts::entities::Cohort {
        use crate::models::cohorts::entities::{Cohort, CohortStatus};

        Cohort {
            id: self.id,
            name: self.name,
            description: self.description,
            start_date: self.start_date.map(ts_to_datetime),
            end_date: self.end_date.map(ts_to_datetime),
            status: self
                .status
                .parse::<CohortStatus>()
                .unwrap_or(CohortStatus::Active),
            created_by: self.created_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
