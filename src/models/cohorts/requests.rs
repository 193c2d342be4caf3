use serde::Deserialize;
use ts_rs::TS;

use super::entities::{CohortRole, CohortStatus};
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct CohortListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub status: Option<CohortStatus>,
}

// 存储层查询，member_id 为空时不过滤成员
#[derive(Debug, Clone, Default)]
pub struct CohortListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
    pub status: Option<CohortStatus>,
    pub member_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct CreateCohortRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct UpdateCohortRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<CohortStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct AddMemberRequest {
    pub user_id: i64,
    pub role: CohortRole,
}
