use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub cohort_id: Option<i64>,
}

// 存储层查询，cohort_ids 为空表示不限制
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: u64,
    pub size: u64,
    pub cohort_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub cohort_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub max_score: Option<f64>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmitAssignmentRequest {
    pub content: String,
    /// 第三方媒体托管地址
    pub attachment_url: Option<String>,
}
