use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumPostListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub cohort_id: i64,
    pub solved: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ForumPostListQuery {
    pub page: u64,
    pub size: u64,
    pub cohort_id: i64,
    pub solved: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct CreatePostRequest {
    pub cohort_id: i64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct CreateAnswerRequest {
    pub body: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct SolvePostRequest {
    pub answer_id: i64,
}
