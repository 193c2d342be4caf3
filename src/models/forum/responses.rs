use serde::Serialize;
use ts_rs::TS;

use super::entities::{ForumAnswer, ForumPost};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumPostListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub post: ForumPost,
    pub answer_count: i64,
    pub author: Option<UserSummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumPostListResponse {
    pub items: Vec<ForumPostListItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumAnswerItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub answer: ForumAnswer,
    pub author: Option<UserSummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumPostDetailResponse {
    pub post: ForumPost,
    pub author: Option<UserSummary>,
    pub answers: Vec<ForumAnswerItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct SolvePostResponse {
    pub post: ForumPost,
    pub accepted_answer: ForumAnswer,
}
