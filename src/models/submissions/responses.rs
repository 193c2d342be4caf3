use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;
use crate::models::users::entities::UserSummary;

/// 提交列表项（包含提交者信息）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student: Option<UserSummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionWithStudent>,
}

/// 我的提交，附带作业标题和满分
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct MySubmissionItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub assignment_title: String,
    pub cohort_id: i64,
    pub max_score: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct MySubmissionListResponse {
    pub items: Vec<MySubmissionItem>,
}

/// 提交时返回，附带本次获得的积分
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitResponse {
    pub submission: Submission,
    pub points_awarded: i32,
}
