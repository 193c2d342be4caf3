use serde::Serialize;
use ts_rs::TS;

use super::entities::Assignment;
use crate::models::common::PaginationInfo;
use crate::models::submissions::entities::Submission;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
    pub pagination: PaginationInfo,
}

/// 作业详情，学员会附带自己的提交
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentDetailResponse {
    pub assignment: Assignment,
    pub my_submission: Option<Submission>,
}
