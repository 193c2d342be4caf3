use serde::Serialize;
use ts_rs::TS;

use super::entities::{Cohort, CohortMember};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct CohortListResponse {
    pub items: Vec<Cohort>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cohort.ts")]
pub struct CohortMemberListResponse {
    pub items: Vec<CohortMember>,
}
