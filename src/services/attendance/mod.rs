pub mod list;
pub mod mark;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::requests::{
    AttendanceListParams, AttendanceSummaryParams, MarkAttendanceRequest,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 批量记录考勤，已存在的记录会被覆盖
    pub async fn mark_attendance(
        &self,
        mark_data: MarkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(self, mark_data, request).await
    }

    pub async fn list_attendance(
        &self,
        query: AttendanceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_attendance(self, query, request).await
    }

    pub async fn attendance_summary(
        &self,
        query: AttendanceSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::attendance_summary(self, query, request).await
    }
}
