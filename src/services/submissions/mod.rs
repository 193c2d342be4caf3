pub mod detail;
pub mod grade;
pub mod my;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 当前用户的全部提交
    pub async fn list_my_submissions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        my::list_my_submissions(self, request).await
    }

    /// 获取提交详情
    pub async fn get_submission(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, submission_id, request).await
    }

    /// 评分，重复评分覆盖之前的成绩
    pub async fn grade_submission(
        &self,
        submission_id: i64,
        grade_data: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, submission_id, grade_data, request).await
    }
}
