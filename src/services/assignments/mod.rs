pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod submissions;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        entities::Assignment,
        requests::{
            AssignmentListParams, CreateAssignmentRequest, SubmitAssignmentRequest,
            UpdateAssignmentRequest,
        },
    },
    users::entities::User,
};
use crate::services::{access::CohortAccess, storage_error_response};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_assignments(
        &self,
        query: AssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, query, request).await
    }

    pub async fn create_assignment(
        &self,
        assignment_data: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, assignment_data, request).await
    }

    pub async fn get_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, assignment_id, request).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        update_data: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, assignment_id, update_data, request).await
    }

    pub async fn delete_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, assignment_id, request).await
    }

    // 学员提交作业
    pub async fn submit_assignment(
        &self,
        assignment_id: i64,
        submit_data: SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, assignment_id, submit_data, request).await
    }

    // 作业下的全部提交
    pub async fn list_submissions(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, assignment_id, request).await
    }
}

/// 取出作业和当前用户在其班期中的身份，失败时直接给出响应
pub(crate) async fn load_with_access(
    storage: &dyn Storage,
    user: &User,
    assignment_id: i64,
    context: &str,
) -> Result<(Assignment, CohortAccess), HttpResponse> {
    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Err(storage_error_response(e, context)),
    };

    match CohortAccess::resolve(storage, user, assignment.cohort_id).await {
        Ok(access) => Ok((assignment, access)),
        Err(e) => Err(storage_error_response(e, context)),
    }
}

/// 满分必须为正数
pub(crate) fn validate_max_score(max_score: f64) -> Result<(), &'static str> {
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err("Max score must be greater than 0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_max_score() {
        assert!(validate_max_score(100.0).is_ok());
        assert!(validate_max_score(0.5).is_ok());
        assert!(validate_max_score(0.0).is_err());
        assert!(validate_max_score(-10.0).is_err());
        assert!(validate_max_score(f64::NAN).is_err());
    }
}
