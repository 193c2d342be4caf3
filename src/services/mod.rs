pub mod access;
pub mod analytics;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod cohorts;
pub mod dashboard;
pub mod forum;
pub mod gamification;
pub mod submissions;
pub mod users;

pub use analytics::AnalyticsService;
pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use cohorts::CohortService;
pub use dashboard::DashboardService;
pub use forum::ForumService;
pub use gamification::GamificationService;
pub use submissions::SubmissionService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::errors::SkillLinkError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!("Storage is not registered in app data");
            actix_web::error::ErrorInternalServerError("Storage not available")
        })
}

/// 存储层错误映射为 HTTP 响应
pub(crate) fn storage_error_response(err: SkillLinkError, context: &str) -> HttpResponse {
    match err {
        SkillLinkError::Conflict(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg))
        }
        SkillLinkError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg))
        }
        SkillLinkError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)),
        SkillLinkError::Authorization(msg) => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, msg))
        }
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{context}: {}", other.message()),
            ))
        }
    }
}

pub(crate) fn unauthorized_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

pub(crate) fn forbidden_response(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::CohortPermissionDenied,
        message,
    ))
}
