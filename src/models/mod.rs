pub mod analytics;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod cohorts;
pub mod common;
pub mod dashboard;
pub mod forum;
pub mod gamification;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::{Serialize, Serializer};

/// 应用启动时间
#[derive(Debug, Clone, Copy)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 错误码
///
/// 按模块分段：
/// - 1xxx 通用
/// - 2xxx 认证
/// - 3xxx 用户
/// - 4xxx 班期
/// - 5xxx 作业与提交
/// - 6xxx 考勤
/// - 7xxx 论坛
/// - 8xxx 积分与徽章
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    PayloadTooLarge = 1013,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2003,
    RegisterFailed = 2010,

    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserNameAlreadyExists = 3004,
    UserEmailAlreadyExists = 3005,
    UserAlreadyExists = 3006,
    UserCreationFailed = 3007,
    UserUpdateFailed = 3008,
    UserDeleteFailed = 3009,
    CanNotDeleteCurrentUser = 3010,
    UserInactive = 3011,

    CohortNotFound = 4000,
    CohortNameInvalid = 4001,
    CohortAlreadyExists = 4002,
    CohortPermissionDenied = 4003,
    CohortMemberExists = 4004,
    CohortMemberNotFound = 4005,
    CohortRoleMismatch = 4006,
    CohortDateInvalid = 4007,

    AssignmentNotFound = 5000,
    AssignmentInvalid = 5001,
    SubmissionNotFound = 5100,
    SubmissionAlreadyExists = 5101,
    SubmissionContentEmpty = 5102,
    GradeOutOfRange = 5103,

    AttendanceInvalid = 6000,

    ForumPostNotFound = 7000,
    ForumAnswerNotFound = 7001,
    ForumContentEmpty = 7002,
    ForumAnswerMismatch = 7003,

    BadgeNotFound = 8000,
    BadgeAlreadyExists = 8001,
    BadgeInvalid = 8002,
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(*self as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Conflict as i32, 1009);
        assert_eq!(ErrorCode::SubmissionAlreadyExists as i32, 5101);
        assert_eq!(ErrorCode::GradeOutOfRange as i32, 5103);
    }

    #[test]
    fn test_error_code_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::RateLimitExceeded).unwrap();
        assert_eq!(json, "1029");
    }
}
