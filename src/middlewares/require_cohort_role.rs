/*!
 * 基于班期成员角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，从路径参数 `{cohort_id}` 读取班期。
 * 管理员直接放行；其他用户必须是该班期成员且角色符合要求，
 * 通过后成员关系会放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/analytics/cohorts/{cohort_id}")
 *     .wrap(RequireCohortRole::new(&CohortRole::Facilitator))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{
        ErrorCode,
        cohorts::entities::{CohortMembership, CohortRole},
        users::entities::User,
    },
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireCohortRole {
    allowed_roles: Vec<CohortRole>,
}

impl RequireCohortRole {
    pub fn new(role: &CohortRole) -> Self {
        Self {
            allowed_roles: vec![*role],
        }
    }

    /// 任一班期角色即可
    pub fn new_any(roles: &[&CohortRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| **r).collect(),
        }
    }

    /// 从请求扩展中提取成员关系，管理员放行时为 None
    pub fn extract_membership(req: &actix_web::HttpRequest) -> Option<CohortMembership> {
        req.extensions().get::<CohortMembership>().cloned()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireCohortRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireCohortRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireCohortRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireCohortRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Vec<CohortRole>,
}

impl<S, B> Service<ServiceRequest> for RequireCohortRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            // 1. 当前用户
            let user_opt = req.extensions().get::<User>().cloned();
            let user = match user_opt {
                Some(user) => user,
                None => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Unauthorized: missing user claims",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 2. cohort_id
            let cohort_id = match req
                .match_info()
                .get("cohort_id")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0)
            {
                Some(id) => id,
                None => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::BAD_REQUEST,
                            ErrorCode::BadRequest,
                            "Missing or invalid cohort_id",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 3. 管理员直接放行
            if user.is_admin() {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            // 4. 成员关系
            let storage = match req.app_data::<web::Data<Arc<dyn Storage>>>() {
                Some(storage) => storage.get_ref().clone(),
                None => {
                    error!("Storage is not registered in app data");
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Internal server error",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            let membership = match storage.get_cohort_member(cohort_id, user.id).await {
                Ok(Some(membership)) => membership,
                Ok(None) => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::CohortPermissionDenied,
                            "No permission for this cohort",
                        )
                        .map_into_right_body(),
                    ));
                }
                Err(e) => {
                    error!("Failed to load membership of cohort {}: {}", cohort_id, e);
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Failed to check cohort membership",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 5. 角色判定
            if allowed_roles.contains(&membership.role) {
                debug!(
                    "Cohort member {} has role {} in cohort {}",
                    membership.user_id, membership.role, cohort_id
                );
                req.extensions_mut().insert(membership);
                Ok(srv.call(req).await?.map_into_left_body())
            } else {
                Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::CohortPermissionDenied,
                        "Access denied for this cohort role",
                    )
                    .map_into_right_body(),
                ))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};
    use actix_web::{App, HttpResponse, test};

    fn user(role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            avatar_url: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[actix_web::test]
    async fn test_missing_user_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::resource("/cohorts/{cohort_id}")
                    .wrap(RequireCohortRole::new(&CohortRole::Facilitator))
                    .to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/cohorts/5").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_admin_passes_without_membership() {
        let admin = user(UserRole::Admin);
        let app = test::init_service(
            App::new()
                .wrap_fn(move |req, srv| {
                    req.extensions_mut().insert(admin.clone());
                    srv.call(req)
                })
                .service(
                    web::resource("/cohorts/{cohort_id}")
                        .wrap(RequireCohortRole::new(&CohortRole::Facilitator))
                        .to(|| async { HttpResponse::Ok().finish() }),
                ),
        )
        .await;

        let req = test::TestRequest::get().uri("/cohorts/5").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
