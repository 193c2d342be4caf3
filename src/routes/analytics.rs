use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::cohorts::entities::CohortRole;
use crate::models::users::entities::UserRole;
use crate::services::AnalyticsService;
use crate::utils::SafeCohortIdI64;

static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);

pub async fn cohort_analytics(
    req: HttpRequest,
    cohort_id: SafeCohortIdI64,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.cohort_analytics(cohort_id.0, &req).await
}

pub async fn platform_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.platform_overview(&req).await
}

pub fn configure_analytics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/analytics")
            .wrap(middlewares::RequireJWT)
            .route(
                "/overview",
                web::get()
                    .to(platform_overview)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .route(
                "/cohorts/{cohort_id}",
                web::get()
                    .to(cohort_analytics)
                    // 班期讲师，管理员直接放行
                    .wrap(middlewares::RequireCohortRole::new(&CohortRole::Facilitator)),
            ),
    );
}
