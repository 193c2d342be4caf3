use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::DashboardService;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn student_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.student_dashboard(&req).await
}

pub async fn facilitator_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.facilitator_dashboard(&req).await
}

pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireJWT)
            .route(
                "/student",
                web::get()
                    .to(student_dashboard)
                    .wrap(middlewares::RequireRole::new(&UserRole::Student)),
            )
            .route(
                "/facilitator",
                web::get()
                    .to(facilitator_dashboard)
                    .wrap(middlewares::RequireRole::new(&UserRole::Facilitator)),
            ),
    );
}
