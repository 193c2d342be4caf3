use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::gamification::requests::{CreateBadgeRequest, LeaderboardParams};
use crate::models::users::entities::UserRole;
use crate::services::GamificationService;
use crate::utils::SafeIDI64;

static GAMIFICATION_SERVICE: Lazy<GamificationService> =
    Lazy::new(GamificationService::new_lazy);

pub async fn my_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    GAMIFICATION_SERVICE.my_profile(&req).await
}

pub async fn user_profile(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GAMIFICATION_SERVICE.user_profile(id.0, &req).await
}

pub async fn leaderboard(
    req: HttpRequest,
    query: web::Query<LeaderboardParams>,
) -> ActixResult<HttpResponse> {
    GAMIFICATION_SERVICE
        .leaderboard(query.into_inner(), &req)
        .await
}

pub async fn list_badges(req: HttpRequest) -> ActixResult<HttpResponse> {
    GAMIFICATION_SERVICE.list_badges(&req).await
}

pub async fn create_badge(
    req: HttpRequest,
    badge_data: web::Json<CreateBadgeRequest>,
) -> ActixResult<HttpResponse> {
    GAMIFICATION_SERVICE
        .create_badge(badge_data.into_inner(), &req)
        .await
}

pub fn configure_gamification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/gamification")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(my_profile))
            .route(
                "/users/{id}",
                web::get()
                    .to(user_profile)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .route("/leaderboard", web::get().to(leaderboard))
            .service(
                web::resource("/badges").route(web::get().to(list_badges)).route(
                    web::post()
                        .to(create_badge)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
