use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::cohorts::entities::CohortRole;
use crate::models::cohorts::requests::{
    AddMemberRequest, CohortListParams, CreateCohortRequest, UpdateCohortRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CohortService;
use crate::utils::{SafeCohortIdI64, SafeUserIdI64};

static COHORT_SERVICE: Lazy<CohortService> = Lazy::new(CohortService::new_lazy);

pub async fn list_cohorts(
    req: HttpRequest,
    query: web::Query<CohortListParams>,
) -> ActixResult<HttpResponse> {
    COHORT_SERVICE.list_cohorts(query.into_inner(), &req).await
}

pub async fn create_cohort(
    req: HttpRequest,
    cohort_data: web::Json<CreateCohortRequest>,
) -> ActixResult<HttpResponse> {
    COHORT_SERVICE
        .create_cohort(cohort_data.into_inner(), &req)
        .await
}

pub async fn get_cohort(req: HttpRequest, cohort_id: SafeCohortIdI64) -> ActixResult<HttpResponse> {
    COHORT_SERVICE.get_cohort(cohort_id.0, &req).await
}

pub async fn update_cohort(
    req: HttpRequest,
    cohort_id: SafeCohortIdI64,
    update_data: web::Json<UpdateCohortRequest>,
) -> ActixResult<HttpResponse> {
    COHORT_SERVICE
        .update_cohort(cohort_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_cohort(
    req: HttpRequest,
    cohort_id: SafeCohortIdI64,
) -> ActixResult<HttpResponse> {
    COHORT_SERVICE.delete_cohort(cohort_id.0, &req).await
}

pub async fn list_members(
    req: HttpRequest,
    cohort_id: SafeCohortIdI64,
) -> ActixResult<HttpResponse> {
    COHORT_SERVICE.list_members(cohort_id.0, &req).await
}

pub async fn add_member(
    req: HttpRequest,
    cohort_id: SafeCohortIdI64,
    member_data: web::Json<AddMemberRequest>,
) -> ActixResult<HttpResponse> {
    COHORT_SERVICE
        .add_member(cohort_id.0, member_data.into_inner(), &req)
        .await
}

pub async fn remove_member(
    req: HttpRequest,
    cohort_id: SafeCohortIdI64,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    COHORT_SERVICE
        .remove_member(cohort_id.0, user_id.0, &req)
        .await
}

pub fn configure_cohort_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/cohorts")
            .wrap(middlewares::RequireJWT)
            .service(
                // 管理员看到全部班期，其他用户只看到自己所在的班期
                web::resource("").route(web::get().to(list_cohorts)).route(
                    web::post()
                        .to(create_cohort)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                // 班期内接口要求成员身份，管理员直接放行
                web::scope("/{cohort_id}")
                    .wrap(middlewares::RequireCohortRole::new_any(
                        CohortRole::all_roles(),
                    ))
                    .service(
                        web::resource("")
                            .route(web::get().to(get_cohort))
                            .route(
                                web::put().to(update_cohort).wrap(
                                    middlewares::RequireRole::new_any(UserRole::admin_roles()),
                                ),
                            )
                            .route(
                                web::delete().to(delete_cohort).wrap(
                                    middlewares::RequireRole::new_any(UserRole::admin_roles()),
                                ),
                            ),
                    )
                    .service(
                        web::resource("/members")
                            .route(web::get().to(list_members))
                            .route(
                                web::post().to(add_member).wrap(
                                    middlewares::RequireRole::new_any(UserRole::admin_roles()),
                                ),
                            ),
                    )
                    .service(
                        web::resource("/members/{user_id}").route(
                            web::delete().to(remove_member).wrap(
                                middlewares::RequireRole::new_any(UserRole::admin_roles()),
                            ),
                        ),
                    ),
            ),
    );
}
