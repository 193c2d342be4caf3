use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::forum::requests::{
    CreateAnswerRequest, CreatePostRequest, ForumPostListParams, SolvePostRequest,
};
use crate::services::ForumService;
use crate::utils::SafeIDI64;

static FORUM_SERVICE: Lazy<ForumService> = Lazy::new(ForumService::new_lazy);

pub async fn list_posts(
    req: HttpRequest,
    query: web::Query<ForumPostListParams>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.list_posts(query.into_inner(), &req).await
}

pub async fn create_post(
    req: HttpRequest,
    post_data: web::Json<CreatePostRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.create_post(post_data.into_inner(), &req).await
}

pub async fn get_post(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.get_post(id.0, &req).await
}

pub async fn delete_post(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.delete_post(id.0, &req).await
}

pub async fn create_answer(
    req: HttpRequest,
    id: SafeIDI64,
    answer_data: web::Json<CreateAnswerRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .create_answer(id.0, answer_data.into_inner(), &req)
        .await
}

pub async fn solve_post(
    req: HttpRequest,
    id: SafeIDI64,
    solve_data: web::Json<SolvePostRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .solve_post(id.0, solve_data.into_inner(), &req)
        .await
}

pub async fn endorse_answer(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.toggle_endorsement(id.0, &req).await
}

pub fn configure_forum_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/forum")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/posts")
                    .route(web::get().to(list_posts))
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(get_post))
                    .route(web::delete().to(delete_post)),
            )
            .route("/posts/{id}/answers", web::post().to(create_answer))
            .route("/posts/{id}/solve", web::post().to(solve_post))
            .route("/answers/{id}/endorse", web::post().to(endorse_answer)),
    );
}
