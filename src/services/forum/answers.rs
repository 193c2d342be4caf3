use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ForumService, load_post_with_access, validate_body};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, forum::requests::CreateAnswerRequest,
    gamification::entities::PointSource,
};
use crate::services::{
    forbidden_response, gamification::award_points, storage_error_response,
    unauthorized_response,
};

pub async fn create_answer(
    service: &ForumService,
    post_id: i64,
    answer_data: CreateAnswerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (post, access) =
        match load_post_with_access(storage.as_ref(), &user, post_id, "Failed to create answer")
            .await
        {
            Ok(found) => found,
            Err(response) => return Ok(response),
        };
    if !access.can_view() {
        return Ok(forbidden_response("No permission for this cohort"));
    }

    let body = match validate_body(&answer_data.body) {
        Ok(body) => body,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ForumContentEmpty, msg)));
        }
    };

    let answer = match storage.create_forum_answer(post_id, user.id, body).await {
        Ok(answer) => answer,
        Err(e) => return Ok(storage_error_response(e, "Failed to create answer")),
    };

    award_points(
        storage.as_ref(),
        user.id,
        Some(post.cohort_id),
        PointSource::ForumAnswer,
        answer.id,
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        answer,
        "Answer created successfully",
    )))
}
