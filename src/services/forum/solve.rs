use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ForumService, load_post_with_access};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    forum::{requests::SolvePostRequest, responses::SolvePostResponse},
    gamification::entities::PointSource,
};
use crate::services::{
    forbidden_response, gamification::award_points, storage_error_response,
    unauthorized_response,
};

pub async fn solve_post(
    service: &ForumService,
    post_id: i64,
    solve_data: SolvePostRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized_response());
    };

    let (post, access) =
        match load_post_with_access(storage.as_ref(), &user, post_id, "Failed to solve post")
            .await
        {
            Ok(found) => found,
            Err(response) => return Ok(response),
        };

    if post.author_id != user.id && !access.can_manage() {
        return Ok(forbidden_response(
            "Only the post author or a cohort facilitator can accept an answer",
        ));
    }

    match storage.get_forum_answer(solve_data.answer_id).await {
        Ok(Some(answer)) if answer.post_id == post_id => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ForumAnswerMismatch,
                "Answer does not belong to this post",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ForumAnswerNotFound,
                "Answer not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to solve post")),
    }

    let (post, accepted_answer) = match storage
        .solve_forum_post(post_id, solve_data.answer_id)
        .await
    {
        Ok(Some(solved)) => solved,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ForumAnswerNotFound,
                "Answer not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, "Failed to solve post")),
    };

    // 自己的回答被采纳不加分
    if accepted_answer.author_id != user.id && accepted_answer.author_id != post.author_id {
        award_points(
            storage.as_ref(),
            accepted_answer.author_id,
            Some(post.cohort_id),
            PointSource::AnswerAccepted,
            accepted_answer.id,
        )
        .await;
    }

    tracing::info!(
        "Post {} solved with answer {} by user {}",
        post_id,
        accepted_answer.id,
        user.id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SolvePostResponse {
            post,
            accepted_answer,
        },
        "Answer accepted successfully",
    )))
}
