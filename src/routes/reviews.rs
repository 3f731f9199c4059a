//! # 리뷰 라우트 핸들러
//!
//! - `GET  /api/guides/{id}/reviews` → 최신순 페이지 목록
//! - `POST /api/guides/{id}/reviews` → 리뷰 작성 (가이드당 1개)
//! - `PATCH`/`DELETE /api/reviews/{id}` → 작성자만

use crate::{
    db,
    error::AppError,
    extract::{Json, Path, Query},
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::validation,
};
use axum::{extract::State, http::StatusCode};

/// 빈 코멘트는 None으로 저장
fn clean_comment(comment: Option<&str>) -> Option<&str> {
    comment.map(str::trim).filter(|c| !c.is_empty())
}

async fn owned_review(state: &AppState, id: &str, user_id: &str) -> Result<Review, AppError> {
    let review = db::reviews::get_review(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if review.user_id != user_id {
        return Err(AppError::Forbidden(
            "Only the review's author can modify it".to_string(),
        ));
    }
    Ok(review)
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(guide_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<Review>>, AppError> {
    db::guides::get_guide(&state.pool, &guide_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let (reviews, total) = db::reviews::list_reviews_for_guide(&state.pool, &guide_id, &page).await?;
    Ok(Json(Paginated::new(reviews, &page, total)))
}

pub async fn create_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(guide_id): Path<String>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    validation::validate_review(Some(req.rating), req.comment.as_deref())?;

    db::guides::get_guide(&state.pool, &guide_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if db::reviews::find_user_review(&state.pool, &guide_id, &auth_user.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "You have already reviewed this guide".to_string(),
        ));
    }

    let review = db::reviews::create_review(
        &state.pool,
        &guide_id,
        &auth_user.user_id,
        req.rating,
        clean_comment(req.comment.as_deref()),
    )
    .await
    .map_err(|e| e.unique_as_conflict("You have already reviewed this guide"))?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, AppError> {
    owned_review(&state, &id, &auth_user.user_id).await?;
    validation::validate_review(req.rating, req.comment.as_deref())?;

    let review = db::reviews::update_review(
        &state.pool,
        &id,
        req.rating,
        clean_comment(req.comment.as_deref()),
    )
    .await?
    .ok_or(AppError::NotFound)?;
    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    owned_review(&state, &id, &auth_user.user_id).await?;

    if !db::reviews::soft_delete_review(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
