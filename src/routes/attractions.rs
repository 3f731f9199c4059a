//! # 명소(Attraction) 라우트 핸들러
//!
//! 목록은 이름/설명/주소 검색(`q`)과 태그(`tag`) 필터를 지원합니다.
//! 수정/삭제는 작성자만 가능합니다.

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

async fn owned_attraction(
    state: &AppState,
    id: &str,
    user_id: &str,
) -> Result<Attraction, AppError> {
    let attraction = db::attractions::get_attraction(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if attraction.creator_id != user_id {
        return Err(AppError::Forbidden(
            "Only the attraction's creator can modify it".to_string(),
        ));
    }
    Ok(attraction)
}

pub async fn list_attractions(
    State(state): State<AppState>,
    Query(filter): Query<AttractionFilter>,
) -> Result<Json<Paginated<Attraction>>, AppError> {
    let (attractions, total) = db::attractions::list_attractions(&state.pool, &filter).await?;
    Ok(Json(Paginated::new(attractions, &filter.page_params(), total)))
}

pub async fn get_attraction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Attraction>, AppError> {
    let attraction = db::attractions::get_attraction(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(attraction))
}

pub async fn create_attraction(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateAttractionRequest>,
) -> Result<(StatusCode, Json<Attraction>), AppError> {
    validation::validate_new_attraction(&req)?;
    let tags = validation::normalize_tags(&req.tags)?;

    let attraction =
        db::attractions::create_attraction(&state.pool, &auth_user.user_id, &req, &tags).await?;
    Ok((StatusCode::CREATED, Json(attraction)))
}

pub async fn update_attraction(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateAttractionRequest>,
) -> Result<Json<Attraction>, AppError> {
    let current = owned_attraction(&state, &id, &auth_user.user_id).await?;
    validation::validate_attraction_update(&req, &current)?;

    let tags = req
        .tags
        .as_deref()
        .map(validation::normalize_tags)
        .transpose()?;

    let attraction = db::attractions::update_attraction(&state.pool, &id, &req, tags.as_deref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(attraction))
}

pub async fn delete_attraction(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    owned_attraction(&state, &id, &auth_user.user_id).await?;

    if !db::attractions::soft_delete_attraction(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
