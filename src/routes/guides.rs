//! # 가이드(Guide) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/guides`                                  → 필터/정렬/페이지 목록
//! - `POST   /api/guides`                                  → 새 가이드 (로그인 필요)
//! - `GET    /api/guides/{id}`                             → 가이드 + 순서대로 정렬된 명소
//! - `PATCH  /api/guides/{id}`                             → 부분 수정 (작성자만)
//! - `DELETE /api/guides/{id}`                             → 소프트 삭제 (작성자만)
//! - `GET    /api/guides/{id}/attractions`                 → 연결된 명소 목록
//! - `POST   /api/guides/{id}/attractions`                 → 명소 연결 (작성자만)
//! - `DELETE /api/guides/{id}/attractions/{attraction_id}` → 연결 해제 (작성자만)
//!
//! 수정 계열 핸들러는 먼저 가이드를 조회해 없으면 404, 작성자가 아니면 403을 돌려줍니다.

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
use sqlx::SqlitePool;

/// 가이드를 조회하고 요청자가 작성자인지 확인합니다.
async fn owned_guide(pool: &SqlitePool, id: &str, user_id: &str) -> Result<Guide, AppError> {
    let guide = db::guides::get_guide(pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    if guide.creator_id != user_id {
        return Err(AppError::Forbidden(
            "Only the guide's creator can modify it".to_string(),
        ));
    }
    Ok(guide)
}

/// `GET /guides`: 쿼리 문자열 필터는 모두 선택입니다.
/// 예: `?q=paris&min_price=0&max_price=50&sort=rating&page=2`
pub async fn list_guides(
    State(state): State<AppState>,
    Query(filter): Query<GuideFilter>,
) -> Result<Json<Paginated<Guide>>, AppError> {
    let (guides, total) = db::guides::list_guides(&state.pool, &filter).await?;
    Ok(Json(Paginated::new(guides, &filter.page_params(), total)))
}

pub async fn get_guide(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GuideDetail>, AppError> {
    let detail = db::guides::get_guide_detail(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(detail))
}

pub async fn create_guide(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateGuideRequest>,
) -> Result<(StatusCode, Json<Guide>), AppError> {
    validation::validate_new_guide(&req)?;

    let guide = db::guides::create_guide(&state.pool, &auth_user.user_id, &req).await?;
    tracing::info!(guide_id = %guide.id, "Guide created");
    Ok((StatusCode::CREATED, Json(guide)))
}

pub async fn update_guide(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateGuideRequest>,
) -> Result<Json<Guide>, AppError> {
    owned_guide(&state.pool, &id, &auth_user.user_id).await?;
    validation::validate_guide_update(&req)?;

    let guide = db::guides::update_guide(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(guide))
}

pub async fn delete_guide(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    owned_guide(&state.pool, &id, &auth_user.user_id).await?;

    if !db::guides::soft_delete_guide(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_guide_attractions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GuideAttraction>>, AppError> {
    db::guides::get_guide(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let attractions = db::guides::list_guide_attractions(&state.pool, &id).await?;
    Ok(Json(attractions))
}

pub async fn link_attraction(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<LinkAttractionRequest>,
) -> Result<(StatusCode, Json<GuideAttraction>), AppError> {
    owned_guide(&state.pool, &id, &auth_user.user_id).await?;

    if req.position.is_some_and(|p| p < 0) {
        return Err(AppError::validation("Position must not be negative"));
    }

    let attraction = db::attractions::get_attraction(&state.pool, &req.attraction_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if db::guides::is_attraction_linked(&state.pool, &id, &attraction.id).await? {
        return Err(AppError::Conflict(
            "Attraction is already part of this guide".to_string(),
        ));
    }

    let position =
        db::guides::link_attraction(&state.pool, &id, &attraction.id, req.position).await?;
    Ok((
        StatusCode::CREATED,
        Json(GuideAttraction {
            position,
            attraction,
        }),
    ))
}

pub async fn unlink_attraction(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((id, attraction_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    owned_guide(&state.pool, &id, &auth_user.user_id).await?;

    if !db::guides::unlink_attraction(&state.pool, &id, &attraction_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
