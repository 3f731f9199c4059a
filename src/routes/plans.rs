//! # 일정(Plan) 라우트 핸들러
//!
//! ## 엔드포인트 (모두 로그인 필요)
//! - `GET    /api/plans`              → 내 일정 목록 (`?favorite=true`로 즐겨찾기만)
//! - `POST   /api/plans`              → 일정 저장 (`content` 또는 `legacy_text`)
//! - `GET    /api/plans/{id}`         → 단일 일정
//! - `PATCH  /api/plans/{id}`         → 부분 수정
//! - `DELETE /api/plans/{id}`         → 소프트 삭제
//! - `POST   /api/plans/{id}/favorite`→ 즐겨찾기 토글
//! - `POST   /api/plans/{id}/edits`   → 일정 편집 명령 하나 적용 후 저장
//! - `POST   /api/plans/generate`     → AI 일정 미리보기 (저장 안 함)
//! - `POST   /api/plans/parse`        → 자유 텍스트 → 일정 본문
//!
//! 다른 사용자의 일정은 존재 여부를 드러내지 않도록 403 대신 404로 응답합니다.

use crate::{
    db,
    error::AppError,
    extract::{Json, Path, Query},
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::{itinerary, legacy_parser, planner, validation},
};
use axum::{extract::State, http::StatusCode};

/// 자유 텍스트를 파싱합니다. 항목을 하나도 찾지 못하면 400.
fn parse_text(text: &str) -> Result<PlanContent, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::validation("Text is required"));
    }
    let content = legacy_parser::parse_legacy_plan(text);
    if content.days.is_empty() {
        return Err(AppError::BadRequest(
            "No itinerary items found in the text".to_string(),
        ));
    }
    Ok(content)
}

fn clean_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    Ok(name)
}

pub async fn list_plans(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filter): Query<PlanFilter>,
) -> Result<Json<Paginated<Plan>>, AppError> {
    let (plans, total) = db::plans::list_plans(&state.pool, &auth_user.user_id, &filter).await?;
    Ok(Json(Paginated::new(plans, &filter.page_params(), total)))
}

pub async fn get_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Plan>, AppError> {
    let plan = db::plans::get_plan(&state.pool, &id, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(plan))
}

pub async fn create_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<Plan>), AppError> {
    let name = clean_name(&req.name)?;

    // content가 있으면 그것을 쓰고, 없을 때만 자유 텍스트를 파싱
    let content = match (req.content, req.legacy_text.as_deref()) {
        (Some(content), _) => content.normalize(),
        (None, Some(text)) => parse_text(text)?,
        (None, None) => {
            return Err(AppError::validation(
                "Either content or legacy_text is required",
            ))
        }
    };

    if let Some(guide_id) = req.guide_id.as_deref() {
        if db::guides::get_guide(&state.pool, guide_id).await?.is_none() {
            return Err(AppError::validation("Guide does not exist"));
        }
    }

    let plan = db::plans::create_plan(
        &state.pool,
        &auth_user.user_id,
        req.guide_id.as_deref(),
        name,
        &content,
        req.generation_params.as_ref(),
    )
    .await?;
    tracing::info!(plan_id = %plan.id, days = plan.content.days.len(), "Plan saved");

    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn update_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(mut req): Json<UpdatePlanRequest>,
) -> Result<Json<Plan>, AppError> {
    if let Some(name) = req.name.as_deref() {
        clean_name(name)?;
    }
    req.content = req.content.map(PlanContent::normalize);

    let plan = db::plans::update_plan(&state.pool, &id, &auth_user.user_id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(plan))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::plans::soft_delete_plan(&state.pool, &id, &auth_user.user_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Plan>, AppError> {
    let plan = db::plans::toggle_favorite(&state.pool, &id, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(plan))
}

/// `POST /plans/{id}/edits`: 예: `{"op":"move","from_day":0,"from_index":2,"to_day":1,"to_index":0}`
pub async fn edit_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(edit): Json<PlanEdit>,
) -> Result<Json<Plan>, AppError> {
    let mut plan = db::plans::get_plan(&state.pool, &id, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    itinerary::apply_edit(&mut plan.content, &edit)?;

    let plan = db::plans::update_plan_content(&state.pool, &id, &auth_user.user_id, &plan.content)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(plan))
}

pub async fn generate_plan(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Json<GeneratePlanResponse>, AppError> {
    validation::validate_generate_request(&req)?;

    let guide = db::guides::get_guide(&state.pool, &req.guide_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let attractions = db::guides::list_guide_attractions(&state.pool, &guide.id).await?;

    let response = planner::generate_plan(state.ai.as_ref(), &guide, &attractions, &req).await?;
    Ok(Json(response))
}

pub async fn parse_plan_text(
    _auth_user: AuthUser,
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<PlanContent>, AppError> {
    Ok(Json(parse_text(&req.text)?))
}
