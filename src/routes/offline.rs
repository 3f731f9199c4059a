//! # 오프라인 라우트 핸들러
//!
//! - `GET  /api/offline/plans` → 오프라인 표시된 일정 + 원본 가이드 스냅샷
//! - `POST /api/offline/sync`  → 연결이 끊긴 동안 쌓인 동작 재생

use std::collections::HashMap;

use crate::{
    db,
    error::AppError,
    extract::Json,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::sync,
};
use axum::extract::State;
use serde_json::{json, Value};

pub async fn offline_plans(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let plans = db::plans::list_offline_plans(&state.pool, &auth_user.user_id).await?;

    // 여러 일정이 같은 가이드를 가리키는 경우가 많아 한 번씩만 조회
    let mut guides: HashMap<String, Option<GuideDetail>> = HashMap::new();
    let mut bundle = Vec::with_capacity(plans.len());

    for plan in plans {
        let guide = match plan.guide_id.as_deref() {
            Some(guide_id) => {
                if !guides.contains_key(guide_id) {
                    let detail = db::guides::get_guide_detail(&state.pool, guide_id).await?;
                    guides.insert(guide_id.to_string(), detail);
                }
                guides.get(guide_id).cloned().flatten()
            }
            None => None,
        };
        bundle.push(OfflinePlan { plan, guide });
    }

    Ok(Json(json!({
        "plans": bundle,
        "synced_at": chrono::Utc::now().to_rfc3339(),
    })))
}

pub async fn sync_actions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<SyncRequest>,
) -> Result<Json<Value>, AppError> {
    let results = sync::replay_actions(&state.pool, &auth_user.user_id, req.actions).await?;
    Ok(Json(json!({ "results": results })))
}
