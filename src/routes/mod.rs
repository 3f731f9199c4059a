//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 전체 라우터 조립을 담당합니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 토큰 갱신, 로그아웃, 비밀번호 재설정
//! - `attractions`: 명소 CRUD
//! - `guides`: 가이드 CRUD와 가이드-명소 연결
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `offline`: 오프라인 미러링용 일정 묶음, 큐 재생
//! - `plans`: 저장된 일정 CRUD, 편집, AI 생성 미리보기, 자유 텍스트 파싱
//! - `reviews`: 가이드 리뷰

pub mod attractions;
pub mod auth;
pub mod guides;
pub mod health;
pub mod offline;
pub mod plans;
pub mod reviews;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::services::{ai_client::ChatCompletion, notifier::ResetNotifier};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `SqlitePool`과 `Arc`는 clone해도 같은 자원을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 일정 생성에 쓰는 chat-completion 클라이언트 (테스트에서는 스텁)
    pub ai: Arc<dyn ChatCompletion>,
    /// 비밀번호 재설정 토큰 전달 경로
    pub notifier: Arc<dyn ResetNotifier>,
}

/// `/api` 아래에 모든 엔드포인트를 붙인 라우터를 만듭니다.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password));

    let catalog_routes = Router::new()
        .route("/guides", get(guides::list_guides).post(guides::create_guide))
        .route(
            "/guides/{id}",
            get(guides::get_guide)
                .patch(guides::update_guide)
                .delete(guides::delete_guide),
        )
        .route(
            "/guides/{id}/attractions",
            get(guides::list_guide_attractions).post(guides::link_attraction),
        )
        .route(
            "/guides/{id}/attractions/{attraction_id}",
            delete(guides::unlink_attraction),
        )
        .route(
            "/guides/{id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/{id}",
            patch(reviews::update_review).delete(reviews::delete_review),
        )
        .route(
            "/attractions",
            get(attractions::list_attractions).post(attractions::create_attraction),
        )
        .route(
            "/attractions/{id}",
            get(attractions::get_attraction)
                .patch(attractions::update_attraction)
                .delete(attractions::delete_attraction),
        );

    // 고정 경로(/plans/generate, /plans/parse)가 /plans/{id}보다 우선 매칭됩니다.
    let plan_routes = Router::new()
        .route("/plans", get(plans::list_plans).post(plans::create_plan))
        .route("/plans/generate", post(plans::generate_plan))
        .route("/plans/parse", post(plans::parse_plan_text))
        .route(
            "/plans/{id}",
            get(plans::get_plan)
                .patch(plans::update_plan)
                .delete(plans::delete_plan),
        )
        .route("/plans/{id}/favorite", post(plans::toggle_favorite))
        .route("/plans/{id}/edits", post(plans::edit_plan))
        .route("/offline/plans", get(offline::offline_plans))
        .route("/offline/sync", post(offline::sync_actions));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(catalog_routes)
        .merge(plan_routes)
        .route("/health", get(health::health_check))
        .with_state(state);

    // 개발 편의를 위해 모든 출처 허용
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
