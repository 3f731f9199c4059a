//! # TripPlanner 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성 + 마이그레이션
//! 4. AI(chat-completion) 클라이언트 생성
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripplanner::{
    config::Config,
    db,
    routes::{self, AppState},
    services::{ai_client::OpenRouterClient, notifier::LogNotifier},
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 시스템 환경변수만으로 동작합니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 tripplanner, tower_http, axum을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripplanner=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting TripPlanner server on {}:{}", config.host, config.port);

    // ── 4단계: DB 연결 + 마이그레이션 ──
    tracing::info!("Connecting to database and running migrations...");
    let pool = db::connect(&config.database_url, 5).await?;

    // ── 5단계: AI 클라이언트 ──
    if config.ai.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set, plan generation will return 503");
    }
    let ai = OpenRouterClient::new(config.ai.clone())?;

    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        ai: Arc::new(ai),
        notifier: Arc::new(LogNotifier),
    };

    // ── 6단계: 서버 시작 ──
    let app = routes::router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
