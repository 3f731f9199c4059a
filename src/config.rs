//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `HOST` / `PORT`: 서버 바인딩 주소와 포트
//! - `OPENROUTER_API_KEY`: AI 일정 생성용 API 키 (없으면 생성 기능 비활성)
//! - `OPENROUTER_BASE_URL` / `OPENROUTER_MODEL`: chat-completion 엔드포인트와 모델
//! - `AI_TIMEOUT_SECS`: AI 요청 타임아웃(초)
//! - `APP_URL`: OpenRouter에 `HTTP-Referer`로 전달되는 앱 주소

use std::env;

/// AI(chat-completion) 연동 설정
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// None이면 `/plans/generate`가 503을 반환합니다.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub app_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            timeout_secs: 60,
            app_url: "http://localhost:4321".to_string(),
        }
    }
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 `AppState`로 나눠 전달됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/tripplanner.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    pub ai: AiConfig,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = AiConfig::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            ai: AiConfig {
                // 빈 문자열도 "설정 안 됨"으로 취급합니다.
                api_key: env::var("OPENROUTER_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                base_url: env::var("OPENROUTER_BASE_URL").unwrap_or(defaults.base_url),
                model: env::var("OPENROUTER_MODEL").unwrap_or(defaults.model),
                timeout_secs: env::var("AI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.timeout_secs),
                app_url: env::var("APP_URL").unwrap_or(defaults.app_url),
            },
        })
    }
}
