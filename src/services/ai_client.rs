//! # Chat-completion 클라이언트
//!
//! OpenRouter 호환 `/chat/completions` API를 호출하는 클라이언트입니다.
//! 라우트는 `ChatCompletion` 트레이트에만 의존하므로, 테스트에서는
//! 고정 응답을 돌려주는 스텁으로 바꿔 끼울 수 있습니다.
//!
//! 재시도/백오프는 하지 않습니다. 실패는 그대로 호출자에게 전달됩니다.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::AiConfig;
use crate::error::AppError;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI generation is not configured")]
    NotConfigured,

    #[error("AI request timed out")]
    Timeout,

    #[error("AI request failed: {0}")]
    Transport(String),

    #[error("AI service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI response had no message content")]
    EmptyResponse,

    #[error("AI returned invalid JSON")]
    InvalidJson,
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::NotConfigured => AppError::Unavailable(err.to_string()),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// 시스템 프롬프트와 사용자 프롬프트를 받아 모델의 텍스트 응답을 돌려줍니다.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiError>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl OpenRouterClient {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        // 요청 단위 타임아웃 (응답 본문까지 포함한 전체 시간)
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiError> {
        let api_key = self.config.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        let body = json!({
            "model": self.config.model,
            "temperature": 0.7,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ]
        });

        tracing::debug!(model = %self.config.model, "Requesting plan completion");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.app_url)
            .header("X-Title", "TripPlanner")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                // 업스트림 에러 본문은 길 수 있으므로 앞부분만
                body: body.chars().take(500).collect(),
            });
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout
            } else {
                AiError::Transport(e.to_string())
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}
