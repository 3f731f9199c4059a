//! # AI 응답 해석
//!
//! 모델이 돌려준 텍스트를 `PlanContent`로 변환합니다.
//!
//! 1. 그대로 JSON 파싱
//! 2. 실패하면 감싸고 있는 마크다운 코드 펜스(```json ... ```)를 벗기고 다시 파싱
//! 3. 그래도 실패하면 `AiError::InvalidJson`
//!
//! 스키마 보정이나 재요청은 하지 않습니다.

use crate::models::PlanContent;
use crate::services::ai_client::AiError;

/// 텍스트 전체가 코드 펜스로 감싸져 있으면 안쪽 내용만 돌려줍니다.
pub fn strip_code_fence(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix("```")?;
    let rest = rest.strip_suffix("```")?;

    // 여는 펜스 뒤의 언어 표시(json 등)는 첫 줄바꿈까지
    let body = match rest.find('\n') {
        Some(newline) => {
            let lang = rest[..newline].trim();
            if lang.chars().all(|c| c.is_ascii_alphanumeric()) {
                &rest[newline + 1..]
            } else {
                rest
            }
        }
        None => rest,
    };
    Some(body.trim())
}

/// 모델 응답을 정규화된 `PlanContent`로 해석합니다.
pub fn parse_plan_response(text: &str) -> Result<PlanContent, AiError> {
    let parsed = serde_json::from_str::<PlanContent>(text.trim()).or_else(|first_err| {
        let inner = strip_code_fence(text).ok_or(first_err)?;
        serde_json::from_str::<PlanContent>(inner)
    });

    match parsed {
        Ok(content) => Ok(content.normalize()),
        Err(e) => {
            tracing::warn!("Could not parse AI plan response: {}", e);
            Err(AiError::InvalidJson)
        }
    }
}
