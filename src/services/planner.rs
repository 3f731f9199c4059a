//! # AI 일정 생성
//!
//! 프롬프트 작성 → chat-completion 호출 → 응답 해석 순서로 일정 미리보기를 만듭니다.
//! 저장은 하지 않습니다. 클라이언트가 결과를 `POST /api/plans`로 저장합니다.

use crate::error::AppError;
use crate::models::*;
use crate::services::ai_client::{AiError, ChatCompletion};
use crate::services::{plan_parser, prompt};

pub async fn generate_plan(
    ai: &dyn ChatCompletion,
    guide: &Guide,
    attractions: &[GuideAttraction],
    req: &GeneratePlanRequest,
) -> Result<GeneratePlanResponse, AppError> {
    let user_prompt = prompt::build_user_prompt(guide, attractions, req);

    tracing::info!(guide_id = %guide.id, days = req.days, "Generating plan");
    let raw = ai.complete(prompt::SYSTEM_PROMPT, &user_prompt).await?;

    let mut content = plan_parser::parse_plan_response(&raw)?;
    if content.days.is_empty() {
        tracing::warn!(guide_id = %guide.id, "AI plan had no days");
        return Err(AiError::InvalidJson.into());
    }
    content.days.truncate(req.days as usize);

    let generation_params = serde_json::to_value(req)
        .map_err(|e| AppError::Internal(format!("Failed to serialize generation params: {}", e)))?;

    Ok(GeneratePlanResponse {
        content,
        generation_params,
    })
}
