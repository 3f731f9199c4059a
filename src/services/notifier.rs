//! # 비밀번호 재설정 토큰 전달
//!
//! 원문 토큰은 DB에 저장하지 않으므로 발급 직후 이 경로로만 사용자에게 나갑니다.
//! 메일 발송기가 붙기 전까지 기본 구현(`LogNotifier`)은 로그로만 남깁니다.

use async_trait::async_trait;

use crate::error::AppError;

#[async_trait]
pub trait ResetNotifier: Send + Sync {
    /// `email` 주소로 재설정 토큰을 보냅니다.
    async fn send_reset_token(&self, email: &str, token: &str) -> Result<(), AppError>;
}

/// 개발용: 토큰을 debug 로그로 출력
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl ResetNotifier for LogNotifier {
    async fn send_reset_token(&self, email: &str, token: &str) -> Result<(), AppError> {
        tracing::info!(email = %email, "Password reset requested (no mailer configured)");
        tracing::debug!(email = %email, token = %token, "Password reset token");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_never_fails() {
        let notifier = LogNotifier;
        assert!(notifier
            .send_reset_token("ana@example.com", "abc123")
            .await
            .is_ok());
    }
}
