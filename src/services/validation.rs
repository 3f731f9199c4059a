//! # 입력 검증 서비스
//!
//! 라우트 핸들러가 DB에 쓰기 전에 호출하는 검증 함수들입니다.
//! 실패한 규칙을 모두 모아 `AppError::Validation`으로 한 번에 돌려주므로,
//! 클라이언트는 폼의 모든 오류를 한꺼번에 표시할 수 있습니다.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;
use crate::models::*;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_COMMENT_LEN: usize = 2000;
pub const MAX_TAGS: usize = 20;
pub const MAX_PLAN_DAYS: u32 = 14;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// 검증 에러 메시지 목록이 비었으면 Ok, 아니면 `AppError::Validation`
fn finish(errors: Vec<String>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn password_errors(password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        errors.push(format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }
    if len > MAX_PASSWORD_LEN {
        errors.push(format!("Password must be at most {} characters", MAX_PASSWORD_LEN));
    }
    errors
}

pub fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if !is_valid_email(&req.email) {
        errors.push("Invalid email address".to_string());
    }
    errors.extend(password_errors(&req.password));
    finish(errors)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    finish(password_errors(password))
}

fn guide_field_errors(
    title: Option<&str>,
    location: Option<&str>,
    price: Option<f64>,
    duration_days: Option<i64>,
) -> Vec<String> {
    let mut errors = Vec::new();
    if title.is_some_and(|t| t.trim().is_empty()) {
        errors.push("Title is required".to_string());
    }
    if title.is_some_and(|t| t.chars().count() > 200) {
        errors.push("Title must be at most 200 characters".to_string());
    }
    if location.is_some_and(|l| l.trim().is_empty()) {
        errors.push("Location is required".to_string());
    }
    if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        errors.push("Price must be a non-negative number".to_string());
    }
    if duration_days.is_some_and(|d| d < 1) {
        errors.push("Duration must be at least 1 day".to_string());
    }
    errors
}

pub fn validate_new_guide(req: &CreateGuideRequest) -> Result<(), AppError> {
    finish(guide_field_errors(
        Some(&req.title),
        Some(&req.location),
        req.price,
        req.duration_days,
    ))
}

pub fn validate_guide_update(req: &UpdateGuideRequest) -> Result<(), AppError> {
    finish(guide_field_errors(
        req.title.as_deref(),
        req.location.as_deref(),
        req.price,
        req.duration_days,
    ))
}

/// 위도/경도 범위와 "둘 다 있거나 둘 다 없음" 규칙
fn coordinate_errors(latitude: Option<f64>, longitude: Option<f64>) -> Vec<String> {
    let mut errors = Vec::new();
    if latitude.is_some() != longitude.is_some() {
        errors.push("Latitude and longitude must be provided together".to_string());
    }
    if latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
        errors.push("Latitude must be between -90 and 90".to_string());
    }
    if longitude.is_some_and(|lng| !(-180.0..=180.0).contains(&lng)) {
        errors.push("Longitude must be between -180 and 180".to_string());
    }
    errors
}

/// 태그를 소문자로 바꾸고 공백 제거, 중복 제거(첫 등장 순서 유지)합니다.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, AppError> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    if normalized.len() > MAX_TAGS {
        return Err(AppError::validation(format!(
            "At most {} tags are allowed",
            MAX_TAGS
        )));
    }
    Ok(normalized)
}

pub fn validate_new_attraction(req: &CreateAttractionRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    errors.extend(coordinate_errors(req.latitude, req.longitude));
    finish(errors)
}

/// 수정 시에는 기존 좌표와 합쳐진 최종 값으로 좌표 규칙을 검사합니다.
pub fn validate_attraction_update(
    req: &UpdateAttractionRequest,
    current: &Attraction,
) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        errors.push("Name is required".to_string());
    }
    errors.extend(coordinate_errors(
        req.latitude.or(current.latitude),
        req.longitude.or(current.longitude),
    ));
    finish(errors)
}

pub fn validate_review(rating: Option<i64>, comment: Option<&str>) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if rating.is_some_and(|r| !(1..=5).contains(&r)) {
        errors.push("Rating must be between 1 and 5".to_string());
    }
    if comment.is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN) {
        errors.push(format!("Comment must be at most {} characters", MAX_COMMENT_LEN));
    }
    finish(errors)
}

pub fn validate_generate_request(req: &GeneratePlanRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if req.guide_id.trim().is_empty() {
        errors.push("guide_id is required".to_string());
    }
    if req.days == 0 || req.days > MAX_PLAN_DAYS {
        errors.push(format!("Days must be between 1 and {}", MAX_PLAN_DAYS));
    }
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(result: Result<(), AppError>) -> Vec<String> {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("  ana.b+trip@mail.co.uk "));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn registration_reports_every_failed_rule() {
        let req = RegisterRequest {
            email: "nope".into(),
            password: "short".into(),
            display_name: None,
        };
        let errors = details(validate_registration(&req));
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("email"));
        assert!(errors[1].contains("at least 8"));
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("비밀번호비밀번호").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn coordinates_must_come_in_pairs_and_in_range() {
        let mut req = CreateAttractionRequest {
            name: "Louvre".into(),
            description: None,
            address: None,
            latitude: Some(48.86),
            longitude: None,
            tags: vec![],
        };
        assert_eq!(details(validate_new_attraction(&req)).len(), 1);

        req.longitude = Some(200.0);
        let errors = details(validate_new_attraction(&req));
        assert_eq!(errors, vec!["Longitude must be between -180 and 180".to_string()]);

        req.longitude = Some(2.33);
        assert!(validate_new_attraction(&req).is_ok());
    }

    #[test]
    fn tags_are_lowercased_and_deduplicated() {
        let tags = vec![" Museum".into(), "museum".into(), "".into(), "Art".into()];
        assert_eq!(normalize_tags(&tags).unwrap(), vec!["museum", "art"]);

        let many: Vec<String> = (0..25).map(|i| format!("t{i}")).collect();
        assert!(normalize_tags(&many).is_err());
    }

    #[test]
    fn guide_rules() {
        let req = CreateGuideRequest {
            title: " ".into(),
            description: None,
            location: "Paris".into(),
            price: Some(-1.0),
            duration_days: Some(0),
            cover_image_url: None,
        };
        assert_eq!(details(validate_new_guide(&req)).len(), 3);
        assert!(validate_guide_update(&UpdateGuideRequest::default()).is_ok());
    }

    #[test]
    fn rating_range() {
        assert!(validate_review(Some(1), None).is_ok());
        assert!(validate_review(Some(5), Some("great")).is_ok());
        assert!(validate_review(Some(0), None).is_err());
        assert!(validate_review(Some(6), None).is_err());
        assert!(validate_review(None, Some(&"x".repeat(2001))).is_err());
    }
}
