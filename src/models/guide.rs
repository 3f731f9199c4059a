//! # 가이드(Guide) 모델 정의
//!
//! 가이드는 크리에이터가 만든 여행 일정 템플릿입니다.
//! 여러 명소(Attraction)를 순서대로 포함하며, 사용자 리뷰의 평균 평점을 함께 노출합니다.

use serde::{Deserialize, Serialize};

use super::attraction::Attraction;
use super::pagination::PageParams;

/// 가이드 엔티티: `guides` 테이블 한 행 + 조회 시 계산되는 집계 필드
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Guide {
    pub id: String,
    pub creator_id: String,
    /// 작성자 표시 이름 (display_name이 없으면 이메일)
    pub creator_name: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub location: String,
    pub price: f64,
    pub duration_days: i64,
    pub cover_image_url: Option<String>,
    /// 리뷰가 없으면 None
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// 가이드에 연결된 명소와 그 순서
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideAttraction {
    pub position: i64,
    #[serde(flatten)]
    pub attraction: Attraction,
}

/// `GET /guides/{id}` 응답: 가이드 정보 + 순서대로 정렬된 명소 목록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideDetail {
    #[serde(flatten)]
    pub guide: Guide,
    pub attractions: Vec<GuideAttraction>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGuideRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub price: Option<f64>,
    pub duration_days: Option<i64>,
    pub cover_image_url: Option<String>,
}

/// PATCH 요청이므로 모든 필드가 선택입니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGuideRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub duration_days: Option<i64>,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkAttractionRequest {
    pub attraction_id: String,
    /// 생략하면 마지막 위치 뒤에 추가
    pub position: Option<i64>,
}

/// 가이드 목록 정렬 기준
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
}

/// `GET /guides` 쿼리 파라미터
///
/// `serde(flatten)`은 쿼리 문자열의 숫자 파싱과 궁합이 나빠서
/// 페이지 필드를 직접 두고 `page_params()`로 변환합니다.
#[derive(Debug, Default, Deserialize)]
pub struct GuideFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// 제목/설명 부분 일치
    pub q: Option<String>,
    /// 지역 부분 일치
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub creator_id: Option<String>,
    #[serde(default)]
    pub sort: GuideSort,
}

impl GuideFilter {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
