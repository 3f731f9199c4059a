//! # 명소(Attraction) 모델 정의
//!
//! 명소는 위치(주소, 위도/경도)와 태그를 가진 관심 지점입니다.
//! 태그는 `attraction_tags` 테이블에 따로 저장되며 조회 후 채워집니다.

use serde::{Deserialize, Serialize};

use super::pagination::PageParams;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attraction {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// DB 행에는 없는 필드: `db::attractions::attach_tags`가 채웁니다.
    #[sqlx(skip)]
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAttractionRequest {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAttractionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Some이면 태그 전체를 교체
    pub tags: Option<Vec<String>>,
}

/// `GET /attractions` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct AttractionFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub q: Option<String>,
    pub tag: Option<String>,
}

impl AttractionFilter {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
