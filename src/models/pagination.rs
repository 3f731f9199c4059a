//! # 오프셋 기반 페이지네이션
//!
//! 목록 API는 모두 `?page=2&limit=10` 형태의 쿼리를 받고,
//! `{ "data": [...], "pagination": { page, limit, total, pages } }`로 응답합니다.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// 클라이언트가 보낸 페이지 파라미터 (둘 다 선택)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// 1 이상의 페이지 번호
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// 1..=MAX_LIMIT 범위로 보정된 페이지 크기
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// SQL `OFFSET` 값. 아주 큰 페이지 번호는 i64::MAX에서 멈춥니다 (빈 페이지).
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// 응답에 포함되는 페이지 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(params: &PageParams, total: i64) -> Self {
        let limit = params.limit();
        Self {
            page: params.page(),
            limit,
            total,
            // 올림 나눗셈: total이 0이면 0페이지
            pages: (total + limit - 1) / limit,
        }
    }
}

/// 페이지 단위 목록 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, params: &PageParams, total: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(params, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> PageParams {
        PageParams { page, limit }
    }

    #[test]
    fn defaults_to_first_page_of_ten() {
        let p = params(None, None);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let p = params(Some(0), Some(500));
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), MAX_LIMIT);

        let p = params(Some(-3), Some(0));
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 1);
    }

    #[test]
    fn offset_follows_page_and_limit() {
        assert_eq!(params(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let p = params(Some(i64::MAX), Some(MAX_LIMIT));
        assert_eq!(p.page(), i64::MAX);
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn pages_round_up() {
        let p = params(Some(1), Some(10));
        assert_eq!(Pagination::new(&p, 0).pages, 0);
        assert_eq!(Pagination::new(&p, 1).pages, 1);
        assert_eq!(Pagination::new(&p, 10).pages, 1);
        assert_eq!(Pagination::new(&p, 11).pages, 2);
        assert_eq!(Pagination::new(&p, 95).pages, 10);
    }

    #[test]
    fn page_beyond_last_is_kept_as_requested() {
        let pagination = Pagination::new(&params(Some(9), Some(10)), 15);
        assert_eq!(pagination.page, 9);
        assert_eq!(pagination.pages, 2);
    }
}
