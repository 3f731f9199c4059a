//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `attraction`: 명소와 태그
//! - `guide`: 가이드, 가이드-명소 연결, 목록 필터
//! - `pagination`: 오프셋 기반 페이지 파라미터와 응답 메타데이터
//! - `plan`: 저장된 일정과 일정 본문 트리, AI 생성 요청, 편집 명령
//! - `review`: 가이드 리뷰
//! - `sync`: 오프라인 큐 재생(replay) 요청/결과
//! - `user`: 사용자와 인증 요청/응답
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Guide`처럼 짧게 쓸 수 있습니다.

pub mod attraction;
pub mod guide;
pub mod pagination;
pub mod plan;
pub mod review;
pub mod sync;
pub mod user;

pub use attraction::*;
pub use guide::*;
pub use pagination::*;
pub use plan::*;
pub use review::*;
pub use sync::*;
pub use user::*;
