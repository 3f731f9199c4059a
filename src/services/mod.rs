//! # 서비스 모듈
//!
//! 라우트와 DB 사이의 도메인 로직입니다. 대부분 순수 함수라 단위 테스트가 붙어 있습니다.

pub mod ai_client;
pub mod itinerary;
pub mod legacy_parser;
pub mod notifier;
pub mod plan_parser;
pub mod planner;
pub mod prompt;
pub mod sync;
pub mod validation;
