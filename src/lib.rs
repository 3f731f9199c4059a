//! # TripPlanner 백엔드 라이브러리
//!
//! 여행 가이드 열람, AI 일정 생성, 일정 저장/즐겨찾기, 오프라인 동기화를 제공하는
//! JSON API입니다. 바이너리(`main.rs`)와 통합 테스트(`tests/`)가 같은 라우터를 씁니다.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
