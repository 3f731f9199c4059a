//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `attractions`: 명소 CRUD와 태그
//! - `guides`: 가이드 CRUD, 필터 목록, 가이드-명소 연결
//! - `plans`: 사용자 일정 CRUD, 즐겨찾기/오프라인 플래그
//! - `reviews`: 가이드 리뷰
//! - `users`: 사용자 인증 관련 쿼리 (리프레시/재설정 토큰 포함)

pub mod attractions;
pub mod guides;
pub mod plans;
pub mod reviews;
pub mod users;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// 외래키 검사를 켠 SQLite 풀을 만들고 마이그레이션을 실행합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// `./migrations`의 SQL 파일을 컴파일 타임에 포함시켜 순서대로 실행합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
