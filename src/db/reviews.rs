//! # 리뷰 데이터베이스 쿼리 모듈
//!
//! 가이드별 리뷰의 생성/조회/수정/소프트 삭제를 담당합니다.
//! "사용자당 가이드 하나에 리뷰 하나" 규칙은 부분 유니크 인덱스
//! (`idx_reviews_one_per_user`)가 최종적으로 보장합니다.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::*;

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.guide_id, r.user_id, COALESCE(u.display_name, u.email) AS author_name,
           r.rating, r.comment, r.created_at, r.updated_at
    FROM reviews r
    JOIN users u ON u.id = r.user_id
"#;

/// 가이드의 리뷰를 최신순으로 페이지 조회합니다. (목록, 전체 개수)
pub async fn list_reviews_for_guide(
    pool: &SqlitePool,
    guide_id: &str,
    page: &PageParams,
) -> Result<(Vec<Review>, i64), AppError> {
    let (total,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM reviews WHERE guide_id = ? AND deleted_at IS NULL",
    )
    .bind(guide_id)
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{REVIEW_SELECT} WHERE r.guide_id = ? AND r.deleted_at IS NULL \
         ORDER BY r.created_at DESC, r.id DESC LIMIT ? OFFSET ?"
    );
    let reviews = sqlx::query_as::<_, Review>(&sql)
        .bind(guide_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok((reviews, total))
}

pub async fn get_review(pool: &SqlitePool, id: &str) -> Result<Option<Review>, AppError> {
    let sql = format!("{REVIEW_SELECT} WHERE r.id = ? AND r.deleted_at IS NULL");
    let review = sqlx::query_as::<_, Review>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(review)
}

/// 사용자가 이 가이드에 이미 남긴 (삭제되지 않은) 리뷰가 있는지 확인합니다.
pub async fn find_user_review(
    pool: &SqlitePool,
    guide_id: &str,
    user_id: &str,
) -> Result<Option<Review>, AppError> {
    let sql = format!(
        "{REVIEW_SELECT} WHERE r.guide_id = ? AND r.user_id = ? AND r.deleted_at IS NULL"
    );
    let review = sqlx::query_as::<_, Review>(&sql)
        .bind(guide_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(review)
}

pub async fn create_review(
    pool: &SqlitePool,
    guide_id: &str,
    user_id: &str,
    rating: i64,
    comment: Option<&str>,
) -> Result<Review, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        "INSERT INTO reviews (id, guide_id, user_id, rating, comment) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(guide_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .execute(pool)
    .await?;

    get_review(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created review".to_string()))
}

pub async fn update_review(
    pool: &SqlitePool,
    id: &str,
    rating: Option<i64>,
    comment: Option<&str>,
) -> Result<Option<Review>, AppError> {
    // COALESCE: None이면 기존 값 유지
    let result = sqlx::query(
        r#"
        UPDATE reviews
        SET rating = COALESCE(?, rating),
            comment = COALESCE(?, comment),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(rating)
    .bind(comment)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_review(pool, id).await
}

pub async fn soft_delete_review(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE reviews
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
