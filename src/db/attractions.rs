//! # 명소 데이터베이스 쿼리 모듈
//!
//! `attractions`와 `attraction_tags` 테이블을 다룹니다.
//! 명소 행과 태그를 한 번에 쓰는 작업은 트랜잭션으로 묶습니다.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::AppError;
use crate::models::*;

const ATTRACTION_COLUMNS: &str = r#"
    SELECT a.id, a.creator_id, a.name, a.description, a.address,
           a.latitude, a.longitude, a.created_at, a.updated_at
    FROM attractions a
"#;

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &'a AttractionFilter) {
    builder.push(" WHERE a.deleted_at IS NULL");

    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q);
        builder
            .push(" AND (a.name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.description LIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.address LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(tag) = filter.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        builder
            .push(" AND EXISTS (SELECT 1 FROM attraction_tags t WHERE t.attraction_id = a.id AND t.tag = ")
            .push_bind(tag.to_lowercase())
            .push(")");
    }
}

pub async fn list_attractions(
    pool: &SqlitePool,
    filter: &AttractionFilter,
) -> Result<(Vec<Attraction>, i64), AppError> {
    let page = filter.page_params();

    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM attractions a");
    push_filters(&mut count_query, filter);
    let (total,): (i64,) = count_query.build_query_as().fetch_one(pool).await?;

    let mut query = QueryBuilder::<Sqlite>::new(ATTRACTION_COLUMNS);
    push_filters(&mut query, filter);
    query
        .push(" ORDER BY a.name, a.id LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let mut attractions = query.build_query_as::<Attraction>().fetch_all(pool).await?;
    attach_tags(pool, &mut attractions).await?;

    Ok((attractions, total))
}

pub async fn get_attraction(pool: &SqlitePool, id: &str) -> Result<Option<Attraction>, AppError> {
    let sql = format!("{ATTRACTION_COLUMNS} WHERE a.id = ? AND a.deleted_at IS NULL");
    let attraction = sqlx::query_as::<_, Attraction>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(attraction) = attraction else {
        return Ok(None);
    };
    let mut list = vec![attraction];
    attach_tags(pool, &mut list).await?;
    Ok(list.pop())
}

/// 조회한 명소들의 태그를 한 번의 쿼리로 채웁니다.
pub async fn attach_tags(pool: &SqlitePool, attractions: &mut [Attraction]) -> Result<(), AppError> {
    if attractions.is_empty() {
        return Ok(());
    }

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT attraction_id, tag FROM attraction_tags WHERE attraction_id IN (",
    );
    let mut separated = query.separated(", ");
    for attraction in attractions.iter() {
        separated.push_bind(attraction.id.clone());
    }
    separated.push_unseparated(") ORDER BY tag");

    let rows: Vec<(String, String)> = query.build_query_as().fetch_all(pool).await?;

    let mut by_attraction: HashMap<String, Vec<String>> = HashMap::new();
    for (attraction_id, tag) in rows {
        by_attraction.entry(attraction_id).or_default().push(tag);
    }
    for attraction in attractions.iter_mut() {
        attraction.tags = by_attraction.remove(&attraction.id).unwrap_or_default();
    }

    Ok(())
}

/// 명소와 태그를 하나의 트랜잭션으로 생성합니다.
/// `tags`는 호출 전에 정규화(소문자, 중복 제거)되어 있어야 합니다.
pub async fn create_attraction(
    pool: &SqlitePool,
    creator_id: &str,
    req: &CreateAttractionRequest,
    tags: &[String],
) -> Result<Attraction, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO attractions (id, creator_id, name, description, address, latitude, longitude)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(creator_id)
    .bind(req.name.trim())
    .bind(&req.description)
    .bind(&req.address)
    .bind(req.latitude)
    .bind(req.longitude)
    .execute(&mut *tx)
    .await?;

    for tag in tags {
        sqlx::query("INSERT INTO attraction_tags (attraction_id, tag) VALUES (?, ?)")
            .bind(&id)
            .bind(tag)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    get_attraction(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created attraction".to_string()))
}

/// 명소를 부분 수정합니다. `tags`가 Some이면 태그 전체를 교체합니다.
pub async fn update_attraction(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateAttractionRequest,
    tags: Option<&[String]>,
) -> Result<Option<Attraction>, AppError> {
    let mut tx = pool.begin().await?;

    let mut query = QueryBuilder::<Sqlite>::new(
        "UPDATE attractions SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
    );
    if let Some(name) = &req.name {
        query.push(", name = ").push_bind(name.trim());
    }
    if let Some(description) = &req.description {
        query.push(", description = ").push_bind(description);
    }
    if let Some(address) = &req.address {
        query.push(", address = ").push_bind(address);
    }
    if let Some(latitude) = req.latitude {
        query.push(", latitude = ").push_bind(latitude);
    }
    if let Some(longitude) = req.longitude {
        query.push(", longitude = ").push_bind(longitude);
    }
    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" AND deleted_at IS NULL");

    let result = query.build().execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    if let Some(tags) = tags {
        sqlx::query("DELETE FROM attraction_tags WHERE attraction_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for tag in tags {
            sqlx::query("INSERT INTO attraction_tags (attraction_id, tag) VALUES (?, ?)")
                .bind(id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    get_attraction(pool, id).await
}

pub async fn soft_delete_attraction(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE attractions
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
