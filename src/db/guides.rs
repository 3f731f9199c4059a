//! # 가이드 데이터베이스 쿼리 모듈
//!
//! `guides`, `guide_attractions` 테이블에 대한 쿼리 함수들입니다.
//!
//! - 삭제는 `deleted_at`을 채우는 소프트 삭제이며, 모든 조회는 삭제된 행을 제외합니다.
//! - 평균 평점과 리뷰 수는 조회 시 서브쿼리로 계산합니다.
//! - 목록 필터는 조건 개수가 가변이라 `sqlx::QueryBuilder`로 WHERE 절을 조립합니다.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::attractions::attach_tags;
use crate::error::AppError;
use crate::models::*;

/// 모든 가이드 조회 쿼리가 공유하는 SELECT 절
const GUIDE_SELECT: &str = r#"
    SELECT g.id, g.creator_id, COALESCE(u.display_name, u.email) AS creator_name,
           g.title, g.slug, g.description, g.location, g.price, g.duration_days,
           g.cover_image_url,
           (SELECT AVG(r.rating) FROM reviews r
             WHERE r.guide_id = g.id AND r.deleted_at IS NULL) AS average_rating,
           (SELECT COUNT(*) FROM reviews r
             WHERE r.guide_id = g.id AND r.deleted_at IS NULL) AS review_count,
           g.created_at, g.updated_at
    FROM guides g
    JOIN users u ON u.id = g.creator_id
"#;

/// 필터 조건을 WHERE 절로 추가합니다. 목록 조회와 개수 조회가 같은 조건을 씁니다.
fn push_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &'a GuideFilter) {
    builder.push(" WHERE g.deleted_at IS NULL");

    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q);
        builder
            .push(" AND (g.title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR g.description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = filter.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        builder
            .push(" AND g.location LIKE ")
            .push_bind(format!("%{}%", location));
    }
    if let Some(min) = filter.min_price {
        builder.push(" AND g.price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND g.price <= ").push_bind(max);
    }
    if let Some(creator_id) = &filter.creator_id {
        builder.push(" AND g.creator_id = ").push_bind(creator_id);
    }
}

/// 필터와 페이지 조건에 맞는 가이드 목록과 전체 개수를 반환합니다.
pub async fn list_guides(
    pool: &SqlitePool,
    filter: &GuideFilter,
) -> Result<(Vec<Guide>, i64), AppError> {
    let page = filter.page_params();

    let mut count_query = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) FROM guides g JOIN users u ON u.id = g.creator_id",
    );
    push_filters(&mut count_query, filter);
    let (total,): (i64,) = count_query.build_query_as().fetch_one(pool).await?;

    let mut query = QueryBuilder::<Sqlite>::new(GUIDE_SELECT);
    push_filters(&mut query, filter);
    query.push(match filter.sort {
        GuideSort::Newest => " ORDER BY g.created_at DESC, g.id DESC",
        GuideSort::PriceAsc => " ORDER BY g.price ASC, g.id DESC",
        GuideSort::PriceDesc => " ORDER BY g.price DESC, g.id DESC",
        // 평점 없는 가이드는 맨 뒤로
        GuideSort::Rating => {
            " ORDER BY average_rating IS NULL, average_rating DESC, review_count DESC, g.id DESC"
        }
    });
    query
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let guides = query.build_query_as::<Guide>().fetch_all(pool).await?;
    Ok((guides, total))
}

pub async fn get_guide(pool: &SqlitePool, id: &str) -> Result<Option<Guide>, AppError> {
    let sql = format!("{GUIDE_SELECT} WHERE g.id = ? AND g.deleted_at IS NULL");
    let guide = sqlx::query_as::<_, Guide>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(guide)
}

/// 가이드와 연결된 명소 목록을 함께 조회합니다.
pub async fn get_guide_detail(pool: &SqlitePool, id: &str) -> Result<Option<GuideDetail>, AppError> {
    let Some(guide) = get_guide(pool, id).await? else {
        return Ok(None);
    };
    let attractions = list_guide_attractions(pool, id).await?;
    Ok(Some(GuideDetail { guide, attractions }))
}

pub async fn create_guide(
    pool: &SqlitePool,
    creator_id: &str,
    req: &CreateGuideRequest,
) -> Result<Guide, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO guides (id, creator_id, title, slug, description, location,
                            price, duration_days, cover_image_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(creator_id)
    .bind(req.title.trim())
    .bind(slug::slugify(&req.title))
    .bind(&req.description)
    .bind(req.location.trim())
    .bind(req.price.unwrap_or(0.0))
    .bind(req.duration_days.unwrap_or(1))
    .bind(&req.cover_image_url)
    .execute(pool)
    .await?;

    get_guide(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created guide".to_string()))
}

/// 가이드를 부분 수정합니다. 제목이 바뀌면 slug도 다시 만듭니다.
pub async fn update_guide(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateGuideRequest,
) -> Result<Option<Guide>, AppError> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "UPDATE guides SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
    );

    if let Some(title) = &req.title {
        query
            .push(", title = ")
            .push_bind(title.trim())
            .push(", slug = ")
            .push_bind(slug::slugify(title));
    }
    if let Some(description) = &req.description {
        query.push(", description = ").push_bind(description);
    }
    if let Some(location) = &req.location {
        query.push(", location = ").push_bind(location.trim());
    }
    if let Some(price) = req.price {
        query.push(", price = ").push_bind(price);
    }
    if let Some(duration_days) = req.duration_days {
        query.push(", duration_days = ").push_bind(duration_days);
    }
    if let Some(cover_image_url) = &req.cover_image_url {
        query.push(", cover_image_url = ").push_bind(cover_image_url);
    }

    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" AND deleted_at IS NULL");

    let result = query.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_guide(pool, id).await
}

/// 소프트 삭제. 이미 삭제됐거나 없으면 false.
pub async fn soft_delete_guide(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE guides
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ── 가이드-명소 연결 ──

#[derive(sqlx::FromRow)]
struct GuideAttractionRow {
    position: i64,
    #[sqlx(flatten)]
    attraction: Attraction,
}

/// 가이드에 연결된 (삭제되지 않은) 명소를 position 순으로 조회합니다.
pub async fn list_guide_attractions(
    pool: &SqlitePool,
    guide_id: &str,
) -> Result<Vec<GuideAttraction>, AppError> {
    let rows = sqlx::query_as::<_, GuideAttractionRow>(
        r#"
        SELECT ga.position, a.id, a.creator_id, a.name, a.description, a.address,
               a.latitude, a.longitude, a.created_at, a.updated_at
        FROM guide_attractions ga
        JOIN attractions a ON a.id = ga.attraction_id
        WHERE ga.guide_id = ? AND a.deleted_at IS NULL
        ORDER BY ga.position, a.name
        "#,
    )
    .bind(guide_id)
    .fetch_all(pool)
    .await?;

    let (positions, mut attractions): (Vec<i64>, Vec<Attraction>) = rows
        .into_iter()
        .map(|row| (row.position, row.attraction))
        .unzip();
    attach_tags(pool, &mut attractions).await?;

    Ok(positions
        .into_iter()
        .zip(attractions)
        .map(|(position, attraction)| GuideAttraction { position, attraction })
        .collect())
}

pub async fn is_attraction_linked(
    pool: &SqlitePool,
    guide_id: &str,
    attraction_id: &str,
) -> Result<bool, AppError> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT 1 FROM guide_attractions WHERE guide_id = ? AND attraction_id = ?",
    )
    .bind(guide_id)
    .bind(attraction_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// 명소를 가이드에 연결합니다. position이 없으면 마지막 다음 자리에 붙입니다.
pub async fn link_attraction(
    pool: &SqlitePool,
    guide_id: &str,
    attraction_id: &str,
    position: Option<i64>,
) -> Result<i64, AppError> {
    let position = match position {
        Some(p) => p,
        None => {
            let (next,): (i64,) = sqlx::query_as(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM guide_attractions WHERE guide_id = ?",
            )
            .bind(guide_id)
            .fetch_one(pool)
            .await?;
            next
        }
    };

    sqlx::query(
        "INSERT INTO guide_attractions (guide_id, attraction_id, position) VALUES (?, ?, ?)",
    )
    .bind(guide_id)
    .bind(attraction_id)
    .bind(position)
    .execute(pool)
    .await?;

    Ok(position)
}

pub async fn unlink_attraction(
    pool: &SqlitePool,
    guide_id: &str,
    attraction_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "DELETE FROM guide_attractions WHERE guide_id = ? AND attraction_id = ?",
    )
    .bind(guide_id)
    .bind(attraction_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
