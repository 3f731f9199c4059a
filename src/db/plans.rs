//! # 일정(Plan) 데이터베이스 쿼리 모듈
//!
//! 모든 조회/수정은 `user_id` 조건을 함께 걸어 본인 일정만 다룹니다.
//! 다른 사용자의 일정은 "없음"(None)과 구별되지 않습니다.
//!
//! 일정 본문은 JSON 문자열로 저장되고, 행을 읽을 때 `Plan`으로 변환합니다.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::AppError;
use crate::models::*;

const PLAN_SELECT: &str = r#"
    SELECT id, user_id, guide_id, name, content, generation_params,
           is_favorite, is_offline, created_at, updated_at
    FROM plans
"#;

fn into_plan(row: PlanRow) -> Result<Plan, AppError> {
    let id = row.id.clone();
    Plan::try_from(row)
        .map_err(|e| AppError::Internal(format!("Stored plan {} is not valid JSON: {}", id, e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Plan serialization failed: {}", e)))
}

pub async fn list_plans(
    pool: &SqlitePool,
    user_id: &str,
    filter: &PlanFilter,
) -> Result<(Vec<Plan>, i64), AppError> {
    let page = filter.page_params();
    let favorite_only = filter.favorite.unwrap_or(false);

    let (total,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM plans
        WHERE user_id = ? AND deleted_at IS NULL AND (? = 0 OR is_favorite = 1)
        "#,
    )
    .bind(user_id)
    .bind(favorite_only)
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{PLAN_SELECT} WHERE user_id = ? AND deleted_at IS NULL AND (? = 0 OR is_favorite = 1) \
         ORDER BY updated_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, PlanRow>(&sql)
        .bind(user_id)
        .bind(favorite_only)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let plans = rows.into_iter().map(into_plan).collect::<Result<Vec<_>, _>>()?;
    Ok((plans, total))
}

/// 오프라인 사용으로 표시된 일정 전체 (페이지 없음)
pub async fn list_offline_plans(pool: &SqlitePool, user_id: &str) -> Result<Vec<Plan>, AppError> {
    let sql = format!(
        "{PLAN_SELECT} WHERE user_id = ? AND deleted_at IS NULL AND is_offline = 1 \
         ORDER BY updated_at DESC"
    );
    let rows = sqlx::query_as::<_, PlanRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(into_plan).collect()
}

pub async fn get_plan(pool: &SqlitePool, id: &str, user_id: &str) -> Result<Option<Plan>, AppError> {
    let sql = format!("{PLAN_SELECT} WHERE id = ? AND user_id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, PlanRow>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    row.map(into_plan).transpose()
}

pub async fn create_plan(
    pool: &SqlitePool,
    user_id: &str,
    guide_id: Option<&str>,
    name: &str,
    content: &PlanContent,
    generation_params: Option<&serde_json::Value>,
) -> Result<Plan, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let params = generation_params.map(to_json).transpose()?;

    sqlx::query(
        r#"
        INSERT INTO plans (id, user_id, guide_id, name, content, generation_params)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(guide_id)
    .bind(name)
    .bind(to_json(content)?)
    .bind(params)
    .execute(pool)
    .await?;

    get_plan(pool, &id, user_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created plan".to_string()))
}

/// 일정을 부분 수정합니다. `content`는 이미 정규화된 상태여야 합니다.
pub async fn update_plan(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    req: &UpdatePlanRequest,
) -> Result<Option<Plan>, AppError> {
    let content = req.content.as_ref().map(to_json).transpose()?;

    let mut query = QueryBuilder::<Sqlite>::new(
        "UPDATE plans SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
    );
    if let Some(name) = &req.name {
        query.push(", name = ").push_bind(name.trim());
    }
    if let Some(content) = content {
        query.push(", content = ").push_bind(content);
    }
    if let Some(is_favorite) = req.is_favorite {
        query.push(", is_favorite = ").push_bind(is_favorite);
    }
    if let Some(is_offline) = req.is_offline {
        query.push(", is_offline = ").push_bind(is_offline);
    }
    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" AND user_id = ")
        .push_bind(user_id)
        .push(" AND deleted_at IS NULL");

    let result = query.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_plan(pool, id, user_id).await
}

/// 일정 본문만 교체합니다. 편집 명령을 적용할 때마다 호출됩니다.
pub async fn update_plan_content(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    content: &PlanContent,
) -> Result<Option<Plan>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE plans
        SET content = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(to_json(content)?)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_plan(pool, id, user_id).await
}

/// 즐겨찾기를 뒤집습니다.
pub async fn toggle_favorite(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<Plan>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE plans
        SET is_favorite = 1 - is_favorite,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_plan(pool, id, user_id).await
}

/// 동기화 큐의 동작 하나를 적용합니다. 토글이 아니라 절대값을 씁니다.
pub async fn set_plan_flag(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    kind: SyncKind,
    value: bool,
) -> Result<bool, AppError> {
    let column = match kind {
        SyncKind::Favorite => "is_favorite",
        SyncKind::Offline => "is_offline",
    };
    let sql = format!(
        "UPDATE plans SET {column} = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ? AND user_id = ? AND deleted_at IS NULL"
    );

    let result = sqlx::query(&sql)
        .bind(value)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn soft_delete_plan(pool: &SqlitePool, id: &str, user_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE plans
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
