//! # 오프라인 동기화
//!
//! 큐에 쌓인 동작을 `queued_at` 오름차순으로 재생합니다.
//!
//! 같은 요청 안에서 먼저 적용된 동작이 `updated_at`을 현재 시각으로 바꾸므로,
//! 오래됨 판정은 요청이 시작될 때 읽은 일정의 `updated_at`을 기준으로 합니다.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::*;

/// 서버 쪽 변경(`updated_at`)이 큐 시각보다 새로우면 true.
/// 저장된 시각을 읽을 수 없으면 동작을 살립니다.
pub fn is_stale(queued_at: DateTime<Utc>, updated_at: &str) -> bool {
    match DateTime::parse_from_rfc3339(updated_at) {
        Ok(updated) => queued_at < updated.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!("Unreadable updated_at '{}': {}", updated_at, e);
            false
        }
    }
}

pub async fn replay_actions(
    pool: &SqlitePool,
    user_id: &str,
    actions: Vec<SyncAction>,
) -> Result<Vec<SyncResult>, AppError> {
    let mut actions: Vec<(usize, SyncAction)> = actions.into_iter().enumerate().collect();
    // 정렬은 안정적이라 같은 시각의 동작은 보낸 순서를 유지
    actions.sort_by_key(|(_, action)| action.queued_at);

    // plan_id → 요청 시작 시점의 updated_at (None이면 없는 일정)
    let mut baseline: HashMap<String, Option<String>> = HashMap::new();
    let mut results = Vec::with_capacity(actions.len());

    for (index, action) in actions {
        if !baseline.contains_key(&action.plan_id) {
            let plan = db::plans::get_plan(pool, &action.plan_id, user_id).await?;
            baseline.insert(action.plan_id.clone(), plan.map(|p| p.updated_at));
        }

        let status = match baseline.get(&action.plan_id).and_then(|u| u.as_deref()) {
            None => SyncStatus::NotFound,
            Some(updated_at) if is_stale(action.queued_at, updated_at) => SyncStatus::Stale,
            Some(_) => {
                let applied = db::plans::set_plan_flag(
                    pool,
                    &action.plan_id,
                    user_id,
                    action.kind,
                    action.value,
                )
                .await?;
                if applied {
                    SyncStatus::Applied
                } else {
                    SyncStatus::NotFound
                }
            }
        };

        tracing::debug!(plan_id = %action.plan_id, kind = ?action.kind, status = ?status, "Sync action");
        results.push(SyncResult {
            index,
            plan_id: action.plan_id,
            kind: action.kind,
            status,
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn older_actions_are_stale() {
        let updated = "2026-03-01T12:00:00.000Z";
        let before = Utc.with_ymd_and_hms(2026, 3, 1, 11, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 1).unwrap();

        assert!(is_stale(before, updated));
        assert!(!is_stale(after, updated));
    }

    #[test]
    fn same_instant_is_not_stale() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(!is_stale(at, "2026-03-01T12:00:00.000Z"));
    }

    #[test]
    fn unreadable_timestamp_keeps_the_action() {
        let at = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_stale(at, "yesterday"));
    }
}
