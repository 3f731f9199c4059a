//! # 오프라인 동기화 모델
//!
//! 브라우저는 연결이 끊긴 동안 즐겨찾기/오프라인 토글을 큐에 쌓아두었다가
//! 다시 연결되면 `POST /api/offline/sync`로 한 번에 보냅니다.
//!
//! 충돌 규칙은 "마지막 쓰기 우선(last write wins)" 하나뿐입니다.
//! 큐에 들어간 시각(`queued_at`)이 서버의 `updated_at`보다 오래됐으면 버립니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::guide::GuideDetail;
use super::plan::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    Favorite,
    Offline,
}

/// 큐에 쌓인 동작 하나. 토글이 아니라 목표 값(`value`)을 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncAction {
    pub kind: SyncKind,
    pub plan_id: String,
    pub value: bool,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub actions: Vec<SyncAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Applied,
    /// 서버 쪽 변경이 더 최신이라 무시됨
    Stale,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    /// 요청 `actions` 배열에서의 위치. 결과는 재생 순서(`queued_at`)로 나갑니다.
    pub index: usize,
    pub plan_id: String,
    pub kind: SyncKind,
    pub status: SyncStatus,
}

/// 오프라인 미러링용 일정 묶음: 일정과 원본 가이드 스냅샷
#[derive(Debug, Serialize, Deserialize)]
pub struct OfflinePlan {
    pub plan: Plan,
    pub guide: Option<GuideDetail>,
}
