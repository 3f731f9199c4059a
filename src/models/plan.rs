//! # 여행 일정(Plan) 모델 정의
//!
//! Plan은 사용자가 저장한 일자별 여행 일정입니다.
//! 일정 본문(`PlanContent`)은 `days → attractions` 형태의 JSON 트리이며,
//! DB에는 TEXT 컬럼에 JSON 문자열로 저장됩니다.
//!
//! ## 구조체 역할
//! - `PlanRow`: DB 행 그대로 (JSON 문자열, 0/1 정수 플래그)
//! - `Plan`: API 응답용 (파싱된 `PlanContent`, bool 플래그)
//! - `PlanContent` / `PlanDay` / `PlanItem`: 일정 본문 트리
//!
//! AI가 돌려준 JSON을 그대로 받아들이기 위해 역직렬화는 관대하게 동작합니다.
//! (`activities` → `attractions`, 숫자/문자열 혼용 등)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::pagination::PageParams;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRow {
    pub id: String,
    pub user_id: String,
    pub guide_id: Option<String>,
    pub name: String,
    pub content: String,
    pub generation_params: Option<String>,
    pub is_favorite: i64,
    pub is_offline: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub user_id: String,
    pub guide_id: Option<String>,
    pub name: String,
    pub content: PlanContent,
    pub generation_params: Option<Value>,
    pub is_favorite: bool,
    pub is_offline: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<PlanRow> for Plan {
    type Error = serde_json::Error;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let content = serde_json::from_str(&row.content)?;
        let generation_params = row
            .generation_params
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            guide_id: row.guide_id,
            name: row.name,
            content,
            generation_params,
            is_favorite: row.is_favorite != 0,
            is_offline: row.is_offline != 0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ── 일정 본문 트리 ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanContent {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub days: Vec<PlanDay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient_strings")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    /// 1부터 시작하는 일차. 정규화 시 배열 위치로 다시 매겨집니다.
    #[serde(default, alias = "day_number", deserialize_with = "lenient_day")]
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, alias = "activities", alias = "items", deserialize_with = "null_as_empty")]
    pub attractions: Vec<PlanItem>,
}

/// 일정 항목 하나.
///
/// 역직렬화는 `RawPlanItem`을 거쳐 이름/메모 후보 필드를 하나로 합칩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlanItem")]
pub struct PlanItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attraction_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// 이름 후보(`name` → `title` → `attraction`)와 메모 후보(`note` → `notes`)를 따로 받습니다.
#[derive(Deserialize)]
struct RawPlanItem {
    #[serde(default, deserialize_with = "lenient_string")]
    attraction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    attraction: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    note: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    notes: Option<String>,
}

impl From<RawPlanItem> for PlanItem {
    fn from(raw: RawPlanItem) -> Self {
        let name = [raw.name, raw.title, raw.attraction]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty())
            .unwrap_or_default();

        Self {
            attraction_id: raw.attraction_id,
            name,
            description: raw.description,
            time: raw.time,
            duration: raw.duration,
            note: raw.note.or(raw.notes),
        }
    }
}

impl PlanContent {
    /// 일정 트리를 정규화합니다.
    ///
    /// - 일차를 배열 위치 기준 1부터 다시 매김
    /// - 문자열 앞뒤 공백 제거, 빈 문자열은 None
    /// - 이름이 빈 항목 제거
    pub fn normalize(mut self) -> Self {
        self.summary = clean(self.summary);
        self.tips = self
            .tips
            .into_iter()
            .map(|tip| tip.trim().to_string())
            .filter(|tip| !tip.is_empty())
            .collect();

        for (index, day) in self.days.iter_mut().enumerate() {
            day.day = index as u32 + 1;
            day.title = clean(day.title.take());
            day.date = clean(day.date.take());

            let items = std::mem::take(&mut day.attractions);
            day.attractions = items
                .into_iter()
                .filter_map(|mut item| {
                    item.name = item.name.trim().to_string();
                    if item.name.is_empty() {
                        return None;
                    }
                    item.attraction_id = clean(item.attraction_id);
                    item.description = clean(item.description);
                    item.time = clean(item.time);
                    item.duration = clean(item.duration);
                    item.note = clean(item.note);
                    Some(item)
                })
                .collect();
        }

        self
    }

    /// 모든 일차의 항목 수 합계
    pub fn item_count(&self) -> usize {
        self.days.iter().map(|d| d.attractions.len()).sum()
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 문자열, 숫자, null을 모두 `Option<String>`으로 받아들입니다.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// 문자열 배열을 받되 null이나 객체 같은 항목은 건너뜁니다. 배열이 아니면 빈 목록.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

/// `null`을 빈 목록으로 읽습니다.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `1`, `"1"`, `"Day 1"` 같은 값을 일차 번호로 읽습니다. 읽을 수 없으면 0.
fn lenient_day<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or(0) as u32,
        Value::String(s) => s
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap_or(0),
        _ => 0,
    })
}

// ── 요청/응답 ──

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub guide_id: Option<String>,
    pub content: Option<PlanContent>,
    /// `content` 없이 자유 텍스트 일정만 보낸 경우 텍스트 파서로 변환
    pub legacy_text: Option<String>,
    pub generation_params: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub content: Option<PlanContent>,
    pub is_favorite: Option<bool>,
    pub is_offline: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// true면 즐겨찾기만
    pub favorite: Option<bool>,
}

impl PlanFilter {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// 사용자 여행 취향: 프롬프트에 그대로 반영됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelPreferences {
    #[serde(default)]
    pub interests: Vec<String>,
    pub budget: Option<String>,
    pub travel_style: Option<String>,
    pub pace: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    pub guide_id: String,
    pub days: u32,
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub preferences: TravelPreferences,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePlanResponse {
    pub content: PlanContent,
    /// 저장 시 `generation_params`로 그대로 돌려보내면 됩니다.
    pub generation_params: Value,
}

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

/// 일정 편집 한 건: 드래그 앤 드롭 이동, 메모 편집, 항목 삭제.
/// 일차(day)와 인덱스는 모두 0부터 시작합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlanEdit {
    Move {
        from_day: usize,
        from_index: usize,
        to_day: usize,
        to_index: usize,
    },
    Note {
        day: usize,
        index: usize,
        note: Option<String>,
    },
    Remove {
        day: usize,
        index: usize,
    },
}
