//! # 자유 텍스트 일정 파서
//!
//! JSON이 아닌 예전 형식의 일정 요약(마크다운 비슷한 텍스트)을 줄 단위 정규식으로
//! 긁어 `PlanContent`로 바꿉니다.
//!
//! ```text
//! A relaxed weekend in Paris.        ← 첫 일차 앞의 일반 텍스트 → summary
//! ## Day 1: Museums                  ← 일차 헤더
//! - 09:00 - **Louvre** - Mona Lisa   ← 항목 (시간, 이름, 설명)
//! - Tuileries Garden: picnic
//! **Day 2**
//! 1. Eiffel Tower
//! Tips:                              ← 이후 불릿은 tips
//! - Buy a museum pass
//! ```
//!
//! 일차 헤더보다 앞에 나온 불릿은 암묵적인 1일차에 들어갑니다.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::*;

static DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*day\s+(\d+)\s*(?:\*\*|__)?\s*(?:[:\-–—.]\s*)?(.*?)\s*(?:\*\*|__)?\s*$",
    )
    .expect("day header regex is valid")
});

static TIPS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*(?:travel\s+)?tips?\s*:?\s*(?:\*\*|__)?\s*:?\s*$")
        .expect("tips header regex is valid")
});

static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*•+]|\d+[.)])\s+(.+?)\s*$").expect("bullet regex is valid")
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^((?:\d{1,2}:\d{2}(?:\s*[ap]\.?m\.?)?)|(?:\d{1,2}\s*[ap]\.?m\.?))\s*[-–—:]?\s*(.+)$",
    )
    .expect("time regex is valid")
});

static BOLD_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\*(.+?)\*\*\s*(?:[-–—:]\s*)?(.*)$").expect("bold name regex is valid")
});

enum Section {
    Preamble,
    Day,
    Tips,
}

/// 불릿 본문 하나를 항목으로 바꿉니다.
fn parse_item(body: &str) -> PlanItem {
    let (time, rest) = match TIME_RE.captures(body) {
        Some(caps) => (
            Some(caps[1].trim().to_string()),
            caps.get(2).map_or("", |m| m.as_str()).to_string(),
        ),
        None => (None, body.to_string()),
    };

    let (name, description) = if let Some(caps) = BOLD_NAME_RE.captures(&rest) {
        let name = caps[1].trim().trim_end_matches(':').trim().to_string();
        let description = caps.get(2).map(|m| m.as_str().trim().to_string());
        (name, description)
    } else {
        split_name(&rest)
    };

    PlanItem {
        name,
        description: description.filter(|d| !d.is_empty()),
        time,
        ..Default::default()
    }
}

/// "이름: 설명", "이름 - 설명" 중 가장 먼저 나오는 구분자로 나눕니다.
fn split_name(text: &str) -> (String, Option<String>) {
    let separators = [": ", " - ", " – ", " — "];
    let split = separators
        .iter()
        .filter_map(|sep| text.find(sep).map(|pos| (pos, sep.len())))
        .min_by_key(|(pos, _)| *pos);

    match split {
        Some((pos, len)) => (
            text[..pos].trim().to_string(),
            Some(text[pos + len..].trim().to_string()),
        ),
        None => (text.trim().to_string(), None),
    }
}

/// 자유 텍스트 일정을 파싱합니다. 불릿이 하나도 없으면 `days`가 빈 결과를 돌려줍니다.
pub fn parse_legacy_plan(text: &str) -> PlanContent {
    let mut content = PlanContent::default();
    let mut summary_lines: Vec<String> = Vec::new();
    let mut section = Section::Preamble;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = DAY_RE.captures(line) {
            let title = caps.get(2).map(|m| m.as_str().trim().to_string());
            content.days.push(PlanDay {
                day: caps[1].parse().unwrap_or(0),
                title: title.filter(|t| !t.is_empty()),
                ..Default::default()
            });
            section = Section::Day;
            continue;
        }

        if TIPS_RE.is_match(line) {
            section = Section::Tips;
            continue;
        }

        match BULLET_RE.captures(line) {
            Some(caps) => {
                let body = &caps[1];
                match section {
                    Section::Tips => content.tips.push(body.to_string()),
                    Section::Preamble | Section::Day => {
                        if content.days.is_empty() {
                            content.days.push(PlanDay::default());
                            section = Section::Day;
                        }
                        if let Some(day) = content.days.last_mut() {
                            day.attractions.push(parse_item(body));
                        }
                    }
                }
            }
            None => {
                if matches!(section, Section::Preamble) {
                    summary_lines.push(line.trim().trim_start_matches('#').trim().to_string());
                }
            }
        }
    }

    if !summary_lines.is_empty() {
        content.summary = Some(summary_lines.join(" "));
    }

    // 불릿 없는 텍스트는 일정으로 보지 않음
    if content.item_count() == 0 {
        content.days.clear();
    }

    content.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
A relaxed weekend in Paris.

## Day 1: Museums
- 09:00 - **Louvre** - See the Mona Lisa
- Tuileries Garden: picnic lunch
- 3pm Musée d'Orsay

**Day 2 - Landmarks**
1. Eiffel Tower – go at sunset
2. 9:30 AM: Seine cruise

Tips:
- Buy a museum pass
";

    #[test]
    fn parses_days_items_and_tips() {
        let content = parse_legacy_plan(SAMPLE);

        assert_eq!(content.summary.as_deref(), Some("A relaxed weekend in Paris."));
        assert_eq!(content.days.len(), 2);
        assert_eq!(content.tips, vec!["Buy a museum pass".to_string()]);

        let day1 = &content.days[0];
        assert_eq!(day1.day, 1);
        assert_eq!(day1.title.as_deref(), Some("Museums"));
        assert_eq!(day1.attractions.len(), 3);

        let louvre = &day1.attractions[0];
        assert_eq!(louvre.time.as_deref(), Some("09:00"));
        assert_eq!(louvre.name, "Louvre");
        assert_eq!(louvre.description.as_deref(), Some("See the Mona Lisa"));

        assert_eq!(day1.attractions[1].name, "Tuileries Garden");
        assert_eq!(day1.attractions[1].description.as_deref(), Some("picnic lunch"));

        assert_eq!(day1.attractions[2].time.as_deref(), Some("3pm"));
        assert_eq!(day1.attractions[2].name, "Musée d'Orsay");

        let day2 = &content.days[1];
        assert_eq!(day2.title.as_deref(), Some("Landmarks"));
        assert_eq!(day2.attractions[0].name, "Eiffel Tower");
        assert_eq!(day2.attractions[0].description.as_deref(), Some("go at sunset"));
        assert_eq!(day2.attractions[1].time.as_deref(), Some("9:30 AM"));
        assert_eq!(day2.attractions[1].name, "Seine cruise");
    }

    #[test]
    fn bullets_before_any_header_go_to_day_one() {
        let content = parse_legacy_plan("- Colosseum\n- Forum\n## Day 2\n- Vatican");
        assert_eq!(content.days.len(), 2);
        assert_eq!(content.days[0].attractions.len(), 2);
        assert_eq!(content.days[1].day, 2);
        assert_eq!(content.days[1].attractions[0].name, "Vatican");
    }

    #[test]
    fn day_headers_are_case_insensitive() {
        let content = parse_legacy_plan("DAY 1 — Food\n* Market tour");
        assert_eq!(content.days[0].title.as_deref(), Some("Food"));
        assert_eq!(content.days[0].attractions[0].name, "Market tour");
    }

    #[test]
    fn numbers_without_time_marker_stay_in_the_name() {
        let item = parse_item("10 Downing Street");
        assert_eq!(item.time, None);
        assert_eq!(item.name, "10 Downing Street");
    }

    #[test]
    fn text_without_bullets_has_no_days() {
        let content = parse_legacy_plan("Day 1\nJust wander around.\nDay 2\nRelax.");
        assert!(content.days.is_empty());
    }
}
