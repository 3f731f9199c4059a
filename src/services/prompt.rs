//! # 일정 생성 프롬프트
//!
//! 가이드 정보, 명소 목록, 사용자 취향으로 chat-completion 프롬프트를 만듭니다.
//! 시스템 프롬프트는 `PlanContent` JSON 형태만 돌려달라고 요구합니다.

use std::fmt::Write;

use crate::models::*;

pub const SYSTEM_PROMPT: &str = r#"You are a travel planner. Build a day-by-day itinerary from the guide and attractions provided.
Respond with ONE JSON object and nothing else, using exactly this shape:
{
  "summary": "one or two sentences",
  "days": [
    {
      "day": 1,
      "title": "short theme for the day",
      "date": "YYYY-MM-DD or null",
      "attractions": [
        {
          "attraction_id": "id from the list or null",
          "name": "attraction name",
          "description": "what to do there",
          "time": "HH:MM",
          "duration": "e.g. 2h",
          "note": "practical tip or null"
        }
      ]
    }
  ],
  "tips": ["short practical tips"]
}
Prefer attractions from the provided list and copy their attraction_id. Do not wrap the JSON in markdown."#;

/// 사용자 프롬프트 본문을 만듭니다.
pub fn build_user_prompt(
    guide: &Guide,
    attractions: &[GuideAttraction],
    req: &GeneratePlanRequest,
) -> String {
    let mut prompt = String::new();

    // String에 대한 write!는 실패하지 않으므로 결과를 무시합니다.
    let _ = writeln!(prompt, "Guide: {}", guide.title);
    let _ = writeln!(prompt, "Location: {}", guide.location);
    if let Some(description) = guide.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(prompt, "Description: {}", description.trim());
    }
    let _ = writeln!(prompt, "Suggested duration: {} day(s)", guide.duration_days);

    prompt.push_str("\nAttractions:\n");
    if attractions.is_empty() {
        prompt.push_str("- (none listed; suggest well-known places in the location)\n");
    }
    for entry in attractions {
        let a = &entry.attraction;
        let _ = write!(prompt, "- [{}] {}", a.id, a.name);
        if let Some(address) = &a.address {
            let _ = write!(prompt, " — {}", address);
        }
        if !a.tags.is_empty() {
            let _ = write!(prompt, " (tags: {})", a.tags.join(", "));
        }
        if let Some(description) = &a.description {
            let _ = write!(prompt, ": {}", description);
        }
        prompt.push('\n');
    }

    let _ = writeln!(prompt, "\nTrip length: {} day(s)", req.days);
    if let Some(start) = req.start_date {
        let _ = writeln!(prompt, "Start date: {}", start.format("%Y-%m-%d"));
    }

    let prefs = &req.preferences;
    let mut lines = Vec::new();
    if !prefs.interests.is_empty() {
        lines.push(format!("Interests: {}", prefs.interests.join(", ")));
    }
    if let Some(budget) = &prefs.budget {
        lines.push(format!("Budget: {}", budget));
    }
    if let Some(style) = &prefs.travel_style {
        lines.push(format!("Travel style: {}", style));
    }
    if let Some(pace) = &prefs.pace {
        lines.push(format!("Pace: {}", pace));
    }
    if let Some(notes) = &prefs.notes {
        lines.push(format!("Notes: {}", notes));
    }
    if !lines.is_empty() {
        prompt.push_str("\nTraveller preferences:\n");
        for line in lines {
            let _ = writeln!(prompt, "- {}", line);
        }
    }

    let _ = write!(
        prompt,
        "\nCreate exactly {} day(s) in the \"days\" array.",
        req.days
    );
    prompt
}
