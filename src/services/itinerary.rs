//! # 일정 편집
//!
//! 미리보기/편집 화면의 드래그 앤 드롭과 메모 편집이 보내는 명령(`PlanEdit`)을
//! 일정 본문에 적용합니다. 적용에 성공한 본문은 라우트에서 바로 저장됩니다.
//!
//! 일차와 인덱스는 0부터 시작합니다. 범위를 벗어나면 `AppError::BadRequest`.

use crate::error::AppError;
use crate::models::*;

fn day_out_of_range(day: usize) -> AppError {
    AppError::BadRequest(format!("Day {} does not exist", day))
}

fn item_out_of_range(day: usize, index: usize) -> AppError {
    AppError::BadRequest(format!("Item {} does not exist on day {}", index, day))
}

/// 편집 명령 하나를 적용합니다. 실패하면 `content`는 바뀌지 않습니다.
pub fn apply_edit(content: &mut PlanContent, edit: &PlanEdit) -> Result<(), AppError> {
    match edit {
        PlanEdit::Move {
            from_day,
            from_index,
            to_day,
            to_index,
        } => move_item(content, *from_day, *from_index, *to_day, *to_index),
        PlanEdit::Note { day, index, note } => {
            let item = content
                .days
                .get_mut(*day)
                .ok_or_else(|| day_out_of_range(*day))?
                .attractions
                .get_mut(*index)
                .ok_or_else(|| item_out_of_range(*day, *index))?;
            item.note = note
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string);
            Ok(())
        }
        PlanEdit::Remove { day, index } => {
            let items = &mut content
                .days
                .get_mut(*day)
                .ok_or_else(|| day_out_of_range(*day))?
                .attractions;
            if *index >= items.len() {
                return Err(item_out_of_range(*day, *index));
            }
            items.remove(*index);
            Ok(())
        }
    }
}

/// 항목을 꺼내 대상 일차의 `to_index` 위치에 넣습니다.
/// `to_index`는 꺼낸 뒤의 목록 기준이며, 길이를 넘으면 맨 끝에 붙입니다.
fn move_item(
    content: &mut PlanContent,
    from_day: usize,
    from_index: usize,
    to_day: usize,
    to_index: usize,
) -> Result<(), AppError> {
    // 검증을 먼저 끝내서 실패 시 본문이 반쯤 바뀐 채로 남지 않게 한다
    if to_day >= content.days.len() {
        return Err(day_out_of_range(to_day));
    }
    let source = content
        .days
        .get(from_day)
        .ok_or_else(|| day_out_of_range(from_day))?;
    if from_index >= source.attractions.len() {
        return Err(item_out_of_range(from_day, from_index));
    }

    let item = content.days[from_day].attractions.remove(from_index);
    let target = &mut content.days[to_day].attractions;
    let position = to_index.min(target.len());
    target.insert(position, item);
    Ok(())
}
