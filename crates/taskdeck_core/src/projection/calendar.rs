//! Month grid projection for the calendar view.
//!
//! # Invariants
//! - The grid always holds `CALENDAR_CELLS` (6 weeks x 7 days), weeks start
//!   on Sunday.
//! - `leading + days_in_month + trailing == CALENDAR_CELLS`.
//! - Filler cells from adjacent months never carry tasks.

use crate::model::task::{Priority, Task, TaskId};
use crate::navigation::CalendarCursor;
use crate::projection::filter::tasks_on_date;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub const CALENDAR_CELLS: usize = 42;
/// Task previews rendered inside one day cell.
pub const MAX_CELL_PREVIEWS: usize = 3;
/// Titles longer than this are shortened in day cells.
pub const PREVIEW_TITLE_CHARS: usize = 15;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Short task summary shown inside a day cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellTaskPreview {
    pub id: TaskId,
    pub title: String,
    pub priority: Priority,
    pub completed: bool,
}

/// One day in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day: u32,
    /// False for leading/trailing filler from adjacent months.
    pub in_month: bool,
    pub selected: bool,
    pub task_count: usize,
    pub previews: Vec<CellTaskPreview>,
    /// Tasks beyond the preview limit.
    pub overflow: usize,
}

impl CalendarCell {
    pub fn has_tasks(&self) -> bool {
        self.task_count > 0
    }
}

/// Full month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGrid {
    pub title: String,
    pub year: i32,
    /// Zero-based month.
    pub month: u32,
    pub leading: usize,
    pub days_in_month: usize,
    pub days_in_prev_month: usize,
    pub trailing: usize,
    pub cells: Vec<CalendarCell>,
}

/// Builds the 42-cell grid for `cursor`, marking `selected` when visible.
pub fn calendar_month(
    tasks: &[Task],
    cursor: CalendarCursor,
    selected: Option<NaiveDate>,
) -> CalendarGrid {
    let first_day = cursor.first_day();
    let leading = first_day.weekday().num_days_from_sunday() as usize;
    let days_in_month = cursor.days_in_month() as usize;
    let days_in_prev_month = cursor.days_in_prev_month() as usize;
    let trailing = CALENDAR_CELLS - (leading + days_in_month);

    let cells = (0..CALENDAR_CELLS)
        .map(|index| {
            // The cursor only admits months whose whole grid is representable.
            let date = first_day + Duration::days(index as i64 - leading as i64);
            let in_month = index >= leading && index < leading + days_in_month;
            if in_month {
                day_cell(tasks, date, selected)
            } else {
                filler_cell(date)
            }
        })
        .collect();

    CalendarGrid {
        title: format!("{} {}", MONTH_NAMES[cursor.month() as usize], cursor.year()),
        year: cursor.year(),
        month: cursor.month(),
        leading,
        days_in_month,
        days_in_prev_month,
        trailing,
        cells,
    }
}

fn day_cell(tasks: &[Task], date: NaiveDate, selected: Option<NaiveDate>) -> CalendarCell {
    let due = tasks_on_date(tasks, date);
    let previews = due
        .iter()
        .take(MAX_CELL_PREVIEWS)
        .map(|task| CellTaskPreview {
            id: task.id.clone(),
            title: shorten_title(&task.title),
            priority: task.priority,
            completed: task.is_completed(),
        })
        .collect();

    CalendarCell {
        date,
        day: date.day(),
        in_month: true,
        selected: selected == Some(date),
        task_count: due.len(),
        previews,
        overflow: due.len().saturating_sub(MAX_CELL_PREVIEWS),
    }
}

fn filler_cell(date: NaiveDate) -> CalendarCell {
    CalendarCell {
        date,
        day: date.day(),
        in_month: false,
        selected: false,
        task_count: 0,
        previews: Vec::new(),
        overflow: 0,
    }
}

fn shorten_title(title: &str) -> String {
    if title.chars().count() > PREVIEW_TITLE_CHARS {
        let mut short: String = title.chars().take(PREVIEW_TITLE_CHARS).collect();
        short.push_str("...");
        short
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::shorten_title;

    #[test]
    fn shorten_title_counts_characters_not_bytes() {
        assert_eq!(shorten_title("short"), "short");
        assert_eq!(shorten_title("exactly fifteen"), "exactly fifteen");
        let long = "ä".repeat(16);
        assert_eq!(shorten_title(&long), format!("{}...", "ä".repeat(15)));
    }
}
