//! Section and calendar navigation state.
//!
//! # Responsibility
//! - Track the active section, calendar month, selected date, list filters,
//!   analytics timeframe and the task open for editing.
//!
//! # Invariants
//! - Navigation never touches task data.
//! - At most one task is open for editing.
//! - `CalendarCursor` always points at the first day of a month whose
//!   calendar grid fits in the representable date range.

use crate::model::task::{ParseEnumError, TaskId};
use crate::projection::calendar::CALENDAR_CELLS;
use crate::projection::filter::TaskFilter;
use crate::projection::series::Timeframe;
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Top-level UI section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Tasks,
    Calendar,
    Analytics,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Tasks,
        Section::Calendar,
        Section::Analytics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Tasks => "tasks",
            Self::Calendar => "calendar",
            Self::Analytics => "analytics",
        }
    }

    /// Page heading shown for this section.
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Tasks => "Task Tracker",
            Self::Calendar => "Calendar",
            Self::Analytics => "Analytics",
        }
    }
}

impl FromStr for Section {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "section",
                value: value.to_string(),
            })
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month shown by the calendar view.
///
/// Only months whose full calendar grid (including filler days from the
/// adjacent months) is representable can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarCursor {
    first_day: NaiveDate,
}

impl CalendarCursor {
    /// Cursor for `year` and zero-based `month` (0 = January).
    ///
    /// Returns `None` when the month is out of range or too close to the
    /// edge of the supported date range to draw.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.checked_add(1)?, 1)
            .filter(|first_day| grid_fits(*first_day))
            .map(|first_day| Self { first_day })
    }

    /// Cursor for the month containing `date`, clamped to the supported range.
    pub fn containing(date: NaiveDate) -> Self {
        Self::clamped(month_start(date))
    }

    /// Earliest month that can be drawn.
    pub fn first_supported() -> Self {
        let mut first_day = month_start(NaiveDate::MIN);
        while !grid_fits(first_day) {
            match first_day.checked_add_months(Months::new(1)) {
                Some(next) => first_day = next,
                None => break,
            }
        }
        Self { first_day }
    }

    /// Latest month that can be drawn.
    pub fn last_supported() -> Self {
        let mut first_day = month_start(NaiveDate::MAX);
        while !grid_fits(first_day) {
            match first_day.checked_sub_months(Months::new(1)) {
                Some(prev) => first_day = prev,
                None => break,
            }
        }
        Self { first_day }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Zero-based month (0 = January).
    pub fn month(&self) -> u32 {
        self.first_day.month0()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Following month, wrapping December to January of the next year.
    pub fn next(self) -> Self {
        self.navigate(1)
    }

    /// Preceding month, wrapping January to December of the previous year.
    pub fn prev(self) -> Self {
        self.navigate(-1)
    }

    /// Moves by `delta` months; negative values go back.
    ///
    /// Saturates at [`first_supported`](Self::first_supported) and
    /// [`last_supported`](Self::last_supported).
    pub fn navigate(self, delta: i32) -> Self {
        let months = Months::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.first_day.checked_add_months(months)
        } else {
            self.first_day.checked_sub_months(months)
        };
        match moved {
            Some(first_day) => Self::clamped(first_day),
            None if delta >= 0 => Self::last_supported(),
            None => Self::first_supported(),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month() + 1)
    }

    /// Days in the month before this one, without leaving the supported range.
    pub fn days_in_prev_month(&self) -> u32 {
        match self.month() {
            0 => days_in_month(self.year().saturating_sub(1), 12),
            month0 => days_in_month(self.year(), month0),
        }
    }

    fn clamped(first_day: NaiveDate) -> Self {
        if grid_fits(first_day) {
            return Self { first_day };
        }
        let first = Self::first_supported();
        if first_day < first.first_day {
            first
        } else {
            Self::last_supported()
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Whether every cell of the grid starting in `first_day`'s week exists.
fn grid_fits(first_day: NaiveDate) -> bool {
    let leading = i64::from(first_day.weekday().num_days_from_sunday());
    first_day
        .checked_sub_signed(Duration::days(leading))
        .and_then(|start| start.checked_add_signed(Duration::days(CALENDAR_CELLS as i64 - 1)))
        .is_some()
}

impl Serialize for CalendarCursor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("CalendarCursor", 2)?;
        state.serialize_field("year", &self.year())?;
        state.serialize_field("month", &self.month())?;
        state.end()
    }
}

/// Number of days in `month` (1-based) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Ephemeral UI navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub section: Section,
    pub calendar: CalendarCursor,
    pub selected_date: Option<NaiveDate>,
    pub filter: TaskFilter,
    pub timeframe: Timeframe,
    pub editing: Option<TaskId>,
}

impl NavigationState {
    /// Initial state: dashboard, calendar on the month containing `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            section: Section::Dashboard,
            calendar: CalendarCursor::containing(today),
            selected_date: None,
            filter: TaskFilter::default(),
            timeframe: Timeframe::default(),
            editing: None,
        }
    }

    pub fn switch_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn navigate_month(&mut self, delta: i32) {
        self.calendar = self.calendar.navigate(delta);
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }

    pub fn set_filters(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.timeframe = timeframe;
    }

    /// Opens the editor for `id`, replacing any task already being edited.
    pub fn begin_edit(&mut self, id: TaskId) {
        self.editing = Some(id);
    }

    pub fn end_edit(&mut self) {
        self.editing = None;
    }
}
