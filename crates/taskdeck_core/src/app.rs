//! Command dispatch and view-model assembly.
//!
//! # Responsibility
//! - Accept typed commands from any presentation layer.
//! - Apply them to the task store or navigation state, in that order:
//!   mutate, persist, then recompute views.
//! - Build a serializable `ViewModel` from the current state.
//!
//! # Invariants
//! - `App` exclusively owns the task store; views receive copies.
//! - A rejected command leaves both task data and navigation unchanged.

use crate::model::task::{Task, TaskId, TaskInput, TaskPatch};
use crate::navigation::{NavigationState, Section};
use crate::projection::calendar::{calendar_month, CalendarGrid};
use crate::projection::filter::{
    filter_tasks, recent_tasks, tasks_on_date, PriorityFilter, StatusFilter, TaskFilter,
    RECENT_TASKS_LIMIT,
};
use crate::projection::series::{completion_series, CompletionBucket, Timeframe};
use crate::projection::stats::{
    counts_by_priority, counts_by_status, dashboard_stats, DashboardStats, PriorityCounts,
    StatusCounts,
};
use crate::service::task_store::{PersistenceState, StoreError, StoreResult, TaskStore};
use crate::storage::KeyValueStore;
use chrono::{DateTime, NaiveDate, TimeZone};
use log::debug;
use serde::Serialize;

/// Typed user intent emitted by a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create(TaskInput),
    Edit { id: TaskId, patch: TaskPatch },
    Delete(TaskId),
    ToggleComplete(TaskId),
    /// Opens the editor for an existing task, or for a new one with `None`.
    OpenEditor(Option<TaskId>),
    CloseEditor,
    /// Saves the editor form: updates the task being edited, or creates one.
    SubmitEditor(TaskInput),
    SelectDate(NaiveDate),
    SwitchSection(Section),
    NavigateMonth(i32),
    SetFilters {
        status: StatusFilter,
        priority: PriorityFilter,
    },
    SetAnalyticsTimeframe(Timeframe),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Edit { .. } => "edit",
            Self::Delete(_) => "delete",
            Self::ToggleComplete(_) => "toggle_complete",
            Self::OpenEditor(_) => "open_editor",
            Self::CloseEditor => "close_editor",
            Self::SubmitEditor(_) => "submit_editor",
            Self::SelectDate(_) => "select_date",
            Self::SwitchSection(_) => "switch_section",
            Self::NavigateMonth(_) => "navigate_month",
            Self::SetFilters { .. } => "set_filters",
            Self::SetAnalyticsTimeframe(_) => "set_timeframe",
        }
    }
}

/// Result of a successfully handled command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Task created, updated or toggled by the command.
    pub task: Option<Task>,
    /// Whether a delete removed anything.
    pub removed: bool,
    pub persistence: PersistenceState,
}

/// Dashboard section content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent: Vec<Task>,
}

/// Tasks due on the selected calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

/// Inputs for the three analytics charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub timeframe: Timeframe,
    pub status: StatusCounts,
    pub priority: PriorityCounts,
    pub completion: Vec<CompletionBucket>,
}

/// Everything a presentation layer needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub section: Section,
    pub page_title: &'static str,
    pub navigation: NavigationState,
    pub dashboard: DashboardView,
    pub tasks: Vec<Task>,
    pub calendar: CalendarGrid,
    pub selected_day: Option<DayView>,
    pub analytics: AnalyticsView,
    pub editing: Option<Task>,
    /// Set when the last save failed; describes why.
    pub unsaved: Option<String>,
}

/// Application core: task store plus navigation state.
pub struct App<S: KeyValueStore> {
    store: TaskStore<S>,
    navigation: NavigationState,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: TaskStore<S>, today: NaiveDate) -> Self {
        Self {
            store,
            navigation: NavigationState::new(today),
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Handles one command to completion.
    ///
    /// # Errors
    /// - `NotFound` for edit/toggle/open-editor on a missing task.
    /// - `Validation` for an empty title on create, edit or submit.
    pub fn dispatch(&mut self, command: Command) -> StoreResult<Outcome> {
        debug!("event=dispatch module=app command={}", command.name());
        let mut removed = false;
        let task = match command {
            Command::Create(input) => Some(self.store.create(input)?),
            Command::Edit { id, patch } => Some(self.store.update(&id, patch)?),
            Command::Delete(id) => {
                removed = self.store.delete(&id);
                if self.navigation.editing.as_deref() == Some(id.as_str()) {
                    self.navigation.end_edit();
                }
                None
            }
            Command::ToggleComplete(id) => Some(self.store.toggle_complete(&id)?),
            Command::OpenEditor(Some(id)) => {
                let task = self
                    .store
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| StoreError::NotFound(id.clone()))?;
                self.navigation.begin_edit(id);
                Some(task)
            }
            Command::OpenEditor(None) | Command::CloseEditor => {
                self.navigation.end_edit();
                None
            }
            Command::SubmitEditor(input) => {
                let saved = match self.navigation.editing.clone() {
                    Some(id) => self.store.update(&id, input.into_patch())?,
                    None => self.store.create(input)?,
                };
                self.navigation.end_edit();
                Some(saved)
            }
            Command::SelectDate(date) => {
                self.navigation.select_date(date);
                None
            }
            Command::SwitchSection(section) => {
                self.navigation.switch_section(section);
                None
            }
            Command::NavigateMonth(delta) => {
                self.navigation.navigate_month(delta);
                None
            }
            Command::SetFilters { status, priority } => {
                self.navigation.set_filters(TaskFilter::new(status, priority));
                None
            }
            Command::SetAnalyticsTimeframe(timeframe) => {
                self.navigation.set_timeframe(timeframe);
                None
            }
        };

        Ok(Outcome {
            task,
            removed,
            persistence: self.store.persistence().clone(),
        })
    }

    /// Recomputes every projection for the current state.
    ///
    /// `now` fixes "today" and the time zone used for calendar days and
    /// completion buckets.
    pub fn view<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ViewModel {
        let tasks = self.store.list();
        let nav = &self.navigation;

        let selected_day = nav.selected_date.map(|date| DayView {
            date,
            tasks: tasks_on_date(tasks, date).into_iter().cloned().collect(),
        });

        let editing = nav
            .editing
            .as_deref()
            .and_then(|id| self.store.get(id))
            .cloned();

        let unsaved = match self.store.persistence() {
            PersistenceState::Saved => None,
            PersistenceState::Unsaved { reason } => Some(reason.to_string()),
        };

        ViewModel {
            section: nav.section,
            page_title: nav.section.title(),
            navigation: nav.clone(),
            dashboard: DashboardView {
                stats: dashboard_stats(tasks),
                recent: recent_tasks(tasks, RECENT_TASKS_LIMIT)
                    .into_iter()
                    .cloned()
                    .collect(),
            },
            tasks: filter_tasks(tasks, &nav.filter)
                .into_iter()
                .cloned()
                .collect(),
            calendar: calendar_month(tasks, nav.calendar, nav.selected_date),
            selected_day,
            analytics: AnalyticsView {
                timeframe: nav.timeframe,
                status: counts_by_status(tasks),
                priority: counts_by_priority(tasks),
                completion: completion_series(tasks, nav.timeframe, now),
            },
            editing,
            unsaved,
        }
    }
}
