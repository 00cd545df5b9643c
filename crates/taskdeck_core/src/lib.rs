//! Core domain logic for TaskDeck.
//! This crate is the single source of truth for task invariants.

pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod projection;
pub mod service;
pub mod storage;

pub use app::{App, Command, Outcome, ViewModel};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::task::{
    Priority, Task, TaskId, TaskInput, TaskPatch, TaskStatus, TaskValidationError,
};
pub use navigation::{CalendarCursor, NavigationState, Section};
pub use projection::calendar::{calendar_month, CalendarCell, CalendarGrid};
pub use projection::filter::{
    filter_tasks, recent_tasks, tasks_on_date, PriorityFilter, StatusFilter, TaskFilter,
};
pub use projection::series::{completion_series, CompletionBucket, Period, Timeframe};
pub use projection::stats::{
    counts_by_priority, counts_by_status, dashboard_stats, DashboardStats, PriorityCounts,
    StatusCounts,
};
pub use service::task_store::{PersistenceState, StoreError, StoreResult, TaskStore};
pub use storage::{
    KeyValueStore, LoadError, MemoryKeyValueStore, OutageSwitch, SqliteKeyValueStore,
    StorageError, TaskStorage,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
