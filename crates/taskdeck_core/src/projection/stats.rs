//! Aggregate counts for the dashboard and analytics charts.

use crate::model::task::{Priority, Task, TaskStatus};
use serde::Serialize;

/// Per-status counts. Every bucket is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed
    }

    /// `(status, count)` pairs in chart order.
    pub fn entries(&self) -> [(TaskStatus, usize); 3] {
        TaskStatus::ALL.map(|status| (status, self.get(status)))
    }
}

/// Per-priority counts. Every bucket is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    pub fn entries(&self) -> [(Priority, usize); 3] {
        Priority::ALL.map(|priority| (priority, self.get(priority)))
    }
}

pub fn counts_by_status(tasks: &[Task]) -> StatusCounts {
    tasks
        .iter()
        .fold(StatusCounts::default(), |mut counts, task| {
            match task.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Completed => counts.completed += 1,
            }
            counts
        })
}

pub fn counts_by_priority(tasks: &[Task]) -> PriorityCounts {
    tasks
        .iter()
        .fold(PriorityCounts::default(), |mut counts, task| {
            match task.priority {
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
            counts
        })
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
}

pub fn dashboard_stats(tasks: &[Task]) -> DashboardStats {
    let counts = counts_by_status(tasks);
    DashboardStats {
        total: tasks.len(),
        completed: counts.completed,
        pending: counts.pending,
        in_progress: counts.in_progress,
    }
}
