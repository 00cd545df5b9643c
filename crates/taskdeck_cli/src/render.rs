//! Text and JSON rendering of core view models.

use serde_json::json;
use std::fmt::Write;
use taskdeck_core::{Outcome, PersistenceState, Task, ViewModel};

pub type RenderResult = Result<String, serde_json::Error>;

pub fn outcome(outcome: &Outcome, as_json: bool) -> RenderResult {
    if as_json {
        let unsaved = match &outcome.persistence {
            PersistenceState::Saved => None,
            PersistenceState::Unsaved { reason } => Some(reason.to_string()),
        };
        return serde_json::to_string_pretty(&json!({
            "task": outcome.task,
            "removed": outcome.removed,
            "unsaved": unsaved,
        }));
    }

    Ok(match &outcome.task {
        Some(task) => task_detail(task),
        None if outcome.removed => "deleted".to_string(),
        None => "nothing to delete".to_string(),
    })
}

pub fn task_list(view: &ViewModel, as_json: bool) -> RenderResult {
    if as_json {
        return serde_json::to_string_pretty(&view.tasks);
    }
    let filter = &view.navigation.filter;
    let mut out = format!(
        "{} (status={}, priority={})\n",
        view.page_title, filter.status, filter.priority
    );
    if view.tasks.is_empty() {
        out.push_str("No tasks found matching your filters.");
    } else {
        out.push_str(&task_lines(&view.tasks));
    }
    Ok(out)
}

pub fn dashboard(view: &ViewModel, as_json: bool) -> RenderResult {
    if as_json {
        return serde_json::to_string_pretty(&view.dashboard);
    }
    let stats = &view.dashboard.stats;
    let mut out = format!(
        "{}\ntotal={} completed={} pending={} in-progress={}\n\nRecent tasks\n",
        view.page_title, stats.total, stats.completed, stats.pending, stats.in_progress
    );
    if view.dashboard.recent.is_empty() {
        out.push_str("No tasks yet. Create your first task to get started!");
    } else {
        out.push_str(&task_lines(&view.dashboard.recent));
    }
    Ok(out)
}

pub fn calendar(view: &ViewModel, as_json: bool) -> RenderResult {
    if as_json {
        return serde_json::to_string_pretty(&view.calendar);
    }
    let grid = &view.calendar;
    let mut out = format!("{}\n Sun  Mon  Tue  Wed  Thu  Fri  Sat\n", grid.title);
    for week in grid.cells.chunks(7) {
        for cell in week {
            // '.' marks filler days from adjacent months.
            let marker = match (cell.in_month, cell.selected, cell.has_tasks()) {
                (false, _, _) => '.',
                (true, true, _) => '>',
                (true, false, true) => '*',
                (true, false, false) => ' ',
            };
            let _ = write!(out, " {marker}{:>3}", cell.day);
        }
        out.push('\n');
    }
    for cell in grid.cells.iter().filter(|cell| cell.has_tasks()) {
        let titles: Vec<&str> = cell.previews.iter().map(|p| p.title.as_str()).collect();
        let _ = write!(out, "\n{}: {}", cell.date, titles.join(", "));
        if cell.overflow > 0 {
            let _ = write!(out, " +{} more", cell.overflow);
        }
    }
    if let Some(day) = &view.selected_day {
        let _ = write!(out, "\n\nTasks for {}\n", day.date.format("%x"));
        out.push_str(&day_tasks(&day.tasks));
    }
    Ok(out)
}

pub fn day(view: &ViewModel, as_json: bool) -> RenderResult {
    if as_json {
        return serde_json::to_string_pretty(&view.selected_day);
    }
    Ok(match &view.selected_day {
        Some(day) => format!(
            "Tasks for {}\n{}",
            day.date.format("%x"),
            day_tasks(&day.tasks)
        ),
        None => "No date selected.".to_string(),
    })
}

pub fn analytics(view: &ViewModel, as_json: bool) -> RenderResult {
    if as_json {
        return serde_json::to_string_pretty(&view.analytics);
    }
    let analytics = &view.analytics;
    let mut out = format!("{}\n\nBy status\n", view.page_title);
    for (status, count) in analytics.status.entries() {
        let _ = writeln!(out, "  {:<12} {}", status.as_str(), count);
    }
    out.push_str("\nBy priority\n");
    for (priority, count) in analytics.priority.entries() {
        let _ = writeln!(out, "  {:<12} {}", priority.as_str(), count);
    }
    let _ = writeln!(out, "\nCompleted tasks ({})", analytics.timeframe);
    for bucket in &analytics.completion {
        let _ = writeln!(
            out,
            "  {:<6} {:>3} {}",
            bucket.label,
            bucket.count,
            "#".repeat(bucket.count)
        );
    }
    Ok(out.trim_end().to_string())
}

fn day_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        "No tasks scheduled for this date.".to_string()
    } else {
        task_lines(tasks)
    }
}

fn task_lines(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(task_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn task_line(task: &Task) -> String {
    let check = if task.is_completed() { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{check} {} [{}] [{}]",
        task.title,
        task.priority,
        task.status.as_str().replace('-', " ")
    );
    if !task.category.is_empty() {
        let _ = write!(line, " [{}]", task.category);
    }
    if let Some(due) = task.due_date {
        let _ = write!(line, " Due: {}", due.format("%x"));
    }
    let _ = write!(line, "  ({})", task.id);
    line
}

fn task_detail(task: &Task) -> String {
    let mut out = task_line(task);
    if !task.description.is_empty() {
        let _ = write!(out, "\n    {}", task.description);
    }
    let _ = write!(
        out,
        "\n    created {}  updated {}",
        task.created_at.to_rfc3339(),
        task.updated_at.to_rfc3339()
    );
    out
}
