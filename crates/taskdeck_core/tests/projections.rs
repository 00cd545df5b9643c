use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use taskdeck_core::{
    completion_series, counts_by_priority, counts_by_status, dashboard_stats, filter_tasks,
    recent_tasks, tasks_on_date, Period, Priority, PriorityFilter, StatusFilter, Task, TaskFilter,
    TaskInput, TaskStatus, Timeframe,
};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(id: &str, input: TaskInput, created: DateTime<Utc>) -> Task {
    Task::create_with_id(id, input, created).unwrap()
}

/// Completed task whose last update happened at `done`.
fn completed(id: &str, done: DateTime<Utc>) -> Task {
    let mut task = task(
        id,
        TaskInput::new(id).with_status(TaskStatus::Completed),
        done - Duration::days(30),
    );
    task.updated_at = done;
    task
}

fn mixed_tasks() -> Vec<Task> {
    let base = at(2024, 3, 1, 9);
    vec![
        task(
            "a",
            TaskInput::new("Alpha").with_priority(Priority::High),
            base,
        ),
        task(
            "b",
            TaskInput::new("Beta")
                .with_priority(Priority::Low)
                .with_status(TaskStatus::Completed),
            base + Duration::hours(1),
        ),
        task(
            "c",
            TaskInput::new("Gamma")
                .with_priority(Priority::High)
                .with_status(TaskStatus::InProgress),
            base + Duration::hours(2),
        ),
        task(
            "d",
            TaskInput::new("Delta").with_status(TaskStatus::Completed),
            base + Duration::hours(3),
        ),
        task("e", TaskInput::new("Epsilon"), base + Duration::hours(4)),
    ]
}

fn ids(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|task| task.id.clone()).collect()
}

#[test]
fn filter_all_returns_everything_in_collection_order() {
    let tasks = mixed_tasks();
    let all = filter_tasks(&tasks, &TaskFilter::default());
    assert_eq!(ids(&all), vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn filter_requires_both_dimensions_to_match() {
    let tasks = mixed_tasks();

    let high = TaskFilter::new(StatusFilter::All, PriorityFilter::Only(Priority::High));
    assert_eq!(ids(&filter_tasks(&tasks, &high)), vec!["a", "c"]);

    let completed = TaskFilter::new(
        StatusFilter::Only(TaskStatus::Completed),
        PriorityFilter::All,
    );
    assert_eq!(ids(&filter_tasks(&tasks, &completed)), vec!["b", "d"]);

    let completed_high = TaskFilter::new(
        StatusFilter::Only(TaskStatus::Completed),
        PriorityFilter::Only(Priority::High),
    );
    assert!(filter_tasks(&tasks, &completed_high).is_empty());
}

#[test]
fn filter_on_empty_collection_is_empty() {
    assert!(filter_tasks(&[], &TaskFilter::default()).is_empty());
}

#[test]
fn counts_sum_to_total_and_agree_with_filters() {
    let tasks = mixed_tasks();
    let by_status = counts_by_status(&tasks);
    let by_priority = counts_by_priority(&tasks);

    assert_eq!(by_status.total(), tasks.len());
    assert_eq!(by_priority.total(), tasks.len());

    for status in TaskStatus::ALL {
        let filter = TaskFilter::new(StatusFilter::Only(status), PriorityFilter::All);
        assert_eq!(by_status.get(status), filter_tasks(&tasks, &filter).len());
    }
    for priority in Priority::ALL {
        let filter = TaskFilter::new(StatusFilter::All, PriorityFilter::Only(priority));
        assert_eq!(by_priority.get(priority), filter_tasks(&tasks, &filter).len());
    }
}

#[test]
fn counts_on_empty_collection_keep_every_bucket() {
    let by_status = counts_by_status(&[]);
    assert_eq!(
        by_status.entries(),
        [
            (TaskStatus::Completed, 0),
            (TaskStatus::Pending, 0),
            (TaskStatus::InProgress, 0),
        ]
    );
    let by_priority = counts_by_priority(&[]);
    assert_eq!(
        by_priority.entries(),
        [(Priority::High, 0), (Priority::Medium, 0), (Priority::Low, 0)]
    );
}

#[test]
fn dashboard_stats_match_status_counts() {
    let stats = dashboard_stats(&mixed_tasks());
    assert_eq!(stats.total, 5);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.in_progress, 1);
}

#[test]
fn recent_tasks_are_newest_first_and_limited() {
    let mut tasks = mixed_tasks();
    tasks.push(task("f", TaskInput::new("Zeta"), at(2024, 3, 2, 9)));

    let recent = recent_tasks(&tasks, 5);
    assert_eq!(ids(&recent), vec!["f", "e", "d", "c", "b"]);
    assert!(recent_tasks(&tasks, 0).is_empty());
    assert_eq!(recent_tasks(&tasks[..2], 5).len(), 2);
}

#[test]
fn recent_tasks_ties_keep_collection_order() {
    let same = at(2024, 3, 1, 9);
    let tasks = vec![
        task("first", TaskInput::new("First"), same),
        task("second", TaskInput::new("Second"), same),
        task("third", TaskInput::new("Third"), same),
    ];

    assert_eq!(ids(&recent_tasks(&tasks, 5)), vec!["first", "second", "third"]);
}

#[test]
fn tasks_on_date_matches_due_date_exactly() {
    let created = at(2024, 3, 1, 9);
    let tasks = vec![
        task("x", TaskInput::new("X").with_due_date(date(2024, 3, 10)), created),
        task("y", TaskInput::new("Y").with_due_date(date(2024, 3, 11)), created),
        task("z", TaskInput::new("Z"), created),
        task("w", TaskInput::new("W").with_due_date(date(2024, 3, 10)), created),
    ];

    assert_eq!(ids(&tasks_on_date(&tasks, date(2024, 3, 10))), vec!["x", "w"]);
    assert_eq!(ids(&tasks_on_date(&tasks, date(2024, 3, 11))), vec!["y"]);
    assert!(tasks_on_date(&tasks, date(2024, 3, 12)).is_empty());
}

#[test]
fn series_have_fixed_lengths_for_each_timeframe() {
    let now = at(2024, 3, 14, 12);
    for (timeframe, expected) in [
        (Timeframe::Weekly, 7),
        (Timeframe::Monthly, 12),
        (Timeframe::Yearly, 5),
    ] {
        let series = completion_series(&[], timeframe, &now);
        assert_eq!(series.len(), expected, "{timeframe}");
        assert!(series.iter().all(|bucket| bucket.count == 0));
    }
}

#[test]
fn weekly_series_counts_completed_tasks_per_day() {
    let now = at(2024, 3, 14, 12);
    let mut pending = task("p", TaskInput::new("Pending"), at(2024, 3, 14, 8));
    pending.updated_at = at(2024, 3, 14, 9);
    let tasks = vec![
        completed("today-1", at(2024, 3, 14, 8)),
        completed("today-2", at(2024, 3, 14, 10)),
        completed("monday", at(2024, 3, 11, 15)),
        completed("too-old", at(2024, 3, 7, 15)),
        pending,
    ];

    let series = completion_series(&tasks, Timeframe::Weekly, &now);

    let labels: Vec<&str> = series.iter().map(|bucket| bucket.label.as_str()).collect();
    assert_eq!(labels, vec!["Fri", "Sat", "Sun", "Mon", "Tue", "Wed", "Thu"]);
    let counts: Vec<usize> = series.iter().map(|bucket| bucket.count).collect();
    assert_eq!(counts, vec![0, 0, 0, 1, 0, 0, 2]);
    assert_eq!(series[0].period, Period::Day { date: date(2024, 3, 8) });
    assert_eq!(series[6].period, Period::Day { date: date(2024, 3, 14) });
}

#[test]
fn monthly_series_spans_year_boundary() {
    let now = at(2024, 2, 10, 12);
    let tasks = vec![
        completed("feb", at(2024, 2, 1, 8)),
        completed("dec", at(2023, 12, 31, 8)),
        completed("march-last-year", at(2023, 3, 5, 8)),
        completed("feb-last-year", at(2023, 2, 20, 8)),
    ];

    let series = completion_series(&tasks, Timeframe::Monthly, &now);

    assert_eq!(series[0].period, Period::Month { year: 2023, month: 3 });
    assert_eq!(series[0].label, "Mar");
    assert_eq!(series[0].count, 1);
    assert_eq!(series[9].period, Period::Month { year: 2023, month: 12 });
    assert_eq!(series[9].count, 1);
    assert_eq!(series[11].period, Period::Month { year: 2024, month: 2 });
    assert_eq!(series[11].label, "Feb");
    assert_eq!(series[11].count, 1);
    assert_eq!(series.iter().map(|bucket| bucket.count).sum::<usize>(), 3);
}

#[test]
fn yearly_series_labels_are_years() {
    let now = at(2024, 6, 1, 12);
    let tasks = vec![
        completed("2020", at(2020, 1, 1, 8)),
        completed("2019", at(2019, 12, 31, 8)),
        completed("2024", at(2024, 5, 1, 8)),
    ];

    let series = completion_series(&tasks, Timeframe::Yearly, &now);

    let labels: Vec<&str> = series.iter().map(|bucket| bucket.label.as_str()).collect();
    assert_eq!(labels, vec!["2020", "2021", "2022", "2023", "2024"]);
    let counts: Vec<usize> = series.iter().map(|bucket| bucket.count).collect();
    assert_eq!(counts, vec![1, 0, 0, 0, 1]);
}

#[test]
fn series_buckets_by_local_date_of_now() {
    let late_evening_utc = completed("late", at(2024, 3, 14, 23));
    let tasks = vec![late_evening_utc];

    let utc_now = at(2024, 3, 15, 8);
    let utc_series = completion_series(&tasks, Timeframe::Weekly, &utc_now);
    assert_eq!(utc_series[5].count, 1);
    assert_eq!(utc_series[6].count, 0);

    let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
    let local_now = utc_now.with_timezone(&plus_two);
    let local_series = completion_series(&tasks, Timeframe::Weekly, &local_now);
    assert_eq!(local_series[5].count, 0);
    assert_eq!(local_series[6].count, 1);
}
