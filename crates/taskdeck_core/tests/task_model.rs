use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use taskdeck_core::{Priority, Task, TaskInput, TaskPatch, TaskStatus, TaskValidationError};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn create_applies_defaults_and_trims_input() {
    let input = TaskInput {
        title: "  Write report  ".to_string(),
        description: " draft ".to_string(),
        category: " work ".to_string(),
        ..TaskInput::default()
    };
    let task = Task::create(input, at(9)).unwrap();

    assert!(!task.id.is_empty());
    assert_eq!(task.title, "Write report");
    assert_eq!(task.description, "draft");
    assert_eq!(task.category, "work");
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.due_date, None);
    assert_eq!(task.created_at, task.updated_at);
}

#[test]
fn create_rejects_blank_title() {
    let err = Task::create(TaskInput::new(" \t\n"), at(9)).unwrap_err();
    assert_eq!(err, TaskValidationError::EmptyTitle);
}

#[test]
fn patched_keeps_identity_and_clamps_updated_at() {
    let task = Task::create_with_id("t-1", TaskInput::new("A"), at(10)).unwrap();

    let earlier = task.patched(TaskPatch::default(), at(8)).unwrap();
    assert_eq!(earlier.updated_at, at(10));
    assert_eq!(earlier.created_at, at(10));
    assert_eq!(earlier.id, "t-1");

    let patch = TaskPatch {
        title: Some("B".to_string()),
        due_date: Some(Some(date(2024, 3, 10))),
        ..TaskPatch::default()
    };
    let later = task.patched(patch, at(11)).unwrap();
    assert_eq!(later.title, "B");
    assert_eq!(later.due_date, Some(date(2024, 3, 10)));
    assert_eq!(later.updated_at, at(11));

    let cleared = later
        .patched(
            TaskPatch {
                due_date: Some(None),
                ..TaskPatch::default()
            },
            at(12),
        )
        .unwrap();
    assert_eq!(cleared.due_date, None);
}

#[test]
fn patched_rejects_blank_title_without_touching_original() {
    let task = Task::create_with_id("t-1", TaskInput::new("A"), at(10)).unwrap();
    let patch = TaskPatch {
        title: Some("   ".to_string()),
        ..TaskPatch::default()
    };

    assert_eq!(
        task.patched(patch, at(11)).unwrap_err(),
        TaskValidationError::EmptyTitle
    );
    assert_eq!(task.title, "A");
    assert_eq!(task.updated_at, at(10));
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let input = TaskInput::new("Ship")
        .with_priority(Priority::High)
        .with_status(TaskStatus::InProgress)
        .with_due_date(date(2024, 3, 10))
        .with_category("release");
    let task = Task::create_with_id("1709280000000", input, at(9)).unwrap();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], "1709280000000");
    assert_eq!(json["title"], "Ship");
    assert_eq!(json["description"], "");
    assert_eq!(json["priority"], "high");
    assert_eq!(json["status"], "in-progress");
    assert_eq!(json["dueDate"], "2024-03-10");
    assert_eq!(json["category"], "release");
    assert_eq!(json["createdAt"], "2024-03-01T09:00:00Z");
    assert_eq!(json["updatedAt"], "2024-03-01T09:00:00Z");

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialize_accepts_legacy_timestamp_due_date() {
    let value = serde_json::json!({
        "id": "1709280000000",
        "title": "Legacy",
        "description": "",
        "priority": "low",
        "status": "completed",
        "dueDate": "2024-03-10T00:00:00.000Z",
        "category": "",
        "createdAt": "2024-03-01T09:00:00.000Z",
        "updatedAt": "2024-03-02T09:00:00.000Z"
    });

    let task: Task = serde_json::from_value(value).unwrap();
    assert_eq!(task.due_date, Some(date(2024, 3, 10)));
    assert_eq!(task.status, TaskStatus::Completed);
}

#[test]
fn deserialize_fills_missing_optional_fields() {
    let value = serde_json::json!({
        "id": "x",
        "title": "Minimal",
        "dueDate": null,
        "createdAt": "2024-03-01T09:00:00Z",
        "updatedAt": "2024-03-01T09:00:00Z"
    });

    let task: Task = serde_json::from_value(value).unwrap();
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.description, "");
    assert_eq!(task.due_date, None);
}

#[test]
fn deserialize_rejects_invalid_records() {
    let unknown_status = serde_json::json!({
        "id": "x",
        "title": "Bad",
        "status": "blocked",
        "createdAt": "2024-03-01T09:00:00Z",
        "updatedAt": "2024-03-01T09:00:00Z"
    });
    assert!(serde_json::from_value::<Task>(unknown_status).is_err());

    let empty_title = serde_json::json!({
        "id": "x",
        "title": "  ",
        "createdAt": "2024-03-01T09:00:00Z",
        "updatedAt": "2024-03-01T09:00:00Z"
    });
    let err = serde_json::from_value::<Task>(empty_title).unwrap_err();
    assert!(err.to_string().contains("title must not be empty"), "unexpected error: {err}");

    let reversed = serde_json::json!({
        "id": "x",
        "title": "Time travel",
        "createdAt": "2024-03-02T09:00:00Z",
        "updatedAt": "2024-03-01T09:00:00Z"
    });
    let err = serde_json::from_value::<Task>(reversed).unwrap_err();
    assert!(err.to_string().contains("must be >= createdAt"), "unexpected error: {err}");
}

#[test]
fn into_patch_overwrites_every_field() {
    let task = Task::create_with_id(
        "t-1",
        TaskInput::new("Old")
            .with_due_date(date(2024, 1, 1))
            .with_description("old"),
        at(9),
    )
    .unwrap();

    let edited = task
        .patched(TaskInput::new("New").into_patch(), at(10))
        .unwrap();
    assert_eq!(edited.title, "New");
    assert_eq!(edited.description, "");
    assert_eq!(edited.due_date, None);
    assert_eq!(edited.created_at, at(9));
}
