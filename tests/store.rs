use tempfile::tempdir;
use todobar::{Database, DueDate, Priority, Status, Task};

fn sample_tasks() -> Vec<Task> {
    let mut report = Task::new("write report").unwrap();
    report.add_tag("work").unwrap();
    report.set_status(Status::InProgress);
    report.set_due_date(DueDate::from_parts(2023, 0, 31, 18, 30));
    let mut priority = Priority::default();
    priority.set_important(true);
    report.set_priority(priority);

    let mut groceries = Task::new("groceries").unwrap();
    groceries.add_tag("home").unwrap();
    groceries.add_tag("errands").unwrap();

    vec![report, groceries]
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("json").join("tasks.json");

    let db = Database { tasks: sample_tasks() };
    db.save(&path).unwrap();
    assert!(!path.with_extension("json.tmp").exists());

    let loaded = Database::load(&path);
    assert_eq!(loaded.tasks, db.tasks);
    assert_eq!(loaded.tasks[1].tags().len(), 2);
    assert!(loaded.tasks[0].priority().is_important());
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempdir().unwrap();
    let loaded = Database::load(&dir.path().join("nope.json"));
    assert!(loaded.tasks.is_empty());
}

#[test]
fn partially_valid_file_keeps_good_tasks() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(
        &path,
        r#"[
            {"description": "kept", "tags": [], "due-date": null,
             "priority": {"important": false, "urgent": true}, "status": "DONE"},
            {"description": "no status", "tags": [], "due-date": null, "priority": {}},
            42
        ]"#,
    )
    .unwrap();

    let loaded = Database::load(&path);
    assert_eq!(loaded.tasks.len(), 1);
    assert_eq!(loaded.tasks[0].description(), "kept");
    assert!(loaded.tasks[0].is_completed());
    assert!(loaded.tasks[0].priority().is_urgent());
}

#[test]
fn overwrites_existing_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    Database { tasks: sample_tasks() }.save(&path).unwrap();
    Database { tasks: vec![Task::new("only").unwrap()] }.save(&path).unwrap();

    let loaded = Database::load(&path);
    assert_eq!(loaded.tasks.len(), 1);
    assert_eq!(loaded.tasks[0].description(), "only");
}
