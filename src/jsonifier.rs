//! Writer for the persisted task list; the inverse of [`crate::parser`].

use serde_json::{json, Value};

use crate::fields::*;
use crate::task::Task;

pub fn tag_to_json(tag: &Tag) -> Value {
    json!({ "name": tag.name() })
}

pub fn priority_to_json(priority: &Priority) -> Value {
    json!({
        "important": priority.is_important(),
        "urgent": priority.is_urgent(),
    })
}

/// Calendar fields with a zero-based month.
pub fn due_date_to_json(due_date: &DueDate) -> Value {
    json!({
        "year": due_date.year(),
        "month": due_date.month0(),
        "day": due_date.day(),
        "hour": due_date.hour(),
        "minute": due_date.minute(),
    })
}

pub fn task_to_json(task: &Task) -> Value {
    json!({
        "description": task.description(),
        "tags": task.tags().iter().map(tag_to_json).collect::<Vec<_>>(),
        "due-date": task.due_date().map(due_date_to_json).unwrap_or(Value::Null),
        "priority": priority_to_json(&task.priority()),
        "status": task.status().name(),
    })
}

pub fn task_list_to_json(tasks: &[Task]) -> Value {
    Value::Array(tasks.iter().map(task_to_json).collect())
}

/// Compact JSON array text.
pub fn serialize(tasks: &[Task]) -> String {
    task_list_to_json(tasks).to_string()
}

/// Indented JSON array text, for stores people may open by hand.
pub fn serialize_pretty(tasks: &[Task]) -> String {
    format!("{:#}", task_list_to_json(tasks))
}
