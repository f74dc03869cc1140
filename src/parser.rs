//! Lenient reader for the persisted task list.
//!
//! The store is a JSON array of task objects. Reading is best effort: an element
//! that is incomplete or malformed is dropped on its own and the rest of the
//! array still loads. Nothing in here returns an error to the caller.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, TodoError};
use crate::fields::*;
use crate::task::Task;

/// Keys an element must carry to be considered at all.
pub const REQUIRED_KEYS: [&str; 5] = ["description", "tags", "due-date", "status", "priority"];

#[derive(Debug, Deserialize)]
struct TagRecord {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PriorityRecord {
    important: bool,
    urgent: bool,
}

#[derive(Debug, Deserialize)]
struct DueDateRecord {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

/// Parse a JSON array of task objects into every task that can be recovered.
pub fn parse(input: &str) -> Vec<Task> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    let elements = match serde_json::from_str::<Value>(input) {
        Ok(Value::Array(elements)) => elements,
        Ok(_) => {
            warn!("task data is not a JSON array; nothing loaded");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "task data is not valid JSON; nothing loaded");
            return Vec::new();
        }
    };

    let mut tasks = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let Some(object) = element.as_object() else {
            debug!(index, "skipping element that is not an object");
            continue;
        };
        if let Some(key) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
            debug!(index, key, "skipping task without required key");
            continue;
        }
        match parse_task(object) {
            Ok(task) => tasks.push(task),
            Err(e) => debug!(index, error = %e, "skipping malformed task"),
        }
    }
    debug!(loaded = tasks.len(), total = elements.len(), "parsed task list");
    tasks
}

fn parse_task(object: &Map<String, Value>) -> Result<Task> {
    let mut task = Task::new(required_str(&object["description"], "description")?)?;
    task.set_priority(parse_priority(&object["priority"])?);
    for tag in parse_tags(&object["tags"])? {
        task.add_tag_value(tag);
    }
    task.set_due_date(parse_due_date(&object["due-date"]));
    if let Some(status) = parse_status(&object["status"])? {
        task.set_status(status);
    }
    Ok(task)
}

fn required_str<'a>(value: &'a Value, field: &'static str) -> Result<&'a str> {
    match value {
        Value::Null => Err(TodoError::NullArgument(field)),
        Value::String(s) => Ok(s),
        _ => Err(TodoError::Malformed(format!("{field} must be a string"))),
    }
}

/// Flags land on a rank-4 priority; the rank is not derived from them.
fn parse_priority(value: &Value) -> Result<Priority> {
    if value.is_null() {
        return Err(TodoError::NullArgument("priority"));
    }
    let record = PriorityRecord::deserialize(value)
        .map_err(|e| TodoError::Malformed(format!("priority: {e}")))?;
    let mut priority = Priority::default();
    priority.set_important(record.important);
    priority.set_urgent(record.urgent);
    Ok(priority)
}

fn parse_tags(value: &Value) -> Result<Vec<Tag>> {
    if value.is_null() {
        return Err(TodoError::NullArgument("tags"));
    }
    let records = Vec::<TagRecord>::deserialize(value)
        .map_err(|e| TodoError::Malformed(format!("tags: {e}")))?;
    records.into_iter().map(|r| Tag::new(r.name)).collect()
}

/// `None` for `null` or anything that does not name a real minute.
fn parse_due_date(value: &Value) -> Option<DueDate> {
    let record = DueDateRecord::deserialize(value).ok()?;
    DueDate::from_parts(record.year, record.month, record.day, record.hour, record.minute)
}

/// Unknown names yield `None` so the task keeps its default status.
fn parse_status(value: &Value) -> Result<Option<Status>> {
    let name = required_str(value, "status")?;
    let status = Status::from_name(name);
    if status.is_none() {
        debug!(status = name, "unknown status; keeping default");
    }
    Ok(status)
}
