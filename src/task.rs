//! Task data structure and related functionality.
//!
//! A `Task` is the leaf of the todo hierarchy: a description plus the
//! status, priority, due date, progress, estimate and tags that go with it.

use std::fmt;

use crate::error::{Result, TodoError};
use crate::fields::*;

/// Everything after this sequence in an assigned description is discarded.
pub const DESCRIPTION_DELIMITER: &str = "##";

/// A single unit of work.
///
/// Equality compares description, priority rank, status and due date.
#[derive(Debug, Clone)]
pub struct Task {
    description: String,
    status: Status,
    priority: Priority,
    due_date: Option<DueDate>,
    progress: u8,
    estimated_time_to_complete: u32,
    tags: Vec<Tag>,
}

impl Task {
    /// Create a task with default status, priority 4, no due date and no tags.
    pub fn new(description: &str) -> Result<Self> {
        Ok(Task {
            description: parse_description(description)?,
            status: Status::default(),
            priority: Priority::default(),
            due_date: None,
            progress: 0,
            estimated_time_to_complete: 0,
            tags: Vec::new(),
        })
    }

    /// Get the task description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replace the description. The new text is cut at the first `##`.
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.description = parse_description(description)?;
        Ok(())
    }

    /// Get the current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Set the status.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Get the priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Set the priority.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Get the due date, if any.
    pub fn due_date(&self) -> Option<&DueDate> {
        self.due_date.as_ref()
    }

    /// Mutable access to the due date, for postponing in place.
    pub fn due_date_mut(&mut self) -> Option<&mut DueDate> {
        self.due_date.as_mut()
    }

    /// Set or clear the due date.
    pub fn set_due_date(&mut self, due_date: Option<DueDate>) {
        self.due_date = due_date;
    }

    /// Percentage complete, 0..=100.
    pub fn progress(&self) -> u32 {
        u32::from(self.progress)
    }

    /// Set progress; values outside 0..=100 are rejected.
    pub fn set_progress(&mut self, progress: i32) -> Result<()> {
        if !(0..=100).contains(&progress) {
            return Err(TodoError::InvalidProgress(progress));
        }
        self.progress = progress as u8;
        Ok(())
    }

    /// Estimated hours left.
    pub fn estimated_time_to_complete(&self) -> u32 {
        self.estimated_time_to_complete
    }

    /// Set the estimate in hours; negative values are rejected.
    pub fn set_estimated_time_to_complete(&mut self, hours: i32) -> Result<()> {
        if hours < 0 {
            return Err(TodoError::NegativeEstimate(hours));
        }
        self.estimated_time_to_complete = hours as u32;
        Ok(())
    }

    /// Tags in the order they were first added.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Add a tag by name; adding a name that is already present does nothing.
    pub fn add_tag(&mut self, name: &str) -> Result<()> {
        self.add_tag_value(Tag::new(name)?);
        Ok(())
    }

    /// Add an already-built tag.
    pub fn add_tag_value(&mut self, tag: Tag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Remove a tag by name; absent names are ignored.
    pub fn remove_tag(&mut self, name: &str) -> Result<()> {
        let tag = Tag::new(name)?;
        self.tags.retain(|t| *t != tag);
        Ok(())
    }

    /// Whether the task carries this tag.
    pub fn contains_tag(&self, name: &str) -> Result<bool> {
        let tag = Tag::new(name)?;
        Ok(self.tags.contains(&tag))
    }

    /// A task is complete when its status is DONE.
    pub fn is_completed(&self) -> bool {
        self.status == Status::Done
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
            && self.priority == other.priority
            && self.status == other.status
            && self.due_date == other.due_date
    }
}

impl Eq for Task {}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let due = self.due_date.map(|d| d.to_string()).unwrap_or_default();
        let tags = if self.tags.is_empty() {
            " ".to_string()
        } else {
            self.tags.iter().map(Tag::to_string).collect::<Vec<_>>().join(", ")
        };
        write!(
            f,
            "\n{{\n\tDescription: {}\n\tDue date: {}\n\tStatus: {}\n\tPriority: {}\n\tTags: {}\n}}",
            self.description, due, self.status, self.priority, tags
        )
    }
}

/// Keep the text before the first delimiter; reject an empty result.
fn parse_description(raw: &str) -> Result<String> {
    let description = match raw.find(DESCRIPTION_DELIMITER) {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    if description.is_empty() {
        return Err(TodoError::EmptyDescription);
    }
    Ok(description.to_string())
}
