//! File-backed task store and display helpers.
//!
//! The store is a load-all/save-all snapshot of the flat task list. Loading goes
//! through the lenient parser so a damaged file never stops the program; saving
//! writes the whole list back atomically.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::Result;
use crate::fields::*;
use crate::jsonifier::serialize_pretty;
use crate::parser::parse;
use crate::project::Project;
use crate::task::Task;
use crate::todo::Todo;

/// In-memory snapshot of the task store.
#[derive(Debug, Default)]
pub struct Database {
    pub tasks: Vec<Task>,
}

impl Database {
    /// Load from a JSON file. A missing or unreadable file gives an empty database.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no task store yet, starting empty");
            return Database::default();
        }
        match fs::read_to_string(path) {
            Ok(buf) => Database { tasks: parse(&buf) },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read task store, starting empty");
                Database::default()
            }
        }
    }

    /// Save to a JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(serialize_pretty(&self.tasks).as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        debug!(path = %path.display(), tasks = self.tasks.len(), "saved task store");
        Ok(())
    }

    pub fn find(&self, description: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.description() == description)
    }

    pub fn find_mut(&mut self, description: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.description() == description)
    }

    /// Append a task unless an equal one is already stored.
    pub fn push(&mut self, task: Task) -> bool {
        if self.tasks.contains(&task) {
            return false;
        }
        self.tasks.push(task);
        true
    }

    /// Remove the first task with this description.
    pub fn remove(&mut self, description: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.description() == description)?;
        Some(self.tasks.remove(idx))
    }

    /// Group the flat list under one project. Equal tasks collapse.
    pub fn as_project(&self, name: &str) -> Result<Project> {
        let mut project = Project::new(name)?;
        for task in &self.tasks {
            project.add(Todo::from(task.clone()));
        }
        Ok(project)
    }

    /// Distinct tag names with the number of tasks carrying each.
    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for t in &self.tasks {
            for tag in t.tags() {
                *counts.entry(tag.name().to_string()).or_default() += 1;
            }
        }
        counts
    }
}

/// Short due-date column: "today", "tomorrow", "in 3d", "2d late", "-".
pub fn format_due_relative(due: Option<&DueDate>, now: NaiveDateTime) -> String {
    match due {
        None => "-".into(),
        Some(d) if d.is_due_today(now) => "today".into(),
        Some(d) if d.is_due_tomorrow(now) => "tomorrow".into(),
        Some(d) => {
            let days = (d.datetime().date() - now.date()).num_days();
            if d.is_overdue(now) {
                format!("{}d late", -days)
            } else {
                format!("in {}d", days)
            }
        }
    }
}

/// Print todos as a table, in the order given.
pub fn print_table<'a>(todos: impl IntoIterator<Item = &'a Todo>) {
    println!(
        "{:<4} {:<12} {:<19} {:<10} {:>5} {:>4}  {}",
        "Pri", "Status", "Flags", "Due", "Done", "Est", "Description [tags]"
    );
    let now = Local::now().naive_local();
    for todo in todos {
        match todo {
            Todo::Task(task) => {
                let t = task.borrow();
                let tags = if t.tags().is_empty() {
                    String::new()
                } else {
                    let names: Vec<&str> = t.tags().iter().map(Tag::name).collect();
                    format!(" [{}]", names.join(","))
                };
                println!(
                    "{:<4} {:<12} {:<19} {:<10} {:>4}% {:>4}  {}{}",
                    t.priority().rank(),
                    t.status().label(),
                    t.priority().to_string(),
                    format_due_relative(t.due_date(), now),
                    t.progress(),
                    t.estimated_time_to_complete(),
                    ellipsize(t.description(), 48),
                    tags
                );
            }
            Todo::Project(project) => {
                let p = project.borrow();
                println!(
                    "{:<4} {:<12} {:<19} {:<10} {:>4}% {:>4}  {}/",
                    p.priority().rank(),
                    "PROJECT",
                    p.priority().to_string(),
                    "-",
                    p.progress(),
                    p.estimated_time_to_complete(),
                    ellipsize(p.description(), 48)
                );
            }
        }
    }
}

/// Shorten to at most `max` characters, ending in `…` when cut.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().nth(max).is_none() {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
