//! Command implementations for the CLI interface.
//!
//! Each handler loads nothing itself: `main` hands it the database and the
//! path to save back to. Failures are reported on stderr with exit status 1.

use std::fmt::Display;
use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use todobar::db::{ellipsize, print_table};
use todobar::{Database, DueDate, Priority, Result, Status, Task, Todo, TodoError};

/// Name of the project the flat task list is grouped under.
const ALL_TASKS: &str = "All tasks";

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Description; anything after "##" is dropped.
        description: String,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Initial status.
        #[arg(long, value_enum, default_value_t = Status::Todo)]
        status: Status,
        /// Priority rank, 1 (highest) to 4.
        #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
        priority: i32,
        /// Mark as important without changing the rank.
        #[arg(long)]
        important: bool,
        /// Mark as urgent without changing the rank.
        #[arg(long)]
        urgent: bool,
        /// Due date: "today", "tomorrow" or YYYY-MM-DD, optionally followed by HH:MM.
        #[arg(long)]
        due: Option<String>,
        /// Percentage complete, 0-100.
        #[arg(long, allow_negative_numbers = true)]
        progress: Option<i32>,
        /// Estimated hours to complete.
        #[arg(long, allow_negative_numbers = true)]
        estimate: Option<i32>,
    },

    /// List tasks in priority order.
    List {
        /// Include tasks that are done.
        #[arg(long)]
        all: bool,
    },

    /// Show one task in full.
    Show {
        /// Task description.
        description: String,
    },

    /// Update fields of an existing task.
    Update {
        /// Task description.
        description: String,
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Percentage complete, 0-100.
        #[arg(long, allow_negative_numbers = true)]
        progress: Option<i32>,
        /// Estimated hours to complete.
        #[arg(long, allow_negative_numbers = true)]
        estimate: Option<i32>,
        /// Tags to add (comma-separated, repeatable).
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        /// Tags to remove (comma-separated, repeatable).
        #[arg(long = "rm-tag")]
        rm_tags: Vec<String>,
        /// New due date, same forms as `add --due`.
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
        /// Push the due date back one day.
        #[arg(long)]
        postpone_day: bool,
        /// Push the due date back one week.
        #[arg(long)]
        postpone_week: bool,
    },

    /// Mark a task done (status DONE, progress 100).
    Done {
        /// Task description.
        description: String,
    },

    /// Delete a task.
    Delete {
        /// Task description.
        description: String,
    },

    /// Show overall progress and remaining effort.
    Summary,

    /// List distinct tags and counts.
    Tags,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn exit_with(context: &str, e: impl Display) -> ! {
    eprintln!("{context}: {e}");
    std::process::exit(1);
}

fn save_or_exit(db: &Database, db_path: &Path) {
    if let Err(e) = db.save(db_path) {
        exit_with("Failed to save tasks", e);
    }
}

/// Split comma-separated tag arguments, trimming blanks.
pub fn split_tags(inputs: &[String]) -> Vec<String> {
    inputs
        .iter()
        .flat_map(|raw| raw.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse "today", "tomorrow" or "YYYY-MM-DD", each optionally followed by "HH:MM".
/// A date without a time is due at 23:59.
pub fn parse_due_input(s: &str) -> Option<DueDate> {
    let mut parts = s.split_whitespace();
    let day = parts.next()?.to_lowercase();
    let time = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let mut due = DueDate::new();
    match day.as_str() {
        "today" => {}
        "tomorrow" => due.postpone_one_day(),
        other => due.set_due_date(NaiveDate::parse_from_str(other, "%Y-%m-%d").ok()?),
    }
    if let Some(time) = time {
        due.set_due_time(NaiveTime::parse_from_str(time, "%H:%M").ok()?);
    }
    Some(due)
}

fn due_or_malformed(s: &str) -> Result<DueDate> {
    parse_due_input(s).ok_or_else(|| TodoError::Malformed(format!("due date '{s}'")))
}

#[allow(clippy::too_many_arguments)]
fn build_task(
    description: &str,
    tags: &[String],
    status: Status,
    priority: i32,
    important: bool,
    urgent: bool,
    due: Option<&str>,
    progress: Option<i32>,
    estimate: Option<i32>,
) -> Result<Task> {
    let mut task = Task::new(description)?;
    let mut priority = Priority::new(priority)?;
    if important {
        priority.set_important(true);
    }
    if urgent {
        priority.set_urgent(true);
    }
    task.set_priority(priority);
    task.set_status(status);
    for tag in split_tags(tags) {
        task.add_tag(&tag)?;
    }
    if let Some(due) = due {
        task.set_due_date(Some(due_or_malformed(due)?));
    }
    if let Some(progress) = progress {
        task.set_progress(progress)?;
    }
    if let Some(estimate) = estimate {
        task.set_estimated_time_to_complete(estimate)?;
    }
    Ok(task)
}

/// Add a new task to the database.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &mut Database,
    db_path: &Path,
    description: String,
    tags: Vec<String>,
    status: Status,
    priority: i32,
    important: bool,
    urgent: bool,
    due: Option<String>,
    progress: Option<i32>,
    estimate: Option<i32>,
) {
    let task = build_task(
        &description,
        &tags,
        status,
        priority,
        important,
        urgent,
        due.as_deref(),
        progress,
        estimate,
    )
    .unwrap_or_else(|e| exit_with("Cannot add task", e));

    let name = task.description().to_string();
    if !db.push(task) {
        exit_with("Cannot add task", format!("'{name}' already exists"));
    }
    save_or_exit(db, db_path);
    println!("Added task '{name}'");
}

fn is_done(todo: &Todo) -> bool {
    match todo {
        Todo::Task(task) => task.borrow().is_completed(),
        Todo::Project(project) => project.borrow().is_completed(),
    }
}

/// List tasks grouped under one project, in priority order.
pub fn cmd_list(db: &Database, all: bool) {
    let project = db
        .as_project(ALL_TASKS)
        .unwrap_or_else(|e| exit_with("Cannot group tasks", e));
    print_table(project.iter().filter(|todo| all || !is_done(todo)));
}

/// View detailed information about a specific task.
pub fn cmd_show(db: &Database, description: String) {
    let Some(task) = db.find(&description) else {
        exit_with("Cannot show task", format!("no task named '{description}'"));
    };
    println!("{task}");
    println!("Progress: {}%", task.progress());
    println!("Estimated hours: {}", task.estimated_time_to_complete());
}

#[allow(clippy::too_many_arguments)]
fn apply_update(
    task: &mut Task,
    status: Option<Status>,
    progress: Option<i32>,
    estimate: Option<i32>,
    add_tags: &[String],
    rm_tags: &[String],
    due: Option<&str>,
    clear_due: bool,
    postpone_day: bool,
    postpone_week: bool,
) -> Result<()> {
    // Validate every input before touching the task.
    let due = due.map(due_or_malformed).transpose()?;
    if let Some(p) = progress {
        if !(0..=100).contains(&p) {
            return Err(TodoError::InvalidProgress(p));
        }
    }
    if let Some(h) = estimate {
        if h < 0 {
            return Err(TodoError::NegativeEstimate(h));
        }
    }
    let keeps_due = !clear_due && (due.is_some() || task.due_date().is_some());
    if (postpone_day || postpone_week) && !keeps_due {
        return Err(TodoError::NoDueDate);
    }
    let add_tags = split_tags(add_tags);
    let rm_tags = split_tags(rm_tags);

    if let Some(status) = status {
        task.set_status(status);
    }
    if let Some(p) = progress {
        task.set_progress(p)?;
    }
    if let Some(h) = estimate {
        task.set_estimated_time_to_complete(h)?;
    }
    for tag in &add_tags {
        task.add_tag(tag)?;
    }
    for tag in &rm_tags {
        task.remove_tag(tag)?;
    }
    if clear_due {
        task.set_due_date(None);
    } else if due.is_some() {
        task.set_due_date(due);
    }
    if let Some(d) = task.due_date_mut() {
        if postpone_day {
            d.postpone_one_day();
        }
        if postpone_week {
            d.postpone_one_week();
        }
    }
    Ok(())
}

/// Update fields of an existing task.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    db: &mut Database,
    db_path: &Path,
    description: String,
    status: Option<Status>,
    progress: Option<i32>,
    estimate: Option<i32>,
    add_tags: Vec<String>,
    rm_tags: Vec<String>,
    due: Option<String>,
    clear_due: bool,
    postpone_day: bool,
    postpone_week: bool,
) {
    let Some(task) = db.find_mut(&description) else {
        exit_with("Cannot update task", format!("no task named '{description}'"));
    };
    if let Err(e) = apply_update(
        task,
        status,
        progress,
        estimate,
        &add_tags,
        &rm_tags,
        due.as_deref(),
        clear_due,
        postpone_day,
        postpone_week,
    ) {
        exit_with("Cannot update task", e);
    }
    save_or_exit(db, db_path);
    println!("Updated task '{description}'");
}

/// Mark a task as done.
pub fn cmd_done(db: &mut Database, db_path: &Path, description: String) {
    let Some(task) = db.find_mut(&description) else {
        exit_with("Cannot complete task", format!("no task named '{description}'"));
    };
    task.set_status(Status::Done);
    if let Err(e) = task.set_progress(100) {
        exit_with("Cannot complete task", e);
    }
    save_or_exit(db, db_path);
    println!("Completed task '{description}'");
}

/// Delete a task by description.
pub fn cmd_delete(db: &mut Database, db_path: &Path, description: String) {
    if db.remove(&description).is_none() {
        exit_with("Cannot delete task", format!("no task named '{description}'"));
    }
    save_or_exit(db, db_path);
    println!("Deleted task '{description}'");
}

fn count_overdue(db: &Database, now: NaiveDateTime) -> usize {
    db.tasks
        .iter()
        .filter(|t| !t.is_completed())
        .filter_map(Task::due_date)
        .filter(|d| d.is_overdue(now))
        .count()
}

/// Print aggregate progress for the whole list.
pub fn cmd_summary(db: &Database) {
    let project = db
        .as_project(ALL_TASKS)
        .unwrap_or_else(|e| exit_with("Cannot group tasks", e));
    let now = Local::now().naive_local();
    let due_this_week = db
        .tasks
        .iter()
        .filter(|t| !t.is_completed())
        .filter_map(Task::due_date)
        .filter(|d| d.is_due_within(7, now))
        .count();

    println!("Tasks:            {}", project.number_of_tasks());
    println!("Progress:         {}%", project.progress());
    println!("Estimated hours:  {}", project.estimated_time_to_complete());
    println!("Overdue:          {}", count_overdue(db, now));
    println!("Due within 7d:    {}", due_this_week);
    println!("Completed:        {}", if project.is_completed() { "yes" } else { "no" });
}

/// List all distinct tags with their usage counts.
pub fn cmd_tags(db: &Database) {
    println!("{:<16} {}", "Tag", "Count");
    for (tag, c) in db.tag_counts() {
        println!("{:<16} {}", ellipsize(&tag, 16), c);
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
