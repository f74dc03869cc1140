//! Value types attached to todos.
//!
//! This module defines the small field types a task carries: tags, the four-rank
//! priority with its important/urgent flags, the workflow status and the due date.

use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use clap::ValueEnum;

use crate::error::{Result, TodoError};

/// A named label. Two tags are the same tag when their names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(TodoError::EmptyDescription);
        }
        Ok(Tag { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.name)
    }
}

/// Rank 1 (most pressing) to 4 (default), plus two descriptive flags.
///
/// The rank is fixed at construction and is the only thing compared for equality
/// and used for ordering. The flags start out matching the rank's Eisenhower
/// quadrant but can be changed independently afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Priority {
    rank: u8,
    important: bool,
    urgent: bool,
}

impl Priority {
    pub const LOWEST_RANK: u8 = 4;

    pub fn new(rank: i32) -> Result<Self> {
        let (important, urgent) = match rank {
            1 => (true, true),
            2 => (true, false),
            3 => (false, true),
            4 => (false, false),
            _ => return Err(TodoError::InvalidPriority(rank)),
        };
        Ok(Priority { rank: rank as u8, important, urgent })
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn is_important(&self) -> bool {
        self.important
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    pub fn set_important(&mut self, important: bool) {
        self.important = important;
    }

    pub fn set_urgent(&mut self, urgent: bool) {
        self.urgent = urgent;
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority { rank: Self::LOWEST_RANK, important: false, urgent: false }
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl Eq for Priority {}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match (self.important, self.urgent) {
            (true, true) => "IMPORTANT & URGENT",
            (true, false) => "IMPORTANT",
            (false, true) => "URGENT",
            (false, false) => "DEFAULT",
        };
        f.write_str(label)
    }
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Todo,
    UpNext,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Todo, Status::UpNext, Status::InProgress, Status::Done];

    /// Name used in the persisted format.
    pub fn name(&self) -> &'static str {
        match self {
            Status::Todo => "TODO",
            Status::UpNext => "UP_NEXT",
            Status::InProgress => "IN_PROGRESS",
            Status::Done => "DONE",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Todo => "TODO",
            Status::UpNext => "UP NEXT",
            Status::InProgress => "IN PROGRESS",
            Status::Done => "DONE",
        }
    }

    /// Exact, case-sensitive lookup by persisted name.
    pub fn from_name(name: &str) -> Option<Status> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A deadline with minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate {
    at: NaiveDateTime,
}

impl DueDate {
    /// Due at the end of today (23:59 local time).
    pub fn new() -> Self {
        let today = Local::now().date_naive();
        DueDate { at: end_of_day(today) }
    }

    pub fn from_datetime(at: NaiveDateTime) -> Self {
        DueDate { at: truncate_to_minute(at) }
    }

    /// Build from calendar fields. `month0` is zero-based (0 = January).
    /// Returns `None` when the fields do not name a real minute.
    pub fn from_parts(year: i32, month0: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month0.checked_add(1)?, day)?;
        let at = date.and_hms_opt(hour, minute, 0)?;
        Some(DueDate { at })
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.at
    }

    pub fn year(&self) -> i32 {
        self.at.year()
    }

    /// Zero-based month, as persisted.
    pub fn month0(&self) -> u32 {
        self.at.month0()
    }

    pub fn day(&self) -> u32 {
        self.at.day()
    }

    pub fn hour(&self) -> u32 {
        self.at.hour()
    }

    pub fn minute(&self) -> u32 {
        self.at.minute()
    }

    /// Move to another day, keeping the time of day.
    pub fn set_due_date(&mut self, date: NaiveDate) {
        self.at = date.and_time(self.at.time());
    }

    /// Change the time of day, keeping the day.
    pub fn set_due_time(&mut self, time: NaiveTime) {
        self.at = truncate_to_minute(self.at.date().and_time(time));
    }

    pub fn postpone_one_day(&mut self) {
        self.at += Duration::days(1);
    }

    pub fn postpone_one_week(&mut self) {
        self.at += Duration::weeks(1);
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.at < now
    }

    pub fn is_due_today(&self, now: NaiveDateTime) -> bool {
        self.at.date() == now.date()
    }

    pub fn is_due_tomorrow(&self, now: NaiveDateTime) -> bool {
        now.date().succ_opt() == Some(self.at.date())
    }

    /// Not yet overdue and due no later than `days` days from `now`.
    pub fn is_due_within(&self, days: u32, now: NaiveDateTime) -> bool {
        !self.is_overdue(now) && self.at <= now + Duration::days(i64::from(days))
    }
}

impl Default for DueDate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at.format("%a %b %d %Y %I:%M %p"))
    }
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 0).unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0).and_then(|at| at.with_nanosecond(0)).unwrap_or(at)
}
