//! # todobar
//!
//! A to-do model with two kinds of item: leaf **tasks** and **projects** that
//! group tasks and other projects.
//!
//! ## Key Features
//!
//! - **Composite hierarchy**: a [`Todo`] is either a [`Task`] or a [`Project`];
//!   children are shared handles, so one task can live in several projects.
//! - **Priority traversal**: iterating a project yields its direct children
//!   rank 1 first, then 2, 3 and 4, keeping insertion order within a rank.
//! - **Progress roll-up**: projects compute progress and remaining effort from
//!   their children.
//! - **Lenient persistence**: [`parse`] recovers every well-formed task from a
//!   JSON array and drops the rest; [`serialize`] writes the same shape back.
//!
//! ## Example
//!
//! ```
//! use todobar::{Priority, Project, Task, Todo};
//!
//! let mut groceries = Project::new("groceries").unwrap();
//! let mut milk = Task::new("buy milk").unwrap();
//! milk.set_progress(100).unwrap();
//! let mut bread = Task::new("buy bread").unwrap();
//! bread.set_priority(Priority::new(1).unwrap());
//!
//! groceries.add(Todo::from(milk));
//! groceries.add(Todo::from(bread));
//!
//! let order: Vec<String> = groceries.iter().map(Todo::description).collect();
//! assert_eq!(order, ["buy bread", "buy milk"]);
//! assert_eq!(groceries.progress(), 50);
//! ```

pub mod db;
pub mod error;
pub mod fields;
pub mod jsonifier;
pub mod parser;
pub mod project;
pub mod task;
pub mod todo;

pub use db::Database;
pub use error::{Result, TodoError};
pub use fields::{DueDate, Priority, Status, Tag};
pub use jsonifier::{serialize, serialize_pretty};
pub use parser::parse;
pub use project::{PriorityIter, Project};
pub use task::Task;
pub use todo::{SharedProject, SharedTask, Todo};

/// Store location used when neither `--db` nor `TODOBAR_DB` is given.
pub const DEFAULT_DB_PATH: &str = "resources/json/tasks.json";
