//! The `Todo` capability shared by tasks and projects.
//!
//! A todo is either a leaf `Task` or a composite `Project`. Children are held
//! through shared handles so the same task can sit in several projects and be
//! edited in place after it has been added.

use std::cell::RefCell;
use std::rc::Rc;

use crate::fields::Priority;
use crate::project::Project;
use crate::task::Task;

pub type SharedTask = Rc<RefCell<Task>>;
pub type SharedProject = Rc<RefCell<Project>>;

/// A task or a project, compared by value.
#[derive(Debug, Clone)]
pub enum Todo {
    Task(SharedTask),
    Project(SharedProject),
}

impl Todo {
    /// Get the description of the task or project.
    pub fn description(&self) -> String {
        match self {
            Todo::Task(t) => t.borrow().description().to_string(),
            Todo::Project(p) => p.borrow().description().to_string(),
        }
    }

    /// Get the priority of the task or project.
    pub fn priority(&self) -> Priority {
        match self {
            Todo::Task(t) => t.borrow().priority(),
            Todo::Project(p) => p.borrow().priority(),
        }
    }

    /// Set the priority through the shared handle.
    pub fn set_priority(&self, priority: Priority) {
        match self {
            Todo::Task(t) => t.borrow_mut().set_priority(priority),
            Todo::Project(p) => p.borrow_mut().set_priority(priority),
        }
    }

    /// Stored progress for a task, aggregated progress for a project.
    pub fn progress(&self) -> u32 {
        match self {
            Todo::Task(t) => t.borrow().progress(),
            Todo::Project(p) => p.borrow().progress(),
        }
    }

    /// Hours left: the task's own estimate, or the sum over a project's children.
    pub fn estimated_time_to_complete(&self) -> u32 {
        match self {
            Todo::Task(t) => t.borrow().estimated_time_to_complete(),
            Todo::Project(p) => p.borrow().estimated_time_to_complete(),
        }
    }

    /// The task handle, if this is a task.
    pub fn as_task(&self) -> Option<&SharedTask> {
        match self {
            Todo::Task(t) => Some(t),
            Todo::Project(_) => None,
        }
    }

    /// The project handle, if this is a project.
    pub fn as_project(&self) -> Option<&SharedProject> {
        match self {
            Todo::Project(p) => Some(p),
            Todo::Task(_) => None,
        }
    }
}

/// Same handle, or equal values. A handle that is mutably borrowed right now
/// only equals itself.
impl PartialEq for Todo {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Todo::Task(a), Todo::Task(b)) => Rc::ptr_eq(a, b) || values_eq(a, b),
            (Todo::Project(a), Todo::Project(b)) => Rc::ptr_eq(a, b) || values_eq(a, b),
            _ => false,
        }
    }
}

fn values_eq<T: PartialEq>(a: &RefCell<T>, b: &RefCell<T>) -> bool {
    match (a.try_borrow(), b.try_borrow()) {
        (Ok(a), Ok(b)) => *a == *b,
        _ => false,
    }
}

impl From<Task> for Todo {
    fn from(task: Task) -> Self {
        Todo::Task(Rc::new(RefCell::new(task)))
    }
}

impl From<Project> for Todo {
    fn from(project: Project) -> Self {
        Todo::Project(Rc::new(RefCell::new(project)))
    }
}

impl From<SharedTask> for Todo {
    fn from(task: SharedTask) -> Self {
        Todo::Task(task)
    }
}

impl From<SharedProject> for Todo {
    fn from(project: SharedProject) -> Self {
        Todo::Project(project)
    }
}
