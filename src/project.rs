//! Projects: todos that group other todos.
//!
//! A project keeps an insertion-ordered list of child todos without duplicates,
//! rolls their progress and estimates up, and walks them in priority order.

use crate::error::{Result, TodoError};
use crate::fields::Priority;
use crate::todo::Todo;

/// A named collection of tasks and sub-projects.
///
/// Two projects are equal when their descriptions match.
#[derive(Debug, Clone)]
pub struct Project {
    description: String,
    priority: Priority,
    children: Vec<Todo>,
}

impl Project {
    /// Create an empty project; the description must not be empty.
    pub fn new(description: &str) -> Result<Self> {
        if description.is_empty() {
            return Err(TodoError::EmptyDescription);
        }
        Ok(Project {
            description: description.to_string(),
            priority: Priority::default(),
            children: Vec::new(),
        })
    }

    /// Get the project description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replace the description; an empty one is rejected and nothing changes.
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        if description.is_empty() {
            return Err(TodoError::EmptyDescription);
        }
        self.description = description.to_string();
        Ok(())
    }

    /// Get the project priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Set the project priority.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Append `todo` unless it is this project or already a child.
    pub fn add(&mut self, todo: Todo) {
        if self.is_self(&todo) || self.contains(&todo) {
            return;
        }
        self.children.push(todo);
    }

    /// Remove the first child equal to `todo`. Passing this project's own handle is a no-op.
    pub fn remove(&mut self, todo: &Todo) {
        if self.is_own_handle(todo) {
            return;
        }
        if let Some(idx) = self.children.iter().position(|child| child == todo) {
            self.children.remove(idx);
        }
    }

    /// Whether a child equal to `todo` is present.
    pub fn contains(&self, todo: &Todo) -> bool {
        !self.is_own_handle(todo) && self.children.iter().any(|child| child == todo)
    }

    /// Number of direct children, tasks and sub-projects alike.
    pub fn number_of_tasks(&self) -> usize {
        self.children.len()
    }

    /// Complete when it has children and progress reaches 100.
    pub fn is_completed(&self) -> bool {
        self.number_of_tasks() != 0 && self.progress() == 100
    }

    /// Sum of the children's estimates, recursing into sub-projects.
    pub fn estimated_time_to_complete(&self) -> u32 {
        self.children.iter().map(Todo::estimated_time_to_complete).sum()
    }

    /// Percentage complete, rounded down.
    ///
    /// The mean of the direct tasks is averaged with the progress of the *last*
    /// sub-project only, dividing by one more than the number of sub-projects.
    /// With no direct tasks the result is 0 whatever the sub-projects hold.
    pub fn progress(&self) -> u32 {
        let mut task_count = 0u32;
        let mut task_progress_sum = 0u32;
        let mut last_subproject_progress = 0u32;
        let mut project_count = 1u32;

        for child in &self.children {
            match child {
                Todo::Task(task) => {
                    task_count += 1;
                    task_progress_sum += task.borrow().progress();
                }
                Todo::Project(project) => {
                    project_count += 1;
                    last_subproject_progress = project.borrow().progress();
                }
            }
        }

        if task_count == 0 {
            return 0;
        }
        let task_average = task_progress_sum / task_count;
        (last_subproject_progress + task_average) / project_count
    }

    /// Direct children, rank 1 first, insertion order within a rank.
    pub fn iter(&self) -> PriorityIter<'_> {
        PriorityIter::new(&self.children)
    }

    /// The handle wraps this very value, checked by address so no borrow is taken.
    fn is_own_handle(&self, todo: &Todo) -> bool {
        match todo {
            Todo::Project(project) => std::ptr::eq(project.as_ptr(), self),
            Todo::Task(_) => false,
        }
    }

    /// This project's own handle, or a project equal to it by value.
    fn is_self(&self, todo: &Todo) -> bool {
        if self.is_own_handle(todo) {
            return true;
        }
        match todo {
            // A project mutably borrowed elsewhere cannot be this one.
            Todo::Project(project) => project.try_borrow().is_ok_and(|p| *p == *self),
            Todo::Task(_) => false,
        }
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}

impl Eq for Project {}

impl<'a> IntoIterator for &'a Project {
    type Item = &'a Todo;
    type IntoIter = PriorityIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Single pass over a project's children in priority order.
///
/// One forward-only cursor per rank scans the child list for its rank; no
/// sorted copy is made.
#[derive(Debug, Clone)]
pub struct PriorityIter<'a> {
    children: &'a [Todo],
    cursors: [usize; Priority::LOWEST_RANK as usize],
    yielded: usize,
}

impl<'a> PriorityIter<'a> {
    fn new(children: &'a [Todo]) -> Self {
        PriorityIter { children, cursors: [0; Priority::LOWEST_RANK as usize], yielded: 0 }
    }

    /// Whether any child is left to yield.
    pub fn has_next(&self) -> bool {
        self.yielded < self.children.len()
    }

    /// Next child, or `Exhausted` once every child has been yielded.
    pub fn try_next(&mut self) -> Result<&'a Todo> {
        if !self.has_next() {
            return Err(TodoError::Exhausted);
        }
        let children = self.children;
        for (bucket, cursor) in self.cursors.iter_mut().enumerate() {
            let rank = bucket as u8 + 1;
            while *cursor < children.len() {
                let child = &children[*cursor];
                *cursor += 1;
                if child.priority().rank() == rank {
                    self.yielded += 1;
                    return Ok(child);
                }
            }
        }
        Err(TodoError::Exhausted)
    }
}

impl<'a> Iterator for PriorityIter<'a> {
    type Item = &'a Todo;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.children.len() - self.yielded;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::task::Task;
    use crate::todo::{SharedProject, SharedTask};

    fn task(description: &str) -> SharedTask {
        Rc::new(RefCell::new(Task::new(description).unwrap()))
    }

    fn ranked(description: &str, rank: i32) -> Todo {
        let mut t = Task::new(description).unwrap();
        t.set_priority(Priority::new(rank).unwrap());
        t.into()
    }

    fn project(description: &str) -> SharedProject {
        Rc::new(RefCell::new(Project::new(description).unwrap()))
    }

    fn descriptions(project: &Project) -> Vec<String> {
        project.iter().map(Todo::description).collect()
    }

    #[test]
    fn test_empty_project() {
        let p = Project::new("hi").unwrap();
        assert_eq!(p.description(), "hi");
        assert_eq!(p.progress(), 0);
        assert_eq!(p.number_of_tasks(), 0);
        assert_eq!(p.estimated_time_to_complete(), 0);
        assert!(!p.is_completed());
    }

    #[test]
    fn test_empty_description_rejected() {
        assert_eq!(Project::new("").unwrap_err(), TodoError::EmptyDescription);
        let mut p = Project::new("hi").unwrap();
        assert_eq!(p.set_description(""), Err(TodoError::EmptyDescription));
        assert_eq!(p.description(), "hi");
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let mut p = Project::new("hi").unwrap();
        let t1 = task("hello world");
        let t2 = task("hello worlds");
        p.add(t1.clone().into());
        p.add(t2.clone().into());
        assert_eq!(p.number_of_tasks(), 2);
        p.add(t1.clone().into());
        p.add(Task::new("hello worlds").unwrap().into());
        assert_eq!(p.number_of_tasks(), 2);
    }

    #[test]
    fn test_cannot_contain_itself() {
        let p = project("hi");
        let handle = Todo::Project(p.clone());
        p.borrow_mut().add(handle.clone());
        assert_eq!(p.borrow().number_of_tasks(), 0);

        p.borrow_mut().add(Project::new("hi").unwrap().into());
        assert_eq!(p.borrow().number_of_tasks(), 0);

        p.borrow_mut().add(Project::new("other").unwrap().into());
        assert_eq!(p.borrow().number_of_tasks(), 1);
    }

    #[test]
    fn test_own_handle_with_subproject() {
        let p = project("outer");
        p.borrow_mut().add(task("t").into());
        p.borrow_mut().add(project("sub").into());
        let me = Todo::Project(p.clone());

        let mut outer = p.borrow_mut();
        assert!(!outer.contains(&me));
        outer.remove(&me);
        outer.add(me.clone());
        assert_eq!(outer.number_of_tasks(), 2);
        assert_eq!(descriptions(&outer), ["t", "sub"]);
    }

    #[test]
    fn test_add_project_borrowed_elsewhere() {
        let p = project("outer");
        let q = project("inner");
        let _guard = q.borrow_mut();
        p.borrow_mut().add(Todo::Project(q.clone()));
        assert_eq!(p.borrow().number_of_tasks(), 1);
        assert!(p.borrow().contains(&Todo::Project(q.clone())));
    }

    #[test]
    fn test_remove_and_contains() {
        let mut p = Project::new("testing").unwrap();
        let t1: Todo = task("t1").into();
        let t2: Todo = task("t2").into();
        let sub: Todo = project("spare").into();
        p.add(t1.clone());
        p.add(t2.clone());
        p.add(sub.clone());
        assert!(p.contains(&t2));
        assert!(p.contains(&sub));
        assert_eq!(p.number_of_tasks(), 3);

        p.remove(&t1);
        assert!(!p.contains(&t1));
        assert_eq!(p.number_of_tasks(), 2);
        p.remove(&t1);
        assert_eq!(p.number_of_tasks(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut p = Project::new("p").unwrap();
        for name in ["a", "b", "c"] {
            p.add(task(name).into());
        }
        let b: Todo = Task::new("b").unwrap().into();
        p.remove(&b);
        assert_eq!(descriptions(&p), ["a", "c"]);
    }

    #[test]
    fn test_progress_aggregation() {
        let p1 = project("p1");
        let (t1, t2, t3) = (task("t1"), task("t2"), task("t3"));
        for t in [&t1, &t2, &t3] {
            p1.borrow_mut().add(t.clone().into());
        }
        assert_eq!(p1.borrow().progress(), 0);

        t1.borrow_mut().set_progress(100).unwrap();
        assert_eq!(p1.borrow().progress(), 33);
        t2.borrow_mut().set_progress(50).unwrap();
        t3.borrow_mut().set_progress(25).unwrap();
        assert_eq!(p1.borrow().progress(), 58);

        p1.borrow_mut().add(project("p2").into());
        assert_eq!(p1.borrow().progress(), 29);

        let p3 = project("p3");
        p3.borrow_mut().add(t3.clone().into());
        p1.borrow_mut().add(p3.into());
        assert_eq!(p1.borrow().progress(), 27);
    }

    #[test]
    fn test_progress_only_last_subproject_counts() {
        let mut p = Project::new("outer").unwrap();
        let mut done = Task::new("done").unwrap();
        done.set_progress(100).unwrap();
        p.add(done.into());

        let full = project("full");
        let mut inner = Task::new("inner").unwrap();
        inner.set_progress(100).unwrap();
        full.borrow_mut().add(inner.into());
        p.add(full.into());
        assert_eq!(p.progress(), 100);

        p.add(project("empty").into());
        assert_eq!(p.progress(), 33);
    }

    #[test]
    fn test_progress_zero_without_direct_tasks() {
        let mut p = Project::new("outer").unwrap();
        let sub = project("sub");
        let mut t = Task::new("t").unwrap();
        t.set_progress(100).unwrap();
        sub.borrow_mut().add(t.into());
        p.add(sub.into());
        assert_eq!(p.progress(), 0);
        assert!(!p.is_completed());
    }

    #[test]
    fn test_is_completed() {
        let mut p = Project::new("hi").unwrap();
        assert!(!p.is_completed());
        let t = task("hi");
        p.add(t.clone().into());
        assert!(!p.is_completed());
        t.borrow_mut().set_progress(50).unwrap();
        assert!(!p.is_completed());
        t.borrow_mut().set_progress(100).unwrap();
        assert!(p.is_completed());
    }

    #[test]
    fn test_estimated_time_sums_recursively() {
        let mut p = Project::new("p1").unwrap();
        let (t1, t2, t3) = (task("t1"), task("t2"), task("t3"));
        for t in [&t1, &t2, &t3] {
            p.add(t.clone().into());
        }
        assert_eq!(p.estimated_time_to_complete(), 0);
        t1.borrow_mut().set_estimated_time_to_complete(8).unwrap();
        t2.borrow_mut().set_estimated_time_to_complete(2).unwrap();
        t3.borrow_mut().set_estimated_time_to_complete(10).unwrap();
        assert_eq!(p.estimated_time_to_complete(), 20);

        let p2 = project("p2");
        let t4 = task("t4");
        p2.borrow_mut().add(t4.clone().into());
        t4.borrow_mut().set_estimated_time_to_complete(4).unwrap();
        p.add(p2.into());
        assert_eq!(p.estimated_time_to_complete(), 24);
    }

    #[test]
    fn test_iteration_is_stable_within_rank() {
        let mut p = Project::new("hi").unwrap();
        p.add(ranked("c3", 3));
        p.add(ranked("a1", 1));
        p.add(ranked("d4", 4));
        p.add(ranked("b2", 2));
        p.add(ranked("e1", 1));
        assert_eq!(descriptions(&p), ["a1", "e1", "b2", "c3", "d4"]);
    }

    #[test]
    fn test_iteration_does_not_descend() {
        let mut p0 = Project::new("hi").unwrap();
        let p1 = project("p1");
        p1.borrow_mut().set_priority(Priority::new(1).unwrap());
        p1.borrow_mut().add(task("t5").into());
        p0.add(ranked("t3", 3));
        p0.add(p1.into());
        p0.add(ranked("t2", 2));
        p0.add(ranked("t4", 4));
        p0.add(ranked("t1", 1));

        let mut seen = Vec::new();
        for todo in &p0 {
            seen.push(todo.description());
        }
        assert_eq!(seen, ["p1", "t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn test_exhausted_after_last() {
        let mut p = Project::new("Please throw").unwrap();
        let sub = project("subproject");
        p.add(sub.clone().into());
        let t = ranked("some task", 1);
        p.add(t.clone());

        let mut iter = p.iter();
        assert_eq!(iter.size_hint(), (2, Some(2)));
        assert!(iter.has_next());
        assert_eq!(iter.try_next().unwrap(), &t);
        assert_eq!(iter.try_next().unwrap(), &Todo::Project(sub));
        assert!(!iter.has_next());
        assert_eq!(iter.try_next(), Err(TodoError::Exhausted));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_iterating_empty_project() {
        let p = Project::new("some project").unwrap();
        let mut iter = p.iter();
        assert!(!iter.has_next());
        assert_eq!(iter.try_next(), Err(TodoError::Exhausted));
    }

    #[test]
    fn test_equality_by_description() {
        let mut a = Project::new("same").unwrap();
        a.add(task("child").into());
        let b = Project::new("same").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Project::new("different").unwrap());
    }
}
