//! Study task list.
//!
//! Tasks are a persisted widget surface; the only coupling to the core is
//! the completion edge: flipping a task from open to done raises the
//! coordinator's task-completion signal exactly once per flip. Un-checking
//! a task never takes the credit back.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyTask {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Persisted under the `study_tasks` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<StudyTask>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[StudyTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a task. Blank titles are rejected silently.
    pub fn add(
        &mut self,
        title: &str,
        priority: TaskPriority,
        subject: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> Option<&StudyTask> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        self.tasks.push(StudyTask {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            completed: false,
            priority,
            subject: subject.filter(|s| !s.trim().is_empty()),
            due_date,
            created_at: Utc::now(),
        });
        self.tasks.last()
    }

    /// Flip completion on the matching task. Returns `Some(true)` on the
    /// open -> done edge (the moment that earns accumulator credit),
    /// `Some(false)` when the task was re-opened, `None` for unknown ids.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Drop every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_blank_title() {
        let mut list = TaskList::new();
        assert!(list.add("", TaskPriority::Medium, None, None).is_none());
        assert!(list.add("   ", TaskPriority::Medium, None, None).is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn add_trims_and_assigns_id() {
        let mut list = TaskList::new();
        let id = {
            let task = list
                .add("  read chapter 4 ", TaskPriority::High, Some("math".into()), None)
                .unwrap();
            assert_eq!(task.title, "read chapter 4");
            assert!(!task.completed);
            task.id.clone()
        };
        assert!(!id.is_empty());
    }

    #[test]
    fn toggle_reports_completion_edge() {
        let mut list = TaskList::new();
        let id = list
            .add("t", TaskPriority::Medium, None, None)
            .unwrap()
            .id
            .clone();

        assert_eq!(list.toggle(&id), Some(true));
        assert_eq!(list.toggle(&id), Some(false));
        assert_eq!(list.toggle("missing"), None);
    }

    #[test]
    fn clear_completed_keeps_open_tasks() {
        let mut list = TaskList::new();
        let a = list.add("a", TaskPriority::Medium, None, None).unwrap().id.clone();
        list.add("b", TaskPriority::Medium, None, None);
        list.toggle(&a);

        assert_eq!(list.clear_completed(), 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.open_count(), 1);
        assert_eq!(list.tasks()[0].title, "b");
    }
}
