use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use studystation_core::storage::keys;
use studystation_core::tasks::{TaskList, TaskPriority};

use super::{open_session, print_json};

#[derive(Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for TaskPriority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => TaskPriority::Low,
            PriorityArg::Medium => TaskPriority::Medium,
            PriorityArg::High => TaskPriority::High,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        title: String,
        #[arg(long, value_enum, default_value = "medium")]
        priority: PriorityArg,
        #[arg(long)]
        subject: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List tasks as JSON
    List,
    /// Toggle a task's completion (completing feeds analytics)
    Toggle { id: String },
    /// Delete a task
    Remove { id: String },
    /// Drop all completed tasks
    ClearCompleted,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = open_session()?;
    let mut tasks: TaskList = coordinator
        .store()
        .get_json(keys::STUDY_TASKS)?
        .unwrap_or_default();

    match action {
        TaskAction::Add {
            title,
            priority,
            subject,
            due,
        } => {
            match tasks.add(&title, priority.into(), subject, due) {
                Some(task) => print_json(&task)?,
                None => eprintln!("nothing to add"),
            }
            coordinator.store().set_json(keys::STUDY_TASKS, &tasks)?;
        }
        TaskAction::List => {
            print_json(&tasks.tasks())?;
        }
        TaskAction::Toggle { id } => {
            match tasks.toggle(&id) {
                Some(true) => {
                    // Completion edge: credit the accumulator exactly once.
                    let event = coordinator.task_completed();
                    print_json(&event)?;
                }
                Some(false) => eprintln!("task reopened"),
                None => eprintln!("no task with id {id}"),
            }
            coordinator.store().set_json(keys::STUDY_TASKS, &tasks)?;
        }
        TaskAction::Remove { id } => {
            if !tasks.remove(&id) {
                eprintln!("no task with id {id}");
            }
            coordinator.store().set_json(keys::STUDY_TASKS, &tasks)?;
            print_json(&tasks.tasks())?;
        }
        TaskAction::ClearCompleted => {
            let removed = tasks.clear_completed();
            coordinator.store().set_json(keys::STUDY_TASKS, &tasks)?;
            eprintln!("removed {removed} completed task(s)");
            print_json(&tasks.tasks())?;
        }
    }

    Ok(())
}
