//! Todo list view-controller.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Priority, Schedule, Task, TaskId, TaskType, TaskUpdate, WeekDay, format_date};
use crate::store::{Observer, SharedState, with_state_mut};
use crate::{Error, Result};

/// One row of the todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub task_type: TaskType,
    /// "2025-06-04" for one-time tasks, "every wed" for weekly ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl From<&Task> for TodoItem {
    fn from(task: &Task) -> Self {
        let schedule = match &task.schedule {
            Schedule::None => None,
            Schedule::Once { date } => Some(format_date(*date)),
            Schedule::Recurring { week_day, .. } => Some(format!("every {}", week_day)),
        };
        Self {
            id: task.id.clone(),
            text: task.text.clone(),
            completed: task.completed,
            priority: task.priority,
            project: task.project.clone(),
            progress: task.progress,
            created_at: task.created_at.clone(),
            task_type: task.task_type(),
            schedule,
        }
    }
}

/// Render model of the todo list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoListing {
    pub items: Vec<TodoItem>,
    pub total: usize,
    /// Tasks still to do; weekly tasks never stop being active
    pub active: usize,
}

impl TodoListing {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            items: tasks.iter().map(TodoItem::from).collect(),
            total: tasks.len(),
            active: tasks.iter().filter(|t| t.is_open()).count(),
        }
    }

    /// Counter line shown under the list, e.g. `5 (3)`.
    pub fn summary(&self) -> String {
        format!("{} ({})", self.total, self.active)
    }
}

/// Edits the shared task list and keeps a listing of it.
pub struct TodoView {
    store: SharedState,
    listing: RefCell<TodoListing>,
}

impl TodoView {
    /// Create the view, render the current tasks and subscribe to changes.
    pub fn attach(store: &SharedState) -> Result<Rc<Self>> {
        let view = Rc::new(Self {
            store: Rc::clone(store),
            listing: RefCell::new(TodoListing::default()),
        });
        with_state_mut(store, |state| {
            view.render(state.tasks());
            state.subscribe_rc(&view);
            Ok(())
        })?;
        Ok(view)
    }

    pub fn listing(&self) -> TodoListing {
        self.listing.borrow().clone()
    }

    /// Add a task from the input box. Blank input is rejected.
    pub fn add(&self, text: &str) -> Result<TaskId> {
        with_state_mut(&self.store, |state| state.add_todo(text))
    }

    /// Flip a task's checkbox. Returns the new state.
    pub fn toggle(&self, id: &TaskId) -> Result<bool> {
        with_state_mut(&self.store, |state| state.toggle_todo(id))?
            .ok_or_else(|| not_found(id))
    }

    pub fn delete(&self, id: &TaskId) -> Result<()> {
        if with_state_mut(&self.store, |state| state.delete_todo(id))? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Remove completed tasks. Returns how many were removed.
    pub fn clear_completed(&self) -> Result<usize> {
        with_state_mut(&self.store, |state| state.clear_completed())
    }

    /// Apply an arbitrary edit to one task.
    pub fn edit(&self, id: &TaskId, update: TaskUpdate) -> Result<()> {
        if with_state_mut(&self.store, |state| state.update_todo(id, update))? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    pub fn rename(&self, id: &TaskId, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("Task text cannot be empty".to_string()));
        }
        self.edit(id, TaskUpdate::new().with_text(text))
    }

    pub fn set_priority(&self, id: &TaskId, priority: Priority) -> Result<()> {
        self.edit(id, TaskUpdate::new().with_priority(priority))
    }

    /// Assign a project and progress, or clear the project with `None`.
    pub fn set_project(&self, id: &TaskId, project: Option<&str>, progress: Option<u8>) -> Result<()> {
        if let Some(p) = progress {
            if p > 100 {
                return Err(Error::InvalidInput(format!(
                    "Progress must be between 0 and 100, got {}",
                    p
                )));
            }
        }
        let mut update = TaskUpdate::new().with_project(project.map(str::to_string));
        if let Some(p) = progress {
            update = update.with_progress(p);
        }
        self.edit(id, update)
    }

    /// Schedule a task once, weekly or not at all.
    pub fn set_schedule(&self, id: &TaskId, schedule: ScheduleChoice) -> Result<()> {
        let update = match schedule {
            ScheduleChoice::Unscheduled => TaskUpdate::new().with_task_type(TaskType::None),
            ScheduleChoice::Once(date) => TaskUpdate::new().with_once(date),
            ScheduleChoice::Weekly(day) => TaskUpdate::new().with_weekly(day),
        };
        self.edit(id, update)
    }

    fn render(&self, tasks: &[Task]) {
        *self.listing.borrow_mut() = TodoListing::from_tasks(tasks);
    }
}

impl Observer for TodoView {
    fn update(&self, tasks: &[Task]) -> Result<()> {
        self.render(tasks);
        Ok(())
    }
}

/// Schedule picked in the task editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleChoice {
    Unscheduled,
    Once(NaiveDate),
    Weekly(WeekDay),
}

fn not_found(id: &TaskId) -> Error {
    Error::NotFound(format!("Task {} not found", id))
}
