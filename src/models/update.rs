//! Partial task updates.

use chrono::NaiveDate;

use super::{Priority, TaskType, WeekDay};

/// A set of field changes to apply to a [`super::Task`].
///
/// Every field is optional; absent fields leave the task untouched. For
/// recurring tasks, `completed` together with `date` addresses a single
/// occurrence rather than the task itself (see
/// [`crate::store::AppState::update_todo`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the project label
    pub project: Option<Option<String>>,
    pub progress: Option<u8>,
    pub task_type: Option<TaskType>,
    pub date: Option<NaiveDate>,
    pub week_day: Option<WeekDay>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the occurrence on `date` of a recurring task as done or not done.
    pub fn occurrence(date: NaiveDate, completed: bool) -> Self {
        Self {
            completed: Some(completed),
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_week_day(mut self, week_day: WeekDay) -> Self {
        self.week_day = Some(week_day);
        self
    }

    /// Schedule the task for a single date.
    pub fn with_once(self, date: NaiveDate) -> Self {
        self.with_task_type(TaskType::Once).with_date(date)
    }

    /// Schedule the task every week on `week_day`.
    pub fn with_weekly(self, week_day: WeekDay) -> Self {
        self.with_task_type(TaskType::Recurring).with_week_day(week_day)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
