//! Data models for Hygge entities.
//!
//! This module defines the core data structures:
//! - `Task` - Work items with priority, project metadata and a schedule
//! - `Schedule` - Tagged union of unscheduled, one-time and weekly tasks
//! - `TaskUpdate` - Partial updates applied through the task store
//!
//! Tasks are persisted as flat camelCase JSON objects (`taskType`, `date`,
//! `weekDay`, `completionRecords`) so that stored data stays readable by the
//! browser widgets. Conversion to and from that wire form happens through
//! [`RawTask`], which is also where legacy records are migrated.

mod update;

pub use update::TaskUpdate;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Format used for dates in storage and as completion record keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Unique task identifier.
///
/// New ids are creation timestamps in milliseconds. Stored data may hold
/// either numbers or strings; both load into the same string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is a timestamp-style id.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => TaskId::from(n),
            RawId::Text(s) => TaskId(s),
        })
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::None => "none",
        }
    }
}

impl FromStr for Priority {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            "none" | "" => Ok(Priority::None),
            other => Err(crate::Error::InvalidInput(format!(
                "Invalid priority '{}': expected high, medium, low or none",
                other
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day-of-week column code used by the weekly planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl WeekDay {
    /// All days in planner column order, Monday first.
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Mon,
        WeekDay::Tue,
        WeekDay::Wed,
        WeekDay::Thu,
        WeekDay::Fri,
        WeekDay::Sat,
        WeekDay::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekDay::Mon => "mon",
            WeekDay::Tue => "tue",
            WeekDay::Wed => "wed",
            WeekDay::Thu => "thu",
            WeekDay::Fri => "fri",
            WeekDay::Sat => "sat",
            WeekDay::Sun => "sun",
        }
    }

    /// Zero-based column index, Monday = 0.
    pub fn column(&self) -> usize {
        *self as usize
    }

    /// The day a calendar date falls on.
    pub fn of(date: NaiveDate) -> Self {
        WeekDay::from(date.weekday())
    }
}

impl From<Weekday> for WeekDay {
    fn from(day: Weekday) -> Self {
        WeekDay::ALL[day.num_days_from_monday() as usize]
    }
}

impl FromStr for WeekDay {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        WeekDay::ALL
            .into_iter()
            .find(|d| d.as_str() == lower || full_day_name(*d) == lower)
            .ok_or_else(|| crate::Error::InvalidInput(format!("Invalid weekday '{}'", s)))
    }
}

fn full_day_name(day: WeekDay) -> &'static str {
    match day {
        WeekDay::Mon => "monday",
        WeekDay::Tue => "tuesday",
        WeekDay::Wed => "wednesday",
        WeekDay::Thu => "thursday",
        WeekDay::Fri => "friday",
        WeekDay::Sat => "saturday",
        WeekDay::Sun => "sunday",
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of [`Schedule`], as stored in the `taskType` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    None,
    Once,
    Recurring,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::None => "none",
            TaskType::Once => "once",
            TaskType::Recurring => "recurring",
        }
    }
}

impl FromStr for TaskType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(TaskType::None),
            "once" => Ok(TaskType::Once),
            "recurring" | "weekly" => Ok(TaskType::Recurring),
            other => Err(crate::Error::InvalidInput(format!("Invalid task type '{}'", other))),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a task shows up in the weekly planner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Schedule {
    /// Not scheduled; invisible to the weekly projection.
    #[default]
    None,
    /// Scheduled for a single calendar date.
    Once { date: NaiveDate },
    /// Repeats every week. Each occurrence completes independently, keyed
    /// by its calendar date.
    Recurring {
        week_day: WeekDay,
        completion_records: BTreeMap<NaiveDate, bool>,
    },
}

impl Schedule {
    /// A weekly schedule with no completed occurrences.
    pub fn recurring(week_day: WeekDay) -> Self {
        Schedule::Recurring {
            week_day,
            completion_records: BTreeMap::new(),
        }
    }

    pub fn task_type(&self) -> TaskType {
        match self {
            Schedule::None => TaskType::None,
            Schedule::Once { .. } => TaskType::Once,
            Schedule::Recurring { .. } => TaskType::Recurring,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, Schedule::Recurring { .. })
    }

    /// Completion state of the occurrence on `date`. Always false for
    /// non-recurring schedules.
    pub fn occurrence_completed(&self, date: NaiveDate) -> bool {
        match self {
            Schedule::Recurring {
                completion_records, ..
            } => completion_records.get(&date).copied().unwrap_or(false),
            _ => false,
        }
    }
}

/// A work item shared by the todo list, weekly planner and Gantt views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTask", into = "RawTask")]
pub struct Task {
    /// Unique identifier (creation timestamp in milliseconds)
    pub id: TaskId,

    /// Display text
    pub text: String,

    /// Completion flag; not authoritative for recurring tasks
    pub completed: bool,

    pub priority: Priority,

    /// Project label grouping tasks in the Gantt view
    pub project: Option<String>,

    /// Progress percentage (0-100), meaningful only with a project
    pub progress: u8,

    /// Creation date as shown in the todo list
    pub created_at: Option<String>,

    pub schedule: Schedule,
}

impl Task {
    /// Create a new unscheduled task with the given ID and text.
    pub fn new(id: TaskId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            priority: Priority::default(),
            project: None,
            progress: 0,
            created_at: Some(format_date(Local::now().date_naive())),
            schedule: Schedule::None,
        }
    }

    pub fn task_type(&self) -> TaskType {
        self.schedule.task_type()
    }

    /// Whether the task counts as open in listings and the Gantt rollup.
    ///
    /// Weekly tasks are completed per occurrence and never close as a whole.
    pub fn is_open(&self) -> bool {
        self.schedule.is_recurring() || !self.completed
    }

    /// Merge every field present in `update` onto this task.
    ///
    /// Schedule fields are folded into the [`Schedule`] union: `task_type`
    /// selects the variant and `date`/`week_day` fill it, falling back to the
    /// values of the current variant. Changes that would leave a scheduled
    /// task without its date or weekday are ignored.
    pub fn merge(&mut self, update: TaskUpdate) {
        if let Some(text) = update.text {
            self.text = text;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(project) = update.project {
            self.project = project.filter(|p| !p.trim().is_empty());
        }
        if let Some(progress) = update.progress {
            self.progress = progress.min(100);
        }
        self.merge_schedule(update.task_type, update.date, update.week_day);
    }

    fn merge_schedule(
        &mut self,
        task_type: Option<TaskType>,
        date: Option<NaiveDate>,
        week_day: Option<WeekDay>,
    ) {
        let target = task_type.unwrap_or_else(|| self.task_type());
        let current = std::mem::take(&mut self.schedule);

        self.schedule = match (target, current) {
            (TaskType::None, _) => Schedule::None,
            (TaskType::Once, Schedule::Once { date: old }) => Schedule::Once {
                date: date.unwrap_or(old),
            },
            (TaskType::Once, current) => match date {
                Some(date) => Schedule::Once { date },
                None => {
                    tracing::warn!(id = %self.id, "ignoring switch to one-time schedule without a date");
                    current
                }
            },
            (
                TaskType::Recurring,
                Schedule::Recurring {
                    week_day: old,
                    completion_records,
                },
            ) => Schedule::Recurring {
                week_day: week_day.unwrap_or(old),
                completion_records,
            },
            (TaskType::Recurring, current) => match week_day {
                Some(day) => {
                    // The task flag has no meaning once completion is tracked per occurrence
                    self.completed = false;
                    Schedule::recurring(day)
                }
                None => {
                    tracing::warn!(id = %self.id, "ignoring switch to weekly schedule without a weekday");
                    current
                }
            },
        };
    }
}

/// Wire representation of a [`Task`].
///
/// Flat and permissive: every schedule field is optional and unknown tags
/// degrade to an unscheduled task. Converting into a `Task` performs the
/// one-time upward migration of legacy records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    id: TaskId,
    #[serde(alias = "title")]
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project: Option<String>,
    #[serde(default)]
    progress: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    task_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    week_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completion_records: Option<BTreeMap<String, bool>>,
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        let week_day = raw.week_day.as_deref().and_then(|d| d.parse::<WeekDay>().ok());
        let date = raw.date.as_deref().and_then(parse_date);

        let task_type = match raw.task_type.as_deref() {
            Some(tag) => tag.parse().unwrap_or_else(|_| {
                tracing::warn!(id = %raw.id, tag = %tag, "unknown task type, treating task as unscheduled");
                TaskType::None
            }),
            // Records written before schedules were tagged only carried a weekday
            None if week_day.is_some() => TaskType::Recurring,
            None => TaskType::None,
        };

        let schedule = match task_type {
            TaskType::None => Schedule::None,
            TaskType::Once => match date {
                Some(date) => Schedule::Once { date },
                None => {
                    tracing::warn!(id = %raw.id, "one-time task without a valid date, unscheduling");
                    Schedule::None
                }
            },
            TaskType::Recurring => match week_day {
                Some(week_day) => Schedule::Recurring {
                    week_day,
                    completion_records: raw
                        .completion_records
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|(key, done)| match parse_date(&key) {
                            Some(d) => Some((d, done)),
                            None => {
                                tracing::warn!(id = %raw.id, key = %key, "dropping malformed completion record");
                                None
                            }
                        })
                        .collect(),
                },
                None => {
                    tracing::warn!(id = %raw.id, "weekly task without a valid weekday, unscheduling");
                    Schedule::None
                }
            },
        };

        Task {
            id: raw.id,
            text: raw.text,
            completed: raw.completed,
            priority: raw.priority,
            project: raw.project.filter(|p| !p.trim().is_empty()),
            progress: raw.progress.clamp(0, 100) as u8,
            created_at: raw.created_at,
            schedule,
        }
    }
}

impl From<Task> for RawTask {
    fn from(task: Task) -> Self {
        let task_type = Some(task.task_type().as_str().to_string());
        let (date, week_day, completion_records) = match task.schedule {
            Schedule::None => (None, None, None),
            Schedule::Once { date } => (Some(format_date(date)), None, None),
            Schedule::Recurring {
                week_day,
                completion_records,
            } => (
                None,
                Some(week_day.as_str().to_string()),
                Some(
                    completion_records
                        .into_iter()
                        .map(|(d, done)| (format_date(d), done))
                        .collect(),
                ),
            ),
        };

        RawTask {
            id: task.id,
            text: task.text,
            completed: task.completed,
            priority: task.priority,
            project: task.project,
            progress: i64::from(task.progress),
            created_at: task.created_at,
            task_type,
            date,
            week_day,
            completion_records,
        }
    }
}
