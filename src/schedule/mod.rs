//! Weekly schedule projection.
//!
//! Pure functions that place tasks into the seven weekday columns of a
//! calendar week. The week is identified by an offset in whole weeks from
//! the week containing "today"; "today" is always passed in, so the same
//! inputs give the same projection.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{Priority, Schedule, Task, TaskId, TaskUpdate, WeekDay};
use crate::{Error, Result};

/// Largest week offset accepted from the command line, in either direction.
pub const MAX_WEEK_OFFSET: i64 = 10_000;

/// The seven dates of one planner week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    /// Weeks relative to the current week (0 = this week)
    pub offset: i64,
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
    /// Week-of-year number shown in the planner header
    pub week_number: u32,
    /// Column dates, Monday first
    pub dates: [NaiveDate; 7],
    /// Column to highlight; only set for the current week
    pub today: Option<WeekDay>,
}

impl WeekWindow {
    /// Compute the week `offset` weeks away from the one containing `today`.
    ///
    /// Fails with [`Error::InvalidInput`] when the week falls outside the
    /// calendar range chrono can represent.
    pub fn for_offset(today: NaiveDate, offset: i64) -> Result<Self> {
        let out_of_range =
            || Error::InvalidInput(format!("Week offset {} is out of range", offset));
        let monday = monday_of(today)
            .zip(offset.checked_mul(7).and_then(Duration::try_days))
            .and_then(|(this_monday, shift)| this_monday.checked_add_signed(shift))
            .filter(|monday| monday.checked_add_signed(Duration::days(6)).is_some())
            .ok_or_else(out_of_range)?;
        let dates: [NaiveDate; 7] = std::array::from_fn(|i| monday + Duration::days(i as i64));

        Ok(Self {
            offset,
            monday,
            sunday: dates[6],
            week_number: week_number(monday),
            dates,
            today: (offset == 0).then(|| WeekDay::of(today)),
        })
    }

    /// The calendar date of column `day`.
    pub fn date_of(&self, day: WeekDay) -> NaiveDate {
        self.dates[day.column()]
    }

    /// The column a date falls in, if it belongs to this week.
    pub fn column_of(&self, date: NaiveDate) -> Option<WeekDay> {
        WeekDay::ALL
            .into_iter()
            .find(|day| self.dates[day.column()] == date)
    }
}

/// Monday of the week containing `date`.
///
/// Sunday belongs to the week that started six days earlier. `None` only at
/// the very start of the representable calendar.
pub fn monday_of(date: NaiveDate) -> Option<NaiveDate> {
    let from_sunday = date.weekday().num_days_from_sunday() as i64;
    let back = if from_sunday == 0 { 6 } else { from_sunday - 1 };
    date.checked_sub_signed(Duration::days(back))
}

/// Week number of the week starting on `monday`.
///
/// Days since January 1st of the Monday's year plus January 1st's weekday
/// (Sunday = 0), divided by seven and rounded up.
pub fn week_number(monday: NaiveDate) -> u32 {
    let Some(jan1) = NaiveDate::from_ymd_opt(monday.year(), 1, 1) else {
        return 1;
    };
    let elapsed = (monday - jan1).num_days();
    let lead = jan1.weekday().num_days_from_sunday() as i64;
    let total = elapsed + lead;
    ((total + 6) / 7).max(1) as u32
}

/// One task shown in one weekday column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub recurring: bool,
    /// Calendar date of the column
    pub date: NaiveDate,
    /// Completion of this particular occurrence
    pub done: bool,
}

/// A weekday column of the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    pub day: WeekDay,
    pub date: NaiveDate,
    pub is_today: bool,
    pub placements: Vec<Placement>,
}

/// Tasks placed into the columns of one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyProjection {
    pub window: WeekWindow,
    pub columns: Vec<DayColumn>,
}

impl WeeklyProjection {
    pub fn column(&self, day: WeekDay) -> &DayColumn {
        &self.columns[day.column()]
    }

    /// Find where a task appears this week.
    pub fn find(&self, id: &TaskId) -> Vec<(WeekDay, &Placement)> {
        self.columns
            .iter()
            .flat_map(|c| c.placements.iter().map(move |p| (c.day, p)))
            .filter(|(_, p)| &p.id == id)
            .collect()
    }

    pub fn placement_count(&self) -> usize {
        self.columns.iter().map(|c| c.placements.len()).sum()
    }
}

/// Column a task belongs to in `window`, if any.
pub fn column_for(task: &Task, window: &WeekWindow) -> Option<WeekDay> {
    match &task.schedule {
        Schedule::None => None,
        Schedule::Once { date } => window.column_of(*date),
        Schedule::Recurring { week_day, .. } => Some(*week_day),
    }
}

/// Whether the placement of `task` on `date` is done.
///
/// Recurring tasks look up the occurrence; everything else uses the task's
/// own flag.
pub fn done_on(task: &Task, date: NaiveDate) -> bool {
    match &task.schedule {
        Schedule::Recurring { .. } => task.schedule.occurrence_completed(date),
        _ => task.completed,
    }
}

/// Place `tasks` into the week `offset` weeks away from `today`.
pub fn project(tasks: &[Task], today: NaiveDate, offset: i64) -> Result<WeeklyProjection> {
    Ok(project_window(tasks, WeekWindow::for_offset(today, offset)?))
}

/// Place `tasks` into an already computed week.
pub fn project_window(tasks: &[Task], window: WeekWindow) -> WeeklyProjection {
    let mut columns: Vec<DayColumn> = WeekDay::ALL
        .into_iter()
        .map(|day| DayColumn {
            day,
            date: window.date_of(day),
            is_today: window.today == Some(day),
            placements: Vec::new(),
        })
        .collect();

    for task in tasks {
        let Some(day) = column_for(task, &window) else {
            continue;
        };
        let column = &mut columns[day.column()];
        column.placements.push(Placement {
            id: task.id.clone(),
            text: task.text.clone(),
            priority: task.priority,
            recurring: task.schedule.is_recurring(),
            date: column.date,
            done: done_on(task, column.date),
        });
    }

    WeeklyProjection { window, columns }
}

/// The update that marks the occurrence of `task` on `date` as `done`.
///
/// Recurring tasks get the occurrence form so that only that date changes;
/// other tasks get a plain completion flag.
pub fn completion_update(task: &Task, date: NaiveDate, done: bool) -> TaskUpdate {
    if task.schedule.is_recurring() {
        TaskUpdate::occurrence(date, done)
    } else {
        TaskUpdate::new().with_completed(done)
    }
}
