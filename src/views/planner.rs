//! Weekly planner view-controller.
//!
//! Shows one calendar week at a time. The displayed week is an offset from
//! the week containing "today"; navigating only changes the offset and
//! re-projects the last task list the store handed over.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{Local, NaiveDate};

use crate::models::{Task, TaskId, WeekDay};
use crate::schedule::{self, WeeklyProjection};
use crate::store::{Observer, SharedState, with_state_mut};
use crate::{Error, Result};

pub struct WeeklyPlanner {
    store: SharedState,
    today: NaiveDate,
    offset: Cell<i64>,
    tasks: RefCell<Vec<Task>>,
    projection: RefCell<WeeklyProjection>,
}

impl WeeklyPlanner {
    /// Attach a planner for the current local date.
    pub fn attach(store: &SharedState) -> Result<Rc<Self>> {
        Self::attach_at(store, Local::now().date_naive(), 0)
    }

    /// Attach a planner with an explicit "today" and starting offset.
    pub fn attach_at(store: &SharedState, today: NaiveDate, offset: i64) -> Result<Rc<Self>> {
        let planner = Rc::new(Self {
            store: Rc::clone(store),
            today,
            offset: Cell::new(offset),
            tasks: RefCell::new(Vec::new()),
            projection: RefCell::new(schedule::project(&[], today, offset)?),
        });
        with_state_mut(store, |state| {
            planner.render(state.tasks())?;
            state.subscribe_rc(&planner);
            Ok(())
        })?;
        Ok(planner)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn offset(&self) -> i64 {
        self.offset.get()
    }

    pub fn projection(&self) -> WeeklyProjection {
        self.projection.borrow().clone()
    }

    pub fn previous_week(&self) -> Result<()> {
        self.set_offset(self.offset.get() - 1)
    }

    pub fn next_week(&self) -> Result<()> {
        self.set_offset(self.offset.get() + 1)
    }

    pub fn this_week(&self) -> Result<()> {
        self.set_offset(0)
    }

    /// Show another week. An offset outside the calendar leaves the current
    /// week in place.
    pub fn set_offset(&self, offset: i64) -> Result<()> {
        let projection = schedule::project(&self.tasks.borrow(), self.today, offset)?;
        self.offset.set(offset);
        *self.projection.borrow_mut() = projection;
        Ok(())
    }

    /// Flip the completion of the task shown in the `day` column.
    ///
    /// Weekly tasks change only the occurrence on that column's date; one-time
    /// tasks flip their own flag. Returns the new state.
    pub fn toggle_occurrence(&self, id: &TaskId, day: WeekDay) -> Result<bool> {
        let (update, done) = {
            let projection = self.projection.borrow();
            let placement = projection
                .column(day)
                .placements
                .iter()
                .find(|p| &p.id == id)
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "Task {} is not scheduled on {} of week {}",
                        id, day, projection.window.week_number
                    ))
                })?;
            let tasks = self.tasks.borrow();
            let task = tasks
                .iter()
                .find(|t| &t.id == id)
                .ok_or_else(|| Error::NotFound(format!("Task {} not found", id)))?;
            let done = !placement.done;
            (schedule::completion_update(task, placement.date, done), done)
        };

        with_state_mut(&self.store, |state| state.update_todo(id, update))?;
        Ok(done)
    }

    fn render(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.borrow_mut() = tasks.to_vec();
        self.set_offset(self.offset.get())
    }
}

impl Observer for WeeklyPlanner {
    fn update(&self, tasks: &[Task]) -> Result<()> {
        self.render(tasks)
    }
}
