//! View-controllers for the dashboard widgets.
//!
//! Every task-driven view is handed the same [`SharedState`] and subscribes
//! itself on attach. Views keep a render model that is rebuilt from the task
//! slice passed to `update()`; they never read each other's state. The
//! weather card is independent of the store.

pub mod gantt;
pub mod planner;
pub mod todo;
pub mod weather;

pub use gantt::GanttView;
pub use planner::WeeklyPlanner;
pub use todo::{ScheduleChoice, TodoItem, TodoListing, TodoView};
pub use weather::{WeatherCard, WeatherCardState};

use std::rc::Rc;

use chrono::NaiveDate;

use crate::Result;
use crate::store::{AppState, SharedState};

/// The task-driven widgets wired to one store.
pub struct Dashboard {
    pub store: SharedState,
    pub todo: Rc<TodoView>,
    pub planner: Rc<WeeklyPlanner>,
    pub gantt: Rc<GanttView>,
}

impl Dashboard {
    /// Load `state` and attach every view, the planner showing the week
    /// `offset` weeks away from `today`.
    pub fn open(state: AppState, today: NaiveDate, offset: i64) -> Result<Self> {
        let store = state.into_shared();
        let todo = TodoView::attach(&store)?;
        let planner = WeeklyPlanner::attach_at(&store, today, offset)?;
        let gantt = GanttView::attach(&store)?;
        tracing::debug!(
            tasks = store.borrow().len(),
            subscribers = store.borrow().subscriber_count(),
            "dashboard attached"
        );
        Ok(Self {
            store,
            todo,
            planner,
            gantt,
        })
    }
}
