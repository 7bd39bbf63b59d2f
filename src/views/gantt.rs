//! Gantt view-controller: per-project progress bars.

use std::cell::RefCell;
use std::rc::Rc;

use crate::Result;
use crate::models::Task;
use crate::rollup::{self, ProjectProgress};
use crate::store::{Observer, SharedState, with_state_mut};

pub struct GanttView {
    rows: RefCell<Vec<ProjectProgress>>,
}

impl GanttView {
    pub fn attach(store: &SharedState) -> Result<Rc<Self>> {
        let view = Rc::new(Self {
            rows: RefCell::new(Vec::new()),
        });
        with_state_mut(store, |state| {
            view.render(state.tasks());
            state.subscribe_rc(&view);
            Ok(())
        })?;
        Ok(view)
    }

    pub fn rows(&self) -> Vec<ProjectProgress> {
        self.rows.borrow().clone()
    }

    fn render(&self, tasks: &[Task]) {
        *self.rows.borrow_mut() = rollup::project_progress(tasks);
    }
}

impl Observer for GanttView {
    fn update(&self, tasks: &[Task]) -> Result<()> {
        self.render(tasks);
        Ok(())
    }
}
