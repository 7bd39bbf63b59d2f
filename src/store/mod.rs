//! The shared task store.
//!
//! [`AppState`] owns the canonical task sequence, mirrors it to a
//! [`StorageBackend`] on every mutation and then notifies every registered
//! [`Observer`] synchronously, in subscription order. Widgets never talk to
//! each other; they only read the task slice handed to `update()` and send
//! mutations back through the store.
//!
//! The store is single-threaded. Views share it through a [`SharedState`]
//! handle and mutate it with [`with_state_mut`], which refuses to run while
//! another mutation is still notifying. That keeps notification ordering
//! well defined: an observer cannot start a nested mutation from inside its
//! own `update()`.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use chrono::Utc;

use crate::models::{Schedule, Task, TaskId, TaskUpdate};
use crate::storage::{StorageBackend, TASKS_KEY};
use crate::{Error, Result};

/// A view-controller that re-derives its state after every store mutation.
pub trait Observer {
    /// Called once per mutation with the full, already-persisted task list.
    fn update(&self, tasks: &[Task]) -> Result<()>;
}

/// Handle through which views share one store.
pub type SharedState = Rc<RefCell<AppState>>;

/// Run `f` against the shared store.
///
/// Fails with [`Error::Reentrant`] when the store is already borrowed, which
/// is the case for the whole duration of a mutation and its notification
/// pass.
pub fn with_state_mut<R>(
    store: &SharedState,
    f: impl FnOnce(&mut AppState) -> Result<R>,
) -> Result<R> {
    let mut state = store.try_borrow_mut().map_err(|_| Error::Reentrant)?;
    f(&mut state)
}

/// Owner of the task sequence and its subscriber list.
pub struct AppState {
    tasks: Vec<Task>,
    backend: Box<dyn StorageBackend>,
    key: String,
    subscribers: Vec<Weak<dyn Observer>>,
    last_id: u64,
}

impl AppState {
    /// Create an empty store over `backend` without reading it.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            tasks: Vec::new(),
            backend,
            key: TASKS_KEY.to_string(),
            subscribers: Vec::new(),
            last_id: 0,
        }
    }

    /// Create a store over `backend` and load the persisted tasks.
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let mut state = Self::new(backend);
        state.load();
        state
    }

    pub fn into_shared(self) -> SharedState {
        Rc::new(RefCell::new(self))
    }

    /// The live task sequence, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of subscribers that are still alive.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    /// Where the task list is persisted, for display.
    pub fn location(&self) -> String {
        format!(
            "{}:{} ({})",
            self.backend.backend_type(),
            self.backend.location(),
            self.key
        )
    }

    /// Replace the in-memory state with the persisted task list.
    ///
    /// A missing, unreadable or malformed value yields an empty list; the
    /// problem is logged rather than returned. Inside a well-formed list,
    /// records that fail to decode are dropped one by one so the rest
    /// survive.
    pub fn load(&mut self) -> &[Task] {
        self.tasks = match self.backend.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(records) => decode_records(&self.key, records),
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "stored tasks are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not read stored tasks, starting empty");
                Vec::new()
            }
        };

        self.last_id = self
            .tasks
            .iter()
            .filter_map(|t| t.id.as_number())
            .max()
            .unwrap_or(0);

        tracing::debug!(count = self.tasks.len(), "loaded tasks");
        &self.tasks
    }

    /// Serialize the full task list, overwriting the stored value.
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks)?;
        self.backend.set(&self.key, &json)
    }

    /// Register an observer. The store only keeps a weak reference; an
    /// observer that has been dropped is skipped silently.
    pub fn subscribe(&mut self, observer: Weak<dyn Observer>) {
        self.subscribers.push(observer);
    }

    /// Convenience wrapper around [`AppState::subscribe`].
    pub fn subscribe_rc<O: Observer + 'static>(&mut self, observer: &Rc<O>) {
        let weak: Weak<O> = Rc::downgrade(observer);
        self.subscribe(weak);
    }

    /// Call `update()` on every live subscriber, in subscription order.
    ///
    /// Errors and panics are logged per subscriber and never stop the pass.
    pub fn notify_all(&self) {
        for (index, subscriber) in self.subscribers.iter().enumerate() {
            let Some(observer) = subscriber.upgrade() else {
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| observer.update(&self.tasks))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(subscriber = index, error = %e, "subscriber failed to update");
                }
                Err(_) => {
                    tracing::warn!(subscriber = index, "subscriber panicked during update");
                }
            }
        }
    }

    /// Apply `updates` to the task with `id`.
    ///
    /// Returns `Ok(false)` without touching anything when no task has that
    /// id. For a recurring task, `completed` never reaches the task itself:
    /// with a `date` it is recorded for that occurrence only, and both keys
    /// are dropped before the remaining fields are merged.
    pub fn update_todo(&mut self, id: &TaskId, updates: TaskUpdate) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!(id = %id, "update for unknown task ignored");
            return Ok(false);
        };

        let mut updates = updates;
        if let Schedule::Recurring {
            completion_records, ..
        } = &mut task.schedule
        {
            if let Some(completed) = updates.completed.take() {
                match updates.date.take() {
                    Some(date) => {
                        completion_records.insert(date, completed);
                    }
                    None => {
                        tracing::debug!(id = %id, "occurrence completion without a date ignored");
                    }
                }
            }
        }

        task.merge(updates);
        self.commit()?;
        Ok(true)
    }

    /// Create a task from user input and append it.
    pub fn add_todo(&mut self, text: &str) -> Result<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("Task text cannot be empty".to_string()));
        }

        let id = self.next_id();
        self.tasks.push(Task::new(id.clone(), text.to_string()));
        self.commit()?;
        tracing::info!(id = %id, "added task");
        Ok(id)
    }

    /// Append a fully formed task, e.g. one imported from elsewhere.
    pub fn insert(&mut self, task: Task) -> Result<()> {
        if self.get(&task.id).is_some() {
            return Err(Error::InvalidInput(format!("Task {} already exists", task.id)));
        }
        if let Some(n) = task.id.as_number() {
            self.last_id = self.last_id.max(n);
        }
        self.tasks.push(task);
        self.commit()
    }

    /// Remove the task with `id`. Returns whether a task was removed.
    pub fn delete_todo(&mut self, id: &TaskId) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        if self.tasks.len() == before {
            tracing::debug!(id = %id, "delete for unknown task ignored");
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Flip the completion flag of a non-recurring task.
    ///
    /// Returns the new state, or `None` when no task has that id. Recurring
    /// tasks are completed per occurrence and are rejected here.
    pub fn toggle_todo(&mut self, id: &TaskId) -> Result<Option<bool>> {
        let Some(task) = self.get(id) else {
            return Ok(None);
        };
        if task.schedule.is_recurring() {
            return Err(Error::InvalidInput(format!(
                "Task {} repeats weekly; complete a single occurrence from the weekly planner",
                id
            )));
        }

        let completed = !task.completed;
        self.update_todo(id, TaskUpdate::new().with_completed(completed))?;
        Ok(Some(completed))
    }

    /// Drop every completed non-recurring task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks
            .retain(|t| t.schedule.is_recurring() || !t.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.commit()?;
        }
        Ok(removed)
    }

    /// Persist, then notify. Subscribers are notified even when persisting
    /// fails so that views never lag behind the in-memory state.
    fn commit(&mut self) -> Result<()> {
        let saved = self.save();
        if let Err(e) = &saved {
            tracing::error!(error = %e, "failed to persist tasks");
        }
        self.notify_all();
        saved
    }

    /// Next creation-timestamp id, strictly greater than any issued so far.
    fn next_id(&mut self) -> TaskId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last_id = now.max(self.last_id + 1);
        TaskId::from(self.last_id)
    }
}

fn decode_records(key: &str, records: Vec<serde_json::Value>) -> Vec<Task> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Task>(record) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "dropping malformed task record");
                None
            }
        })
        .collect()
}
