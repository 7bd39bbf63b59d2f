//! Hygge - the coordination core of a personal dashboard.
//!
//! This library provides the shared task store that the dashboard widgets
//! subscribe to, the weekly schedule projection and project rollup derived
//! from it, the widget view-controllers, and the weather proxy plumbing used
//! by the `hygge` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
#[cfg(feature = "proxy")]
pub mod proxy;
pub mod rollup;
pub mod schedule;
pub mod storage;
pub mod store;
pub mod views;
pub mod weather;

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::models::{Schedule, Task, TaskId, WeekDay};
    use crate::storage::{FileBackend, MemoryBackend};
    use crate::store::{AppState, SharedState};

    /// Shorthand for building calendar dates in tests.
    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A plain unscheduled task.
    pub fn task(id: &str, text: &str) -> Task {
        Task::new(TaskId::from(id), text.to_string())
    }

    /// A task scheduled for a single date.
    pub fn once(id: &str, text: &str, on: NaiveDate) -> Task {
        let mut t = task(id, text);
        t.schedule = Schedule::Once { date: on };
        t
    }

    /// A task repeating every week on `day`.
    pub fn weekly(id: &str, text: &str, day: WeekDay) -> Task {
        let mut t = task(id, text);
        t.schedule = Schedule::recurring(day);
        t
    }

    /// Test environment with an isolated data directory.
    pub struct TestEnv {
        pub data_dir: TempDir,
    }

    impl TestEnv {
        pub fn new() -> Self {
            Self {
                data_dir: TempDir::new().unwrap(),
            }
        }

        /// Open a file-backed store rooted in this environment.
        pub fn open_store(&self) -> AppState {
            AppState::open(Box::new(FileBackend::new(self.data_dir.path()).unwrap()))
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }

    /// A shared in-memory store seeded with `tasks`.
    pub fn shared_store(tasks: Vec<Task>) -> (SharedState, MemoryBackend) {
        let backend = MemoryBackend::new();
        let mut state = AppState::open(Box::new(backend.clone()));
        for t in tasks {
            state.insert(t).unwrap();
        }
        (state.into_shared(), backend)
    }
}

/// Library-level error type for Hygge operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store is busy notifying subscribers; mutations from update() are not allowed")]
    Reentrant,

    #[error("Weather request failed: {0}")]
    Weather(#[from] weather::WeatherError),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Hygge operations.
pub type Result<T> = std::result::Result<T, Error>;
