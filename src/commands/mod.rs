//! Command implementations for the Hygge CLI.
//!
//! Each command opens the store (or config), drives the same views the
//! dashboard uses and returns a result that prints as JSON or, with `-H`,
//! as human-readable text. Commands are grouped by widget:
//! - `todo_*` - the todo list
//! - `week_*` - the weekly planner
//! - `gantt` - project progress
//! - `weather` - the weather card
//! - `config_show` - effective configuration

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{self, HyggeConfig, resolver};
use crate::models::{Priority, TaskId, TaskUpdate, WeekDay, format_date};
use crate::rollup::ProjectProgress;
use crate::schedule::WeeklyProjection;
use crate::storage;
use crate::store::AppState;
use crate::views::{
    Dashboard, TodoItem, TodoListing, WeatherCard, WeatherCardState, WeeklyPlanner,
};
use crate::weather::WeatherReport;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// Open the task store in `data_dir` (or the resolved default).
pub fn open_store(data_dir: Option<&Path>) -> Result<AppState> {
    let backend = storage::open_backend(data_dir)?;
    let state = AppState::open(Box::new(backend));
    tracing::debug!(location = %state.location(), tasks = state.len(), "opened task store");
    Ok(state)
}

fn open_dashboard(data_dir: Option<&Path>, today: NaiveDate, offset: i64) -> Result<Dashboard> {
    Dashboard::open(open_store(data_dir)?, today, offset)
}

// === Todo list ===

/// Options accepted by `todo add` besides the text.
#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub priority: Option<Priority>,
    pub project: Option<String>,
    pub progress: Option<u8>,
}

#[derive(Serialize)]
pub struct TodoAdded {
    pub id: TaskId,
    pub text: String,
}

impl Output for TodoAdded {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Added {} \"{}\"", self.id, self.text)
    }
}

pub fn todo_add(data_dir: Option<&Path>, text: &str, options: NewTodo) -> Result<TodoAdded> {
    let dashboard = open_dashboard(data_dir, today(), 0)?;
    let id = dashboard.todo.add(text)?;

    let mut update = TaskUpdate::new();
    if let Some(priority) = options.priority {
        update = update.with_priority(priority);
    }
    if let Some(project) = options.project {
        update = update.with_project(Some(project));
    }
    if let Some(progress) = options.progress {
        update = update.with_progress(progress);
    }
    if !update.is_empty() {
        dashboard.todo.edit(&id, update)?;
    }

    Ok(TodoAdded {
        id,
        text: text.trim().to_string(),
    })
}

impl Output for TodoListing {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return "No tasks.".to_string();
        }
        let mut lines: Vec<String> = self.items.iter().map(todo_line).collect();
        lines.push(format!("{} tasks ({} active)", self.total, self.active));
        lines.join("\n")
    }
}

fn todo_line(item: &TodoItem) -> String {
    let mut line = format!(
        "[{}] {} {}",
        if item.completed { "x" } else { " " },
        item.id,
        item.text
    );
    if item.priority != Priority::None {
        line.push_str(&format!(" !{}", item.priority));
    }
    if let Some(project) = &item.project {
        line.push_str(&format!(" #{} {}%", project, item.progress));
    }
    if let Some(schedule) = &item.schedule {
        line.push_str(&format!(" @{}", schedule));
    }
    line
}

pub fn todo_list(data_dir: Option<&Path>) -> Result<TodoListing> {
    let dashboard = open_dashboard(data_dir, today(), 0)?;
    Ok(dashboard.todo.listing())
}

#[derive(Serialize)]
pub struct TodoToggled {
    pub id: TaskId,
    pub completed: bool,
}

impl Output for TodoToggled {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let state = if self.completed { "done" } else { "not done" };
        format!("Marked {} as {}", self.id, state)
    }
}

pub fn todo_toggle(data_dir: Option<&Path>, id: &str) -> Result<TodoToggled> {
    let dashboard = open_dashboard(data_dir, today(), 0)?;
    let id = TaskId::from(id);
    let completed = dashboard.todo.toggle(&id)?;
    Ok(TodoToggled { id, completed })
}

#[derive(Serialize)]
pub struct TodoDeleted {
    pub id: TaskId,
}

impl Output for TodoDeleted {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Deleted {}", self.id)
    }
}

pub fn todo_delete(data_dir: Option<&Path>, id: &str) -> Result<TodoDeleted> {
    let dashboard = open_dashboard(data_dir, today(), 0)?;
    let id = TaskId::from(id);
    dashboard.todo.delete(&id)?;
    Ok(TodoDeleted { id })
}

#[derive(Serialize)]
pub struct CompletedCleared {
    pub removed: usize,
}

impl Output for CompletedCleared {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match self.removed {
            0 => "No completed tasks to clear.".to_string(),
            1 => "Cleared 1 completed task.".to_string(),
            n => format!("Cleared {} completed tasks.", n),
        }
    }
}

pub fn todo_clear_completed(data_dir: Option<&Path>) -> Result<CompletedCleared> {
    let dashboard = open_dashboard(data_dir, today(), 0)?;
    let removed = dashboard.todo.clear_completed()?;
    Ok(CompletedCleared { removed })
}

#[derive(Serialize)]
pub struct TodoUpdated {
    pub task: TodoItem,
}

impl Output for TodoUpdated {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Updated {}", todo_line(&self.task))
    }
}

/// Apply `update` to task `id` and report the result.
pub fn todo_update(data_dir: Option<&Path>, id: &str, update: TaskUpdate) -> Result<TodoUpdated> {
    if update.is_empty() {
        return Err(Error::InvalidInput("Nothing to update".to_string()));
    }
    if let Some(text) = &update.text {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("Task text cannot be empty".to_string()));
        }
    }

    let dashboard = open_dashboard(data_dir, today(), 0)?;
    let id = TaskId::from(id);
    dashboard.todo.edit(&id, update)?;

    let task = dashboard
        .todo
        .listing()
        .items
        .into_iter()
        .find(|item| item.id == id)
        .ok_or_else(|| Error::NotFound(format!("Task {} not found", id)))?;
    Ok(TodoUpdated { task })
}

// === Weekly planner ===

impl Output for WeeklyProjection {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let window = &self.window;
        let mut lines = vec![format!(
            "Week {} ({} to {})",
            window.week_number,
            format_date(window.monday),
            format_date(window.sunday)
        )];
        for column in &self.columns {
            let marker = if column.is_today { "*" } else { " " };
            lines.push(format!("{}{} {}", marker, column.day, format_date(column.date)));
            for p in &column.placements {
                let repeat = if p.recurring { " (weekly)" } else { "" };
                lines.push(format!(
                    "    [{}] {} {}{}",
                    if p.done { "x" } else { " " },
                    p.id,
                    p.text,
                    repeat
                ));
            }
        }
        lines.join("\n")
    }
}

pub fn week_show(data_dir: Option<&Path>, today: NaiveDate, offset: i64) -> Result<WeeklyProjection> {
    let dashboard = open_dashboard(data_dir, today, offset)?;
    Ok(dashboard.planner.projection())
}

#[derive(Serialize)]
pub struct OccurrenceToggled {
    pub id: TaskId,
    pub day: WeekDay,
    pub date: NaiveDate,
    pub done: bool,
}

impl Output for OccurrenceToggled {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let state = if self.done { "done" } else { "not done" };
        format!(
            "Marked {} on {} {} as {}",
            self.id,
            self.day,
            format_date(self.date),
            state
        )
    }
}

pub fn week_toggle(
    data_dir: Option<&Path>,
    id: &str,
    day: WeekDay,
    today: NaiveDate,
    offset: i64,
) -> Result<OccurrenceToggled> {
    let store = open_store(data_dir)?.into_shared();
    let planner = WeeklyPlanner::attach_at(&store, today, offset)?;
    let id = TaskId::from(id);
    let done = planner.toggle_occurrence(&id, day)?;
    let date = planner.projection().window.date_of(day);
    Ok(OccurrenceToggled { id, day, date, done })
}

// === Gantt ===

#[derive(Serialize)]
pub struct GanttReport {
    pub projects: Vec<ProjectProgress>,
}

/// Width of the progress bar in human output.
const BAR_WIDTH: usize = 20;

impl Output for GanttReport {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return "No open projects.".to_string();
        }
        let name_width = self
            .projects
            .iter()
            .map(|p| p.project.chars().count())
            .max()
            .unwrap_or(0);
        self.projects
            .iter()
            .map(|p| {
                let filled = usize::from(p.progress) * BAR_WIDTH / 100;
                format!(
                    "{:<width$} [{}{}] {:>3}% ({} open)",
                    p.project,
                    "#".repeat(filled),
                    ".".repeat(BAR_WIDTH - filled),
                    p.progress,
                    p.open_tasks,
                    width = name_width
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn gantt(data_dir: Option<&Path>) -> Result<GanttReport> {
    let dashboard = open_dashboard(data_dir, today(), 0)?;
    Ok(GanttReport {
        projects: dashboard.gantt.rows(),
    })
}

// === Weather ===

#[derive(Serialize)]
pub struct WeatherShown {
    #[serde(flatten)]
    pub report: WeatherReport,
}

impl Output for WeatherShown {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let r = &self.report;
        format!(
            "{}: {} ({})\nTemperature: {:.1}°C (feels like {:.1}°C)\nHumidity: {}%  Pressure: {} hPa  Wind: {:.1} m/s",
            r.city,
            r.condition,
            r.description,
            r.temperature,
            r.feels_like,
            r.humidity,
            r.pressure,
            r.wind_speed
        )
    }
}

/// Refresh the weather card once.
///
/// Card failures surface as errors here so the CLI can exit non-zero.
pub fn weather(config_path: Option<&Path>, city: Option<&str>) -> Result<WeatherShown> {
    let config = load(config_path)?;
    let mut card = WeatherCard::from_config(&config, city);
    match card.refresh(city) {
        WeatherCardState::Loaded { report } => Ok(WeatherShown {
            report: report.clone(),
        }),
        WeatherCardState::Failed { message } => {
            Err(Error::Other(format!("Weather request failed: {}", message)))
        }
        WeatherCardState::ConfigError { message } => Err(Error::Config(message.clone())),
        WeatherCardState::Idle => Err(Error::Other("Weather card did not refresh".to_string())),
    }
}

// === Config ===

#[derive(Serialize)]
pub struct ConfigShown {
    pub path: String,
    pub exists: bool,
    pub api_url: Option<String>,
    pub api_url_source: Option<String>,
    pub default_city: String,
    pub default_city_source: String,
}

impl Output for ConfigShown {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Config file: {}{}",
            self.path,
            if self.exists { "" } else { " (not found)" }
        )];
        match (&self.api_url, &self.api_url_source) {
            (Some(url), Some(source)) => lines.push(format!("weather.api-url: {} ({})", url, source)),
            _ => lines.push("weather.api-url: (not set)".to_string()),
        }
        lines.push(format!(
            "weather.default-city: {} ({})",
            self.default_city, self.default_city_source
        ));
        lines.join("\n")
    }
}

pub fn config_show(config_path: Option<&Path>) -> Result<ConfigShown> {
    let path = config::config_path(config_path)?;
    let config = config::load_config(&path)?;

    let (default_city, default_city_source) = match &config.weather.default_city {
        Some(city) => (city.clone(), config::ValueSource::ConfigFile),
        None => (config::DEFAULT_CITY.to_string(), config::ValueSource::Default),
    };
    let (api_url, api_url_source) = match resolver::resolve_weather(&config, None) {
        Ok(resolved) => (
            Some(resolved.api_url.value),
            Some(resolved.api_url.source.to_string()),
        ),
        Err(_) => (None, None),
    };

    Ok(ConfigShown {
        path: path.display().to_string(),
        exists: path.exists(),
        api_url,
        api_url_source,
        default_city,
        default_city_source: default_city_source.to_string(),
    })
}

fn load(config_path: Option<&Path>) -> Result<HyggeConfig> {
    let path = config::config_path(config_path)?;
    config::load_config(&path)
}

/// The current local date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
