//! CLI argument definitions for Hygge.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{Priority, WeekDay};
use crate::schedule::MAX_WEEK_OFFSET;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("HYGGE_GIT_COMMIT"),
    ", built ",
    env!("HYGGE_BUILD_TIMESTAMP"),
    ")"
);

/// Hygge - a cosy personal dashboard in your terminal.
///
/// Todo list, weekly planner, project progress and weather, all backed by
/// one shared task store.
#[derive(Parser, Debug)]
#[command(name = "hygge")]
#[command(author, version, long_version = LONG_VERSION, about = "A cosy personal dashboard: todos, weekly planner, project progress and weather", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding the task store.
    /// Can also be set via HYGGE_DATA_DIR environment variable.
    #[arg(long = "data-dir", global = true, env = "HYGGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to config.kdl.
    /// Can also be set via HYGGE_CONFIG environment variable.
    #[arg(long = "config", global = true, env = "HYGGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Todo list commands
    Todo {
        #[command(subcommand)]
        command: TodoCommands,
    },

    /// Weekly planner commands
    Week {
        #[command(subcommand)]
        command: WeekCommands,
    },

    /// Show average progress of open tasks per project
    Gantt,

    /// Show the current weather
    Weather {
        /// City to look up (defaults to weather.default-city, then Taoyuan)
        #[arg(long)]
        city: Option<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Run the weather API proxy
    ///
    /// Reads WEATHER_API_KEY, PORT and WEATHER_UPSTREAM_URL from the environment.
    #[cfg(feature = "proxy")]
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Todo list subcommands
#[derive(Subcommand, Debug)]
pub enum TodoCommands {
    /// Add a task
    Add {
        /// Task text
        text: String,

        /// Priority (high, medium, low, none)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Project label shown in the Gantt view
        #[arg(long)]
        project: Option<String>,

        /// Progress percentage (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,
    },

    /// List all tasks
    List,

    /// Toggle a task between done and not done
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// Remove every completed task (weekly tasks are kept)
    ClearCompleted,

    /// Update a task
    Update {
        /// Task ID
        id: String,

        /// New text
        #[arg(long)]
        text: Option<String>,

        /// New priority (high, medium, low, none)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Assign to a project
        #[arg(long, conflicts_with = "no_project")]
        project: Option<String>,

        /// Remove the project label
        #[arg(long)]
        no_project: bool,

        /// Progress percentage (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,

        /// Schedule once on a date (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["weekly", "unscheduled"])]
        once: Option<NaiveDate>,

        /// Repeat every week on a day (mon..sun)
        #[arg(long, conflicts_with = "unscheduled")]
        weekly: Option<WeekDay>,

        /// Remove the schedule
        #[arg(long)]
        unscheduled: bool,
    },
}

/// Weekly planner subcommands
#[derive(Subcommand, Debug)]
pub enum WeekCommands {
    /// Show the tasks of one week
    Show {
        /// Weeks from the current week (-1 = last week)
        #[arg(
            long,
            default_value_t = 0,
            allow_hyphen_values = true,
            value_parser = clap::value_parser!(i64).range(-MAX_WEEK_OFFSET..=MAX_WEEK_OFFSET)
        )]
        offset: i64,

        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Toggle the occurrence of a task on one day of the shown week
    Toggle {
        /// Task ID
        id: String,

        /// Day column (mon..sun)
        day: WeekDay,

        /// Weeks from the current week (-1 = last week)
        #[arg(
            long,
            default_value_t = 0,
            allow_hyphen_values = true,
            value_parser = clap::value_parser!(i64).range(-MAX_WEEK_OFFSET..=MAX_WEEK_OFFSET)
        )]
        offset: i64,

        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective weather configuration and where it comes from
    Show,
}
