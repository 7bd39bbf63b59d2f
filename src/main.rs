//! Hygge CLI - a cosy personal dashboard in the terminal.

use clap::Parser;
use hygge::cli::{Cli, Commands, ConfigCommands, TodoCommands, WeekCommands};
use hygge::commands::{self, NewTodo, Output};
use hygge::models::{TaskType, TaskUpdate};
use std::path::Path;
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter (e.g. `debug`, `hygge=trace`).
const LOG_ENV: &str = "HYGGE_LOG";

/// Set to `json` for structured log lines.
const LOG_FORMAT_ENV: &str = "HYGGE_LOG_FORMAT";

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    init_logging();

    let result = run_command(
        cli.command,
        cli.data_dir.as_deref(),
        cli.config.as_deref(),
        human,
    );

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Install the tracing subscriber. Logs go to stderr so that stdout stays
/// parseable JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run_command(
    command: Commands,
    data_dir: Option<&Path>,
    config: Option<&Path>,
    human: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Todo { command } => match command {
            TodoCommands::Add {
                text,
                priority,
                project,
                progress,
            } => {
                let options = NewTodo {
                    priority,
                    project: project.filter(|p| !p.trim().is_empty()),
                    progress,
                };
                let result = commands::todo_add(data_dir, &text, options)?;
                output(&result, human);
            }

            TodoCommands::List => {
                let result = commands::todo_list(data_dir)?;
                output(&result, human);
            }

            TodoCommands::Toggle { id } => {
                let result = commands::todo_toggle(data_dir, &id)?;
                output(&result, human);
            }

            TodoCommands::Delete { id } => {
                let result = commands::todo_delete(data_dir, &id)?;
                output(&result, human);
            }

            TodoCommands::ClearCompleted => {
                let result = commands::todo_clear_completed(data_dir)?;
                output(&result, human);
            }

            TodoCommands::Update {
                id,
                text,
                priority,
                project,
                no_project,
                progress,
                once,
                weekly,
                unscheduled,
            } => {
                let mut update = TaskUpdate::new();
                if let Some(text) = text {
                    update = update.with_text(text.trim());
                }
                if let Some(priority) = priority {
                    update = update.with_priority(priority);
                }
                if no_project {
                    update = update.with_project(None);
                } else if let Some(project) = project {
                    update = update.with_project(Some(project));
                }
                if let Some(progress) = progress {
                    update = update.with_progress(progress);
                }
                if let Some(date) = once {
                    update = update.with_once(date);
                } else if let Some(day) = weekly {
                    update = update.with_weekly(day);
                } else if unscheduled {
                    update = update.with_task_type(TaskType::None);
                }

                let result = commands::todo_update(data_dir, &id, update)?;
                output(&result, human);
            }
        },

        Commands::Week { command } => match command {
            WeekCommands::Show { offset, today } => {
                let today = today.unwrap_or_else(commands::today);
                let result = commands::week_show(data_dir, today, offset)?;
                output(&result, human);
            }

            WeekCommands::Toggle {
                id,
                day,
                offset,
                today,
            } => {
                let today = today.unwrap_or_else(commands::today);
                let result = commands::week_toggle(data_dir, &id, day, today, offset)?;
                output(&result, human);
            }
        },

        Commands::Gantt => {
            let result = commands::gantt(data_dir)?;
            output(&result, human);
        }

        Commands::Weather { city } => {
            let result = commands::weather(config, city.as_deref())?;
            output(&result, human);
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let result = commands::config_show(config)?;
                output(&result, human);
            }
        },

        #[cfg(feature = "proxy")]
        Commands::Serve { port } => {
            run_proxy(port)?;
        }
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Run the weather proxy until Ctrl+C
#[cfg(feature = "proxy")]
fn run_proxy(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = hygge::config::resolve_proxy(port)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(hygge::proxy::start_server(settings))
}
