//! Project rollup for the Gantt view.
//!
//! Groups open tasks by project label and averages their progress. The
//! rollup is derived from the task list every time and keeps no state.

use serde::Serialize;

use crate::models::Task;

/// Progress summary of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectProgress {
    pub project: String,
    /// Mean progress of the open tasks, rounded to the nearest integer
    pub progress: u8,
    pub open_tasks: usize,
}

/// Average progress per project over open tasks.
///
/// Completed one-time or unscheduled tasks and tasks without a project are
/// ignored (weekly tasks never complete as a whole); a project whose
/// tasks are all completed is left out. Projects are listed in order of
/// first appearance.
pub fn project_progress(tasks: &[Task]) -> Vec<ProjectProgress> {
    let mut groups: Vec<(&str, u32, usize)> = Vec::new();

    for task in tasks.iter().filter(|t| t.is_open()) {
        let Some(project) = task.project.as_deref().filter(|p| !p.trim().is_empty()) else {
            continue;
        };
        match groups.iter_mut().find(|(name, _, _)| *name == project) {
            Some((_, sum, count)) => {
                *sum += u32::from(task.progress);
                *count += 1;
            }
            None => groups.push((project, u32::from(task.progress), 1)),
        }
    }

    groups
        .into_iter()
        .map(|(project, sum, count)| ProjectProgress {
            project: project.to_string(),
            progress: rounded_mean(sum, count),
            open_tasks: count,
        })
        .collect()
}

/// Mean of `count` values summing to `sum`, rounding halves up.
fn rounded_mean(sum: u32, count: usize) -> u8 {
    let count = count as u32;
    ((sum * 2 + count) / (count * 2)).min(100) as u8
}
