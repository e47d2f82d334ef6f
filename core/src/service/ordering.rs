use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::TaskError;
use crate::model::task::Task;

/// Listing order for every task view.
///
/// Dated tasks first, earliest day first; same-day tasks by creation time,
/// then id. Undated tasks after them, newest first.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    match (a.date, b.date) {
        (Some(da), Some(db)) => da
            .cmp(&db)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b
            .created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id)),
    }
}

pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoreSort {
    #[default]
    Name,
    // Open chores first
    Status,
}

impl FromStr for ChoreSort {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" | "n" => Ok(ChoreSort::Name),
            "status" | "done" | "s" => Ok(ChoreSort::Status),
            other => Err(TaskError::invalid(format!("unknown chore sort '{}'", other))),
        }
    }
}

pub fn sort_chores(chores: &mut [Task], sort: ChoreSort) {
    match sort {
        ChoreSort::Name => chores.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| compare_tasks(a, b))
        }),
        ChoreSort::Status => {
            chores.sort_by(|a, b| a.done.cmp(&b.done).then_with(|| compare_tasks(a, b)))
        }
    }
}
