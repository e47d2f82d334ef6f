use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::model::task::Task;
use crate::service::dto::{WeekGroup, WeekLabel};
use crate::time::week_start;

/// Buckets dated tasks by the Monday-start week they fall in.
///
/// The week containing `today` is "This Week", the one after it "Next Week";
/// every other week, earlier or later, is "Week of <Monday>". Output puts the
/// two named buckets first and the rest in week order. Tasks keep their input
/// order inside a bucket, so callers pre-sort with
/// [`sort_tasks`](crate::service::ordering::sort_tasks). Undated tasks are
/// skipped.
pub fn group_by_week(tasks: &[Task], today: NaiveDate) -> Vec<WeekGroup> {
    let this_week = week_start(today);
    let next_week = this_week + Duration::days(7);

    let mut tasks_by_week: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        let Some(date) = task.date else { continue };
        tasks_by_week.entry(week_start(date)).or_default().push(task.clone());
    }

    let mut groups: Vec<WeekGroup> = tasks_by_week
        .into_iter()
        .map(|(monday, tasks)| {
            let label = if monday == this_week {
                WeekLabel::ThisWeek
            } else if monday == next_week {
                WeekLabel::NextWeek
            } else {
                WeekLabel::WeekOf(monday)
            };
            WeekGroup {
                label,
                week_start: monday,
                tasks,
            }
        })
        .collect();

    // Stable: weeks stay chronological within each rank.
    groups.sort_by_key(|g| g.label.rank());
    groups
}
