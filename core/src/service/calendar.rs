use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::TaskError;
use crate::model::task::Task;
use crate::service::dto::{CalendarCell, MonthGrid};
use crate::time::first_of_month;

pub const GRID_CELLS: usize = 42;

/// Lays `tasks` out on a 6x7 Monday-first grid for `year`-`month`.
///
/// Only dated tasks show up; a task lands on the cell whose day equals its
/// date.
pub fn build_month(
    year: i32,
    month: u32,
    tasks: &[Task],
    today: NaiveDate,
) -> Result<MonthGrid, TaskError> {
    if !(1..=9999).contains(&year) {
        return Err(TaskError::invalid(format!("year {} out of range", year)));
    }
    let first = first_of_month(year, month)
        .ok_or_else(|| TaskError::invalid(format!("month {} out of range", month)))?;

    // Monday = 0 leading cells, Sunday = 6
    let leading = first.weekday().num_days_from_monday() as i64;
    let grid_start = first - Duration::days(leading);

    let mut tasks_by_day: HashMap<NaiveDate, Vec<Task>> = HashMap::new();
    for task in tasks {
        if let Some(date) = task.date {
            tasks_by_day.entry(date).or_default().push(task.clone());
        }
    }

    let cells = (0..GRID_CELLS as i64)
        .map(|offset| {
            let date = grid_start + Duration::days(offset);
            CalendarCell {
                date,
                day: date.day(),
                in_month: date.year() == year && date.month() == month,
                is_today: date == today,
                tasks: tasks_by_day.remove(&date).unwrap_or_default(),
            }
        })
        .collect();

    Ok(MonthGrid { year, month, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Category, TaskDraft};
    use crate::time::days_in_month;
    use chrono::Utc;
    use uuid::Uuid;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(title: &str, category: Category, date: Option<NaiveDate>) -> Task {
        let draft = TaskDraft {
            category,
            title: title.to_string(),
            date,
            original_text: title.to_string(),
        };
        Task::from_draft(Uuid::new_v4(), draft, Utc::now())
    }

    #[test]
    fn test_october_2023_layout() {
        // 1 Oct 2023 is a Sunday: six days of September lead
        let grid = build_month(2023, 10, &[], ymd(2023, 10, 25)).unwrap();

        assert_eq!(grid.cells.len(), GRID_CELLS);
        assert_eq!(grid.cells[0].date, ymd(2023, 9, 25));
        assert!(!grid.cells[5].in_month);
        assert_eq!(grid.cells[6].date, ymd(2023, 10, 1));
        assert!(grid.cells[6].in_month);
        assert_eq!(grid.cells[41].date, ymd(2023, 11, 5));
        assert_eq!(grid.cells.iter().filter(|c| c.in_month).count(), 31);
        assert_eq!(grid.title(), "October 2023");
    }

    #[test]
    fn test_month_starting_on_monday_has_no_leading_padding() {
        // 1 May 2023 is a Monday
        let grid = build_month(2023, 5, &[], ymd(2023, 10, 25)).unwrap();
        assert_eq!(grid.cells[0].date, ymd(2023, 5, 1));
        assert_eq!(grid.cells[0].day, 1);
        assert!(grid.cells[0].in_month);
    }

    #[test]
    fn test_february_in_leap_and_common_years() {
        for year in [2023, 2024, 2026] {
            let grid = build_month(year, 2, &[], ymd(2023, 1, 1)).unwrap();
            assert_eq!(grid.cells.len(), GRID_CELLS);
            let in_month = grid.cells.iter().filter(|c| c.in_month).count() as u32;
            assert_eq!(Some(in_month), days_in_month(year, 2));
        }
    }

    #[test]
    fn test_today_flag_is_exact_day() {
        let grid = build_month(2023, 10, &[], ymd(2023, 10, 25)).unwrap();
        let todays: Vec<_> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, ymd(2023, 10, 25));

        // Today outside the shown month is not flagged
        let grid = build_month(2023, 12, &[], ymd(2023, 10, 25)).unwrap();
        assert!(grid.cells.iter().all(|c| !c.is_today));
    }

    #[test]
    fn test_tasks_placed_on_their_day() {
        let tasks = vec![
            task("party", Category::Scheduled, Some(ymd(2023, 10, 31))),
            task("spill-over", Category::Scheduled, Some(ymd(2023, 11, 2))),
            task("undated", Category::Scheduled, None),
            task("chore", Category::Chore, None),
            task("next year", Category::Scheduled, Some(ymd(2024, 10, 31))),
        ];
        let grid = build_month(2023, 10, &tasks, ymd(2023, 10, 25)).unwrap();

        let party = grid.cell(ymd(2023, 10, 31)).unwrap();
        assert_eq!(party.tasks.len(), 1);
        assert_eq!(party.tasks[0].title, "party");

        // Trailing November cells still show their tasks
        let spill = grid.cell(ymd(2023, 11, 2)).unwrap();
        assert!(!spill.in_month);
        assert_eq!(spill.tasks[0].title, "spill-over");

        let placed: usize = grid.cells.iter().map(|c| c.tasks.len()).sum();
        assert_eq!(placed, 2);
    }

    #[test]
    fn test_weeks_and_navigation() {
        let grid = build_month(2024, 1, &[], ymd(2024, 1, 10)).unwrap();
        assert_eq!(grid.weeks().count(), 6);
        assert!(grid.weeks().all(|w| w.len() == 7));
        assert_eq!(grid.previous(), (2023, 12));
        assert_eq!(grid.next(), (2024, 2));
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            build_month(2023, 13, &[], ymd(2023, 1, 1)),
            Err(TaskError::InvalidInput(_))
        ));
        assert!(matches!(
            build_month(2023, 0, &[], ymd(2023, 1, 1)),
            Err(TaskError::InvalidInput(_))
        ));
    }
}
