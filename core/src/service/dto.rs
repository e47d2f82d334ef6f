use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::task::Task;
use crate::time::{first_of_month, shift_month};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekLabel {
    ThisWeek,
    NextWeek,
    // Monday of the week
    WeekOf(NaiveDate),
}

impl WeekLabel {
    /// Named buckets come before dated ones.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            WeekLabel::ThisWeek => 0,
            WeekLabel::NextWeek => 1,
            WeekLabel::WeekOf(_) => 2,
        }
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekLabel::ThisWeek => write!(f, "This Week"),
            WeekLabel::NextWeek => write!(f, "Next Week"),
            WeekLabel::WeekOf(monday) => write!(f, "Week of {}", monday.format("%-d %b")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeekGroup {
    pub label: WeekLabel,
    pub week_start: NaiveDate,
    pub tasks: Vec<Task>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub tasks: Vec<Task>,
}

/// Six Monday-first weeks covering one month, padded with the neighbouring
/// months' days.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// e.g. "October 2023"
    pub fn title(&self) -> String {
        first_of_month(self.year, self.month)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{:04}-{:02}", self.year, self.month))
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }

    pub fn previous(&self) -> (i32, u32) {
        shift_month(self.year, self.month, -1)
    }

    pub fn next(&self) -> (i32, u32) {
        shift_month(self.year, self.month, 1)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.date == date)
    }
}
