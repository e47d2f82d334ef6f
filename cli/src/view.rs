use plandate_core::{Category, MonthGrid, Task, WeekGroup};
use tabled::builder::Builder;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

const CELL_TITLE_WIDTH: usize = 12;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    category: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Done")]
    done: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        TaskRow {
            id: task.short_id(),
            category: task.category.to_string(),
            date: task
                .date
                .map(|d| d.format("%a %d %b %Y").to_string())
                .unwrap_or_else(|| "-".to_string()),
            title: task.title.clone(),
            done: if task.done { "x".to_string() } else { String::new() },
        }
    }
}

fn styled(rows: Vec<TaskRow>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks yet.".to_string();
    }
    styled(tasks.iter().map(TaskRow::from).collect())
}

pub fn render_chores(chores: &[Task], remaining: usize) -> String {
    if chores.is_empty() {
        return "No chores yet.".to_string();
    }
    format!(
        "{}\n{} remaining",
        styled(chores.iter().map(TaskRow::from).collect()),
        remaining
    )
}

pub fn render_weeks(groups: &[WeekGroup]) -> String {
    if groups.is_empty() {
        return "No scheduled tasks yet. Add a task with a date!".to_string();
    }
    groups
        .iter()
        .map(|group| {
            let header = format!(
                "\x1b[1;36m{}\x1b[0m ({})",
                group.label,
                group.week_start.format("%Y-%m-%d")
            );
            let rows = group.tasks.iter().map(TaskRow::from).collect();
            format!("{}\n{}", header, styled(rows))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn cell_text(day: u32, in_month: bool, is_today: bool, tasks: &[Task]) -> String {
    let mut lines = vec![match (in_month, is_today) {
        (_, true) => format!("[{}]", day),
        (true, false) => day.to_string(),
        (false, false) => format!("({})", day),
    }];
    for task in tasks.iter().filter(|t| t.category == Category::Scheduled) {
        lines.push(task.title.chars().take(CELL_TITLE_WIDTH).collect());
    }
    lines.join("\n")
}

pub fn render_month(grid: &MonthGrid) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    for week in grid.weeks() {
        builder.push_record(
            week.iter().map(|c| cell_text(c.day, c.in_month, c.is_today, &c.tasks)),
        );
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    let (prev_year, prev_month) = grid.previous();
    let (next_year, next_month) = grid.next();
    format!(
        "\x1b[1;36m{}\x1b[0m\n{}\n< {}-{:02}   {}-{:02} >",
        grid.title(),
        table,
        prev_year,
        prev_month,
        next_year,
        next_month
    )
}
