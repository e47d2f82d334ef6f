mod config;
mod ids;
mod store;
mod view;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use log::{debug, LevelFilter};
use plandate_core::{parse_reference, Category, ChoreSort, TaskClassifier, TaskService, TaskUpdate};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use crate::config::Config;
use crate::ids::resolve_id;
use crate::store::FileTaskRepository;

#[derive(Parser)]
#[command(name = "plandate")]
#[command(about = "Chores and dated plans from plain sentences", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a task, e.g. `add -s Dentist at 3pm Friday`
    Add {
        /// Look for a date in the text and file it as scheduled
        #[arg(short, long)]
        scheduled: bool,
        /// Resolve relative dates against this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<String>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        text: Vec<String>,
    },
    /// List every task, dated first
    List,
    /// List chores with the open count
    Chores {
        /// name | status
        #[arg(long, default_value = "name")]
        sort: ChoreSort,
    },
    /// Scheduled tasks by week
    Week,
    /// Month calendar of scheduled tasks
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Change a task's text, category or date
    Edit {
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Pin a scheduled task to a day (YYYY-MM-DD)
    Date { id: String, date: NaiveDate },
    /// Flip a task between open and done
    Toggle { id: String },
    Delete { id: String },
}

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        config.level_filter()?
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config, cli.verbose)?;

    let data_dir = config.resolve_data_dir()?;
    debug!("using data dir {}", data_dir.display());
    let repo = FileTaskRepository::new(&data_dir)?;
    let service = TaskService::with_classifier(repo, TaskClassifier::new(config.date_order));
    let today = Local::now().date_naive();

    match cli.command.unwrap_or(Commands::List) {
        Commands::Add { scheduled, at, text } => {
            let reference = at.as_deref().map(parse_reference).transpose()?;
            let category = if scheduled {
                Category::Scheduled
            } else {
                Category::Chore
            };
            let task = service.create_task(&text.join(" "), category, reference)?;
            println!("Added {}: {} (ID: {})", task.category, task.title, task.short_id());
            if let Some(date) = task.date {
                println!("  Date: {}", date.format("%a %d %b %Y"));
            }
        }
        Commands::List => {
            println!("{}", view::render_tasks(&service.list_tasks()?));
        }
        Commands::Chores { sort } => {
            let chores = service.chores(sort)?;
            println!("{}", view::render_chores(&chores, service.remaining_chores()?));
        }
        Commands::Week => {
            println!("{}", view::render_weeks(&service.week_groups(today)?));
        }
        Commands::Month { year, month } => {
            let grid = service.month_grid(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
                today,
            )?;
            println!("{}", view::render_month(&grid));
        }
        Commands::Edit {
            id,
            text,
            category,
            date,
        } => {
            let id = resolve_id(&id, &service.list_tasks()?)?;
            let update = TaskUpdate {
                text,
                category,
                date,
                done: None,
            };
            let task = service.update_task(&id, update, None)?;
            println!("{}", view::render_tasks(&[task]));
        }
        Commands::Date { id, date } => {
            let id = resolve_id(&id, &service.list_tasks()?)?;
            let task = service
                .set_date(&id, date)
                .with_context(|| format!("could not date task {}", id))?;
            println!("{}", view::render_tasks(&[task]));
        }
        Commands::Toggle { id } => {
            let id = resolve_id(&id, &service.list_tasks()?)?;
            let task = service.toggle_done(&id)?;
            let state = if task.done { "done" } else { "open" };
            println!("{} is now {}", task.title, state);
        }
        Commands::Delete { id } => {
            let id = resolve_id(&id, &service.list_tasks()?)?;
            service.delete_task(&id)?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}
