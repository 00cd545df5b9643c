//! TaskDeck command-line front end.
//!
//! # Responsibility
//! - Parse CLI arguments into core `Command`s and dispatch them.
//! - Print the relevant part of the resulting view model as text or JSON.

mod render;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::error;
use std::error::Error;
use std::path::PathBuf;
use taskdeck_core::db::open_db;
use taskdeck_core::{
    init_logging, init_stderr_logging, App, AppConfig, CalendarCursor, Command, ConfigOverrides,
    Priority, PriorityFilter, Section, SqliteKeyValueStore, StatusFilter, TaskInput, TaskPatch,
    TaskStatus, TaskStorage, TaskStore, Timeframe,
};

#[derive(Debug, Parser)]
#[command(name = "taskdeck", version, about = "Single-user task tracker")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Create a task.
    Add(AddArgs),
    /// Change fields of an existing task.
    Edit(EditArgs),
    /// Delete a task (no error if it does not exist).
    Delete { id: String },
    /// Toggle completion of a task.
    Toggle { id: String },
    /// List tasks, optionally filtered.
    List {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long, default_value = "all")]
        priority: PriorityFilter,
    },
    /// Show one task.
    Show { id: String },
    /// Totals and the most recent tasks.
    Dashboard,
    /// Month grid with due tasks.
    Calendar {
        /// Month as YYYY-MM; defaults to the current month.
        #[arg(long, value_parser = parse_month)]
        month: Option<CalendarCursor>,
        /// Highlight a date (YYYY-MM-DD).
        #[arg(long)]
        select: Option<NaiveDate>,
        /// Months to move from `--month` (negative goes back).
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        shift: i32,
    },
    /// Tasks due on a date.
    Day { date: NaiveDate },
    /// Status, priority and completion charts.
    Analytics {
        #[arg(long, default_value = "weekly")]
        timeframe: Timeframe,
    },
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "medium")]
    priority: Priority,
    #[arg(long, default_value = "pending")]
    status: TaskStatus,
    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    due: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    category: String,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    priority: Option<Priority>,
    #[arg(long)]
    status: Option<TaskStatus>,
    #[arg(long, conflicts_with = "clear_due")]
    due: Option<NaiveDate>,
    /// Remove the due date.
    #[arg(long)]
    clear_due: bool,
    #[arg(long)]
    category: Option<String>,
}

impl AddArgs {
    fn into_command(self) -> Command {
        Command::Create(TaskInput {
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            due_date: self.due,
            category: self.category,
        })
    }
}

impl EditArgs {
    fn into_command(self) -> Command {
        let due_date = if self.clear_due {
            Some(None)
        } else {
            self.due.map(Some)
        };
        Command::Edit {
            id: self.id,
            patch: TaskPatch {
                title: self.title,
                description: self.description,
                priority: self.priority,
                status: self.status,
                due_date,
                category: self.category,
            },
        }
    }
}

fn parse_month(value: &str) -> Result<CalendarCursor, String> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got `{value}`"))?;
    let year: i32 = year
        .parse()
        .map_err(|_| format!("invalid year in `{value}`"))?;
    let month: u32 = month
        .parse()
        .map_err(|_| format!("invalid month in `{value}`"))?;
    month
        .checked_sub(1)
        .and_then(|month0| CalendarCursor::new(year, month0))
        .ok_or_else(|| format!("month out of range in `{value}`"))
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        error!("event=cli_exit module=cli status=error error={}", err);
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::resolve(ConfigOverrides {
        db_path: cli.db.clone(),
        log_dir: cli.log_dir.clone(),
        log_level: cli.log_level.clone(),
        storage_key: None,
    })?;

    if let Some(dir) = config.log_dir.as_ref() {
        init_logging(config.log_level, &dir.to_string_lossy())?;
    } else if cli.log_level.is_some() {
        init_stderr_logging(config.log_level)?;
    }

    let conn = open_db(&config.db_path)?;
    let kv = SqliteKeyValueStore::try_new(&conn)?;
    let store = TaskStore::open(TaskStorage::with_key(kv, config.storage_key.clone()));
    let now = Local::now();
    let mut app = App::new(store, now.date_naive());

    let output = match cli.command {
        CliCommand::Add(args) => {
            let outcome = app.dispatch(args.into_command())?;
            render::outcome(&outcome, cli.json)?
        }
        CliCommand::Edit(args) => {
            let outcome = app.dispatch(args.into_command())?;
            render::outcome(&outcome, cli.json)?
        }
        CliCommand::Delete { id } => {
            let outcome = app.dispatch(Command::Delete(id))?;
            render::outcome(&outcome, cli.json)?
        }
        CliCommand::Toggle { id } => {
            let outcome = app.dispatch(Command::ToggleComplete(id))?;
            render::outcome(&outcome, cli.json)?
        }
        CliCommand::List { status, priority } => {
            app.dispatch(Command::SwitchSection(Section::Tasks))?;
            app.dispatch(Command::SetFilters { status, priority })?;
            render::task_list(&app.view(&now), cli.json)?
        }
        CliCommand::Show { id } => {
            let outcome = app.dispatch(Command::OpenEditor(Some(id)))?;
            render::outcome(&outcome, cli.json)?
        }
        CliCommand::Dashboard => {
            app.dispatch(Command::SwitchSection(Section::Dashboard))?;
            render::dashboard(&app.view(&now), cli.json)?
        }
        CliCommand::Calendar {
            month,
            select,
            shift,
        } => {
            app.dispatch(Command::SwitchSection(Section::Calendar))?;
            if let Some(target) = month {
                let current = app.navigation().calendar;
                let delta = (target.year() - current.year()) * 12 + target.month() as i32
                    - current.month() as i32;
                app.dispatch(Command::NavigateMonth(delta))?;
            }
            app.dispatch(Command::NavigateMonth(shift))?;
            if let Some(date) = select {
                app.dispatch(Command::SelectDate(date))?;
            }
            render::calendar(&app.view(&now), cli.json)?
        }
        CliCommand::Day { date } => {
            app.dispatch(Command::SwitchSection(Section::Calendar))?;
            app.dispatch(Command::SelectDate(date))?;
            render::day(&app.view(&now), cli.json)?
        }
        CliCommand::Analytics { timeframe } => {
            app.dispatch(Command::SwitchSection(Section::Analytics))?;
            app.dispatch(Command::SetAnalyticsTimeframe(timeframe))?;
            render::analytics(&app.view(&now), cli.json)?
        }
    };

    println!("{output}");
    if let Some(reason) = app.view(&now).unsaved {
        eprintln!("warning: changes were not saved: {reason}");
    }
    Ok(())
}
