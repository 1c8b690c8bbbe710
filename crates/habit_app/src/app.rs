//! Command-line front end for the habit engine.
//!
//! Stands in for the card UI: each subcommand is one user action, the
//! `--offset` flag is the calendar strip (viewing date = today + offset).

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Local, NaiveDate, NaiveTime, Weekday};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use habit_core::habit::RecurrencePolicy;
use habit_core::service::{HabitService, HabitSnapshot};
use habit_core::stats::RateOptions;
use habit_core::store::JsonFileStore;

/// Track habits from the terminal.
#[derive(Debug, Parser)]
#[command(name = "habits")]
pub struct Cli {
    /// Path to the habits file (default: $HABITS_FILE or ~/.habits.json).
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// View a nearby day instead of today, e.g. -1 for yesterday.
    #[arg(long, global = true, default_value_t = 0, allow_hyphen_values = true)]
    offset: i64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every habit with its status, streak and completion rate.
    List {
        /// Cap completion rates at 100%.
        #[arg(long)]
        clamp: bool,
    },
    /// Create a habit (daily by default).
    Add {
        #[arg(long)]
        name: Option<String>,
    },
    /// Mark the habit complete for the viewing day, or undo today's mark.
    Done { id: String },
    Rename {
        id: String,
        name: String,
    },
    /// Set the reminder time (HH:MM, cosmetic only).
    Remind {
        id: String,
        time: String,
    },
    /// Replace the recurrence policy.
    Policy {
        id: String,
        policy: PolicyKind,
    },
    /// Toggle a tracked weekday on a weekly habit.
    Day {
        id: String,
        weekday: String,
    },
    /// Delete a habit.
    Rm { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    Daily,
    Weekly,
    None,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let path = resolve_store_path(cli.file)?;
    debug!(path = %path.display(), offset = cli.offset, "opening habit store");

    let clamp = matches!(cli.command, Command::List { clamp: true });
    let service = HabitService::builder()
        .with_store(Box::new(JsonFileStore::new(&path)))
        .with_rate_options(RateOptions {
            clamp_overcompletion: clamp,
        })
        .build()
        .with_context(|| format!("opening habit store at {}", path.display()))?;

    let viewing = Local::now().date_naive() + Duration::days(cli.offset);

    match cli.command {
        Command::List { .. } => list(&service, viewing)?,
        Command::Add { name } => {
            let id = service.create_habit(viewing)?;
            if let Some(name) = name {
                service.rename(&id, &name)?;
            }
            println!("{id}");
        }
        Command::Done { id } => {
            let satisfied = service.toggle_completion(&id, viewing)?;
            println!("{}", if satisfied { "completed" } else { "unfinished" });
        }
        Command::Rename { id, name } => service.rename(&id, &name)?,
        Command::Remind { id, time } => {
            let time = NaiveTime::parse_from_str(&time, "%H:%M")
                .with_context(|| format!("invalid reminder time: {time}"))?;
            service.set_reminder(&id, time)?;
        }
        Command::Policy { id, policy } => {
            let policy = match policy {
                PolicyKind::Daily => RecurrencePolicy::Daily,
                PolicyKind::Weekly => RecurrencePolicy::Weekly { days: Vec::new() },
                PolicyKind::None => RecurrencePolicy::None,
            };
            service.set_policy(&id, policy, viewing)?;
        }
        Command::Day { id, weekday } => {
            let weekday: Weekday = weekday
                .parse()
                .map_err(|_| anyhow!("unrecognized weekday: {weekday}"))?;
            service.toggle_weekday(&id, weekday, viewing)?;
        }
        Command::Rm { id } => service.delete_habit(&id)?,
    }
    Ok(())
}

fn list(service: &HabitService, viewing: NaiveDate) -> Result<()> {
    let views = service.snapshot(viewing)?;
    if views.is_empty() {
        println!("No habits yet. Try `habits add --name \"Meditate\"`.");
        return Ok(());
    }
    println!("Habits for {}", viewing.format("%A, %B %-d"));
    for view in views {
        println!("{}", format_card(&view));
    }
    Ok(())
}

fn format_card(view: &HabitSnapshot) -> String {
    let mark = if view.satisfied { 'x' } else { ' ' };
    let mut line = format!(
        "[{mark}] {}  {}  {}  {}",
        view.id,
        view.name,
        format_reminder(view.reminder_time),
        describe_policy(&view.recurrence),
    );
    if let Some(streak) = view.streak {
        line.push_str(&format!("  🌀{streak}"));
    }
    line.push_str(&format!("  {}%", view.percent));
    line
}

/// 12-hour rendering of the stored wall-clock reminder, e.g. "10:00 AM".
fn format_reminder(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

fn describe_policy(policy: &RecurrencePolicy) -> String {
    match policy {
        RecurrencePolicy::Daily => "daily".to_string(),
        RecurrencePolicy::Weekly { days } if days.is_empty() => "weekly (no days)".to_string(),
        RecurrencePolicy::Weekly { days } => {
            let names: Vec<String> = days.iter().map(|d| d.to_string()).collect();
            format!("weekly ({})", names.join(", "))
        }
        RecurrencePolicy::None => "none".to_string(),
    }
}

fn resolve_store_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Ok(path) = std::env::var("HABITS_FILE") {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(".habits.json"))
        .ok_or_else(|| anyhow!("no home directory; pass --file or set HABITS_FILE"))
}
