//! Habit tracker commands.

use clap::Subcommand;
use serde::Serialize;
use wellday_core::{DayStatus, NewHabit};

use super::food::{window, DayArg};
use super::{day_or_today, open_tracker, print_json, AppTracker, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits with streaks
    List,
    /// Show one habit's summary
    Show { id: u32 },
    /// Create a habit
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Defaults to `habits.default_icon` from the config
        #[arg(long)]
        icon: Option<String>,
        /// Defaults to `habits.default_color` from the config
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a habit and its history
    Delete { id: u32 },
    /// Add a habit to the active set
    Activate { id: u32 },
    /// Remove a habit from the active set
    Deactivate { id: u32 },
    /// Make a habit the selected one
    Select { id: u32 },
    /// Mark a day clean
    Clean {
        id: u32,
        #[command(flatten)]
        day: DayArg,
    },
    /// Mark a day as a relapse
    Relapse {
        id: u32,
        #[command(flatten)]
        day: DayArg,
    },
    /// Remove the mark on a day
    Clear {
        id: u32,
        #[command(flatten)]
        day: DayArg,
    },
    /// Day statuses for the days ending at --date
    Calendar {
        id: u32,
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[command(flatten)]
        day: DayArg,
    },
}

#[derive(Serialize)]
struct CalendarDay {
    date: String,
    status: DayStatus,
}

fn unknown(id: u32) -> Box<dyn std::error::Error> {
    format!("no habit with id {id}").into()
}

fn print_summary(tracker: &AppTracker, id: u32) -> CliResult {
    let summary = tracker.habit_summary(id).ok_or_else(|| unknown(id))?;
    print_json(&summary)
}

pub fn run(action: HabitAction) -> CliResult {
    let mut tracker = open_tracker()?;

    match action {
        HabitAction::List => {
            let summaries: Vec<_> = tracker
                .habits()
                .habits()
                .iter()
                .filter_map(|h| tracker.habit_summary(h.id))
                .collect();
            print_json(&summaries)?;
        }
        HabitAction::Show { id } => print_summary(&tracker, id)?,
        HabitAction::Add {
            title,
            description,
            icon,
            color,
        } => {
            let id = tracker.add_habit(NewHabit {
                title,
                description,
                icon,
                color,
            })?;
            print_summary(&tracker, id)?;
        }
        HabitAction::Delete { id } => {
            if !tracker.delete_habit(id)? {
                return Err(unknown(id));
            }
            println!("habit {id} deleted");
        }
        HabitAction::Activate { id } => {
            tracker.activate_habit(id)?;
            print_json(tracker.habits().active())?;
        }
        HabitAction::Deactivate { id } => {
            tracker.deactivate_habit(id)?;
            print_json(tracker.habits().active())?;
        }
        HabitAction::Select { id } => {
            if !tracker.select_habit(id)? {
                return Err(unknown(id));
            }
            print_summary(&tracker, id)?;
        }
        HabitAction::Clean { id, day } => {
            let date = day_or_today(day.date);
            if !tracker.mark_clean(id, date)? && tracker.habits().habit(id).is_some() {
                tracing::warn!(id, %date, "day already marked, clean mark ignored");
            }
            print_summary(&tracker, id)?;
        }
        HabitAction::Relapse { id, day } => {
            tracker.mark_relapse(id, day_or_today(day.date))?;
            print_summary(&tracker, id)?;
        }
        HabitAction::Clear { id, day } => {
            tracker.clear_mark(id, day_or_today(day.date))?;
            print_summary(&tracker, id)?;
        }
        HabitAction::Calendar { id, days, day } => {
            let habit = tracker.habits().habit(id).ok_or_else(|| unknown(id))?;
            let dates = window(day_or_today(day.date), days);
            let calendar: Vec<CalendarDay> = dates
                .iter()
                .zip(habit.calendar(&dates))
                .map(|(date, status)| CalendarDay {
                    date: date.to_string(),
                    status,
                })
                .collect();
            print_json(&calendar)?;
        }
    }
    Ok(())
}
