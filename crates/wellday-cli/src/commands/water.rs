//! Water log commands.

use clap::Subcommand;
use serde::Serialize;
use wellday_core::WaterLog;

use super::food::{series_points, window, DayArg};
use super::{day_or_today, open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum WaterAction {
    /// Show intake against the daily goal
    Status {
        #[command(flatten)]
        day: DayArg,
    },
    /// Log a glass of water
    Add {
        /// Amount in ml, defaults to `water.glass_ml` from the config
        amount: Option<u32>,
        #[command(flatten)]
        day: DayArg,
    },
    /// Remove the glass at a position (0-based)
    Remove {
        index: usize,
        #[command(flatten)]
        day: DayArg,
    },
    /// Set the daily goal in ml
    Goal { ml: u32 },
    /// Intake for the days ending at --date
    Series {
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[command(flatten)]
        day: DayArg,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaterStatus<'a> {
    date: String,
    intake: f64,
    daily_goal: u32,
    percentage: u32,
    remaining: u32,
    glasses: &'a [wellday_core::Glass],
}

impl<'a> WaterStatus<'a> {
    fn of(log: &'a WaterLog) -> Option<Self> {
        let day = log.ledger.current()?;
        Some(Self {
            date: day.date.to_string(),
            intake: log.intake(),
            daily_goal: log.daily_goal,
            percentage: log.percentage(),
            remaining: log.remaining(),
            glasses: &day.glasses,
        })
    }
}

fn print_status(log: &WaterLog) -> CliResult {
    match WaterStatus::of(log) {
        Some(status) => print_json(&status),
        None => Err("no day selected".into()),
    }
}

pub fn run(action: WaterAction) -> CliResult {
    let mut tracker = open_tracker()?;

    match action {
        WaterAction::Status { day } => {
            tracker.select_water_day(day_or_today(day.date))?;
            print_status(tracker.water())?;
        }
        WaterAction::Add { amount, day } => {
            let amount = amount.unwrap_or(tracker.config().water.glass_ml);
            tracker.select_water_day(day_or_today(day.date))?;
            tracker.add_water(amount)?;
            print_status(tracker.water())?;
        }
        WaterAction::Remove { index, day } => {
            tracker.select_water_day(day_or_today(day.date))?;
            if tracker.remove_water(index)?.is_none() {
                return Err(format!("no glass at position {index}").into());
            }
            print_status(tracker.water())?;
        }
        WaterAction::Goal { ml } => {
            tracker.set_water_goal(ml)?;
            println!("daily goal set to {ml} ml");
        }
        WaterAction::Series { days, day } => {
            let dates = window(day_or_today(day.date), days);
            let values = tracker.water_series(&dates);
            print_json(&series_points(&dates, values))?;
        }
    }
    Ok(())
}
