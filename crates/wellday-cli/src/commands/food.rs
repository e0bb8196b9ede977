//! Food diary commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use wellday_core::{DateKey, FoodItem, Meal};

use super::{day_or_today, open_tracker, print_json, CliResult};

#[derive(Args)]
pub struct DayArg {
    /// Day to work on (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<DateKey>,
}

#[derive(Subcommand)]
pub enum FoodAction {
    /// Show a day's meals and totals
    Show {
        #[command(flatten)]
        day: DayArg,
    },
    /// Add a food item to a meal
    Add {
        /// breakfast, lunch or dinner
        meal: Meal,
        /// Item name; looked up in the product catalog when no amounts are given
        name: String,
        #[arg(long)]
        calories: Option<f64>,
        #[arg(long)]
        proteins: Option<f64>,
        #[arg(long)]
        fats: Option<f64>,
        #[arg(long)]
        carbs: Option<f64>,
        #[command(flatten)]
        day: DayArg,
    },
    /// Remove the item at a position (0-based) from a meal
    Remove {
        meal: Meal,
        index: usize,
        #[command(flatten)]
        day: DayArg,
    },
    /// Calories for the days ending at --date
    Series {
        /// Number of days
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[command(flatten)]
        day: DayArg,
    },
}

#[derive(Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

/// `days` consecutive dates ending at `end`, oldest first.
pub fn window(end: DateKey, days: u32) -> Vec<DateKey> {
    (0..i64::from(days))
        .rev()
        .filter_map(|back| end.offset(-back))
        .collect()
}

pub fn series_points(dates: &[DateKey], values: Vec<f64>) -> Vec<SeriesPoint> {
    dates
        .iter()
        .zip(values)
        .map(|(date, value)| SeriesPoint {
            date: date.to_string(),
            value,
        })
        .collect()
}

pub fn run(action: FoodAction) -> CliResult {
    let mut tracker = open_tracker()?;

    match action {
        FoodAction::Show { day } => {
            let current = tracker.select_meal_day(day_or_today(day.date))?;
            print_json(current)?;
        }
        FoodAction::Add {
            meal,
            name,
            calories,
            proteins,
            fats,
            carbs,
            day,
        } => {
            let given = [calories, proteins, fats, carbs];
            let item = if given.iter().all(Option::is_none) {
                tracker
                    .products()
                    .find(&name)
                    .cloned()
                    .ok_or_else(|| format!("no product named '{name}'; pass --calories etc."))?
            } else {
                FoodItem::new(
                    name,
                    calories.unwrap_or_default(),
                    proteins.unwrap_or_default(),
                    fats.unwrap_or_default(),
                    carbs.unwrap_or_default(),
                )
            };
            tracker.select_meal_day(day_or_today(day.date))?;
            tracker.add_food(meal, item)?;
            if let Some(current) = tracker.meals().current() {
                print_json(current)?;
            }
        }
        FoodAction::Remove { meal, index, day } => {
            tracker.select_meal_day(day_or_today(day.date))?;
            match tracker.remove_food(meal, index)? {
                Some(item) => print_json(&item)?,
                None => return Err(format!("no {meal} item at position {index}").into()),
            }
        }
        FoodAction::Series { days, day } => {
            let dates = window(day_or_today(day.date), days);
            let values = tracker.calorie_series(&dates);
            print_json(&series_points(&dates, values))?;
        }
    }
    Ok(())
}
