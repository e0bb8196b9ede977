//! Personal data commands.

use clap::{Subcommand, ValueEnum};
use wellday_core::{PersonalDataPatch, Sex};

use super::{open_tracker, print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show stored personal data
    Show,
    /// Update personal data; omitted fields keep their value
    Set {
        #[arg(long)]
        age: Option<f64>,
        /// Kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Centimeters
        #[arg(long)]
        height: Option<f64>,
        #[arg(long, value_enum)]
        sex: Option<SexArg>,
        /// Activity multiplier, 1.2 (sedentary) to 1.9 (very active)
        #[arg(long)]
        activity: Option<f64>,
    },
    /// Recalculate the daily calorie intake
    Intake,
}

pub fn run(action: ProfileAction) -> CliResult {
    let mut tracker = open_tracker()?;

    match action {
        ProfileAction::Show => print_json(tracker.profile())?,
        ProfileAction::Set {
            age,
            weight,
            height,
            sex,
            activity,
        } => {
            let profile = tracker.update_profile(PersonalDataPatch {
                age,
                weight,
                height,
                sex: sex.map(Sex::from),
                activity,
            })?;
            print_json(profile)?;
        }
        ProfileAction::Intake => {
            if tracker.profile().estimate_intake().is_none() {
                return Err("age, weight, height, sex and activity must all be set".into());
            }
            let intake = tracker.calculate_daily_intake()?;
            println!("{intake}");
        }
    }
    Ok(())
}
