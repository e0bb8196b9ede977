//! Water ledger: glasses drunk per day against a daily goal.

use serde::{Deserialize, Serialize};

use super::aggregate::{AggregateTotals, Measured};
use super::day::{DayLedger, LedgerDay};
use crate::date::DateKey;

/// Total field holding the day's intake in milliliters.
pub const WATER_INTAKE: &str = "waterIntake";

pub const DEFAULT_DAILY_GOAL_ML: u32 = 2000;

pub type WaterLedger = DayLedger<WaterDay>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glass {
    /// Milliliters.
    pub amount: u32,
    /// Local `HH:MM` the glass was logged at.
    #[serde(default)]
    pub time: String,
}

impl Measured for Glass {
    fn measures(&self) -> Vec<(&'static str, f64)> {
        vec![(WATER_INTAKE, f64::from(self.amount))]
    }
}

/// Persisted as `{date, waterIntake, glasses}`; the intake total is
/// flattened into the day object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterDay {
    pub date: DateKey,
    #[serde(flatten)]
    pub total: AggregateTotals,
    #[serde(default)]
    pub glasses: Vec<Glass>,
}

impl WaterDay {
    pub fn intake(&self) -> f64 {
        self.total.get(WATER_INTAKE)
    }
}

impl LedgerDay for WaterDay {
    /// Water days have a single sequence of glasses.
    type Category = ();
    type Item = Glass;

    fn blank(date: DateKey) -> Self {
        Self {
            date,
            total: AggregateTotals::zeroed(&[WATER_INTAKE]),
            glasses: Vec::new(),
        }
    }

    fn date(&self) -> DateKey {
        self.date
    }

    fn items(&self, _: ()) -> &[Glass] {
        &self.glasses
    }

    fn items_mut(&mut self, _: ()) -> &mut Vec<Glass> {
        &mut self.glasses
    }

    fn total(&self) -> &AggregateTotals {
        &self.total
    }

    fn total_mut(&mut self) -> &mut AggregateTotals {
        &mut self.total
    }
}

/// Water ledger plus the user's daily goal.
#[derive(Debug, Clone)]
pub struct WaterLog {
    pub ledger: WaterLedger,
    pub daily_goal: u32,
}

impl Default for WaterLog {
    fn default() -> Self {
        Self {
            ledger: WaterLedger::default(),
            daily_goal: DEFAULT_DAILY_GOAL_ML,
        }
    }
}

impl WaterLog {
    /// Intake of the current day, 0 when no day is selected.
    pub fn intake(&self) -> f64 {
        self.ledger.current().map_or(0.0, WaterDay::intake)
    }

    /// Share of the goal reached today, whole percent capped at 100.
    pub fn percentage(&self) -> u32 {
        let intake = self.intake();
        if self.daily_goal == 0 || intake <= 0.0 {
            return 0;
        }
        let pct = (intake / f64::from(self.daily_goal) * 100.0).round();
        pct.min(100.0) as u32
    }

    /// Milliliters still missing to reach the goal.
    pub fn remaining(&self) -> u32 {
        let left = f64::from(self.daily_goal) - self.intake();
        left.max(0.0).round() as u32
    }
}
