//! Meal ledger: food items grouped into breakfast, lunch and dinner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::aggregate::{AggregateTotals, Measured};
use super::day::{DayLedger, LedgerDay};
use crate::date::DateKey;
use crate::error::ValidationError;

/// Fields summed into a meal day's `total`.
pub const NUTRIENT_FIELDS: [&str; 4] = ["calories", "proteins", "fats", "carbs"];

/// Field plotted by the calorie chart.
pub const CALORIES: &str = "calories";

pub type MealLedger = DayLedger<MealDay>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 3] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Meal::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "meal".into(),
                message: format!("'{s}' is not one of breakfast, lunch, dinner"),
            })
    }
}

/// A food portion, also the shape of a product catalog entry.
///
/// Numeric fields accept numeric strings on load; older data stored form
/// input verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub proteins: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fats: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbs: f64,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, calories: f64, proteins: f64, fats: f64, carbs: f64) -> Self {
        Self {
            name: name.into(),
            calories,
            proteins,
            fats,
            carbs,
        }
    }

    /// Reject amounts that cannot be stored as JSON numbers.
    ///
    /// # Errors
    /// Returns `InvalidValue` naming the first non-finite field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.measures().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((field, value)) => Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("{value} is not a finite number"),
            }),
            None => Ok(()),
        }
    }
}

impl Measured for FoodItem {
    fn measures(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("calories", self.calories),
            ("proteins", self.proteins),
            ("fats", self.fats),
            ("carbs", self.carbs),
        ]
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Num(f64),
        Text(String),
    }

    let value = match Number::deserialize(deserializer)? {
        Number::Num(v) => v,
        Number::Text(s) if s.trim().is_empty() => 0.0,
        Number::Text(s) => s.trim().parse().map_err(serde::de::Error::custom)?,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!("{value} is not a finite number")))
    }
}

/// Persisted as `{date, breakfast, lunch, dinner, total}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDay {
    pub date: DateKey,
    #[serde(default)]
    pub breakfast: Vec<FoodItem>,
    #[serde(default)]
    pub lunch: Vec<FoodItem>,
    #[serde(default)]
    pub dinner: Vec<FoodItem>,
    #[serde(default = "zeroed_nutrients")]
    pub total: AggregateTotals,
}

fn zeroed_nutrients() -> AggregateTotals {
    AggregateTotals::zeroed(&NUTRIENT_FIELDS)
}

impl LedgerDay for MealDay {
    type Category = Meal;
    type Item = FoodItem;

    fn blank(date: DateKey) -> Self {
        Self {
            date,
            breakfast: Vec::new(),
            lunch: Vec::new(),
            dinner: Vec::new(),
            total: zeroed_nutrients(),
        }
    }

    fn date(&self) -> DateKey {
        self.date
    }

    fn items(&self, meal: Meal) -> &[FoodItem] {
        match meal {
            Meal::Breakfast => &self.breakfast,
            Meal::Lunch => &self.lunch,
            Meal::Dinner => &self.dinner,
        }
    }

    fn items_mut(&mut self, meal: Meal) -> &mut Vec<FoodItem> {
        match meal {
            Meal::Breakfast => &mut self.breakfast,
            Meal::Lunch => &mut self.lunch,
            Meal::Dinner => &mut self.dinner,
        }
    }

    fn total(&self) -> &AggregateTotals {
        &self.total
    }

    fn total_mut(&mut self) -> &mut AggregateTotals {
        &mut self.total
    }
}
