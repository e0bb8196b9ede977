//! Day-keyed ledgers and their incrementally maintained totals.
//!
//! The nutrition and water domains share one engine: a [`DayLedger`] over a
//! domain-specific [`LedgerDay`] type, with totals kept by the
//! [`aggregate`] functions.

pub mod aggregate;
mod day;
pub mod nutrition;
pub mod water;

pub use aggregate::{round2, AggregateTotals, Measured};
pub use day::{DayLedger, LedgerDay};
pub use nutrition::{FoodItem, Meal, MealDay, MealLedger};
pub use water::{Glass, WaterDay, WaterLedger, WaterLog};
