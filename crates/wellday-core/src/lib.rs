//! # Wellday Core Library
//!
//! Core logic for a personal wellness tracker: a daily food diary, a daily
//! water log and a set of "quit habit" trackers. All operations are exposed
//! through [`Tracker`], and the `wellday` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Ledgers**: per-day entry lists with running totals, shared by the food
//!   diary and the water log
//! - **Habits**: per-habit event logs from which status, streaks and relapse
//!   history are derived
//! - **Storage**: a key/value port (SQLite, JSON files or memory) holding one
//!   JSON document per domain, plus TOML configuration
//!
//! ## Key Components
//!
//! - [`Tracker`]: loads every domain and writes through after each change
//! - [`DayLedger`]: the generic day calendar with its current-day cursor
//! - [`HabitBook`]: habit catalog with activation and selection
//! - [`Config`]: application configuration management

pub mod clock;
pub mod date;
pub mod error;
pub mod habits;
pub mod ledger;
pub mod products;
pub mod profile;
pub mod storage;
pub mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use date::DateKey;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use habits::{DayStatus, Habit, HabitBook, HabitSummary};
pub use ledger::{DayLedger, FoodItem, Glass, Meal, MealDay, WaterDay, WaterLog};
pub use products::{Product, ProductCatalog};
pub use profile::{PersonalData, PersonalDataPatch, Sex};
pub use storage::{Config, KeyValueStore};
pub use tracker::{NewHabit, Tracker};
