pub mod config;
pub mod food;
pub mod habit;
pub mod product;
pub mod profile;
pub mod water;

use serde::Serialize;
use wellday_core::storage::{self, KeyValueStore};
use wellday_core::{Clock, Config, DateKey, SystemClock, Tracker};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub type AppTracker = Tracker<Box<dyn KeyValueStore>>;

/// Load the config and open the configured store in the data directory.
pub fn open_tracker() -> Result<AppTracker, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let dir = storage::data_dir()?;
    let store = storage::open_store(&config, &dir)?;
    tracing::debug!(dir = %dir.display(), backend = ?config.storage.backend, "opened store");
    Ok(Tracker::load(store, SystemClock, config)?)
}

/// `--date` when given, otherwise the local calendar day.
pub fn day_or_today(date: Option<DateKey>) -> DateKey {
    date.unwrap_or_else(|| SystemClock.today())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
