mod config;
pub mod file;
pub mod gateway;
pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use config::{Backend, Config};
pub use file::FileStore;
pub use gateway::Gateway;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Storage keys, one JSON value each.
pub mod keys {
    pub const PERSONAL_DATA: &str = "calculation_personalData";
    pub const CALENDAR_DATA: &str = "calendar_data";
    pub const CALENDAR_CURRENT_DAY: &str = "calendar_currentDay";
    pub const HABITS_DATA: &str = "habits_data";
    pub const HABITS_ACTIVE: &str = "habits_active";
    pub const HABITS_SELECTED: &str = "habits_selected";
    /// Legacy per-day success marks, read by migration only.
    pub const HABITS_CALENDAR: &str = "habits_calendar";
    /// Legacy `{habitId: {"YYYY-MM-DD": true | "relapse"}}` status maps.
    pub const HABITS_TRACKED: &str = "habits_tracked";
    pub const PRODUCTS_DATA: &str = "products_data";
    pub const WATER_CALENDAR: &str = "water_calendar";
    pub const WATER_CURRENT_DAY: &str = "water_currentDay";
    pub const WATER_DAILY_GOAL: &str = "water_dailyGoal";
}

/// Synchronous string key-value store the domain state is persisted to.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Returns the data directory.
///
/// `WELLDAY_DATA_DIR` wins when set. Otherwise `~/.config/wellday[-dev]/`
/// based on `WELLDAY_ENV` (set `WELLDAY_ENV=dev` for a development copy).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("WELLDAY_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("WELLDAY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("wellday-dev")
            } else {
                base_dir.join("wellday")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Open the store selected by `config` inside `dir`.
///
/// # Errors
/// Returns an error if the backend cannot be opened.
pub fn open_store(config: &Config, dir: &std::path::Path) -> Result<Box<dyn KeyValueStore>, StorageError> {
    Ok(match config.storage.backend {
        Backend::Sqlite => Box::new(SqliteStore::open(dir.join("wellday.db"))?),
        Backend::Files => Box::new(FileStore::open(dir.join("store"))?),
    })
}
