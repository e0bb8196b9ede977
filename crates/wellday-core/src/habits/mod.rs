//! Habit tracking on a per-habit event log.

mod book;
mod model;

pub use book::HabitBook;
pub use model::{
    event_timestamp, DayStatus, EventKind, Habit, HabitEvent, HabitSummary, RelapseEvent, DEFAULT_COLOR,
    DEFAULT_ICON, HABITS_SCHEMA_VERSION,
};
