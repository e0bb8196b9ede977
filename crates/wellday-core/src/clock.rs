//! Time source for operations that need "now" or "today".

use chrono::{DateTime, Local, Utc};

use crate::date::DateKey;

/// Supplies the current instant and the user's current calendar day.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// The local calendar day.
    fn today(&self) -> DateKey;

    /// Local wall-clock label `HH:MM` used on water glasses.
    fn time_label(&self) -> String;
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> DateKey {
        Local::now().date_naive().into()
    }

    fn time_label(&self) -> String {
        Local::now().format("%H:%M").to_string()
    }
}

/// A clock frozen at one UTC instant (for tests and replays).
///
/// `today` and `time_label` are derived from the UTC instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }

    fn today(&self) -> DateKey {
        self.at.date_naive().into()
    }

    fn time_label(&self) -> String {
        self.at.format("%H:%M").to_string()
    }
}
